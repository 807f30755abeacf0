//!
//! src/query.rs
//!
//! Converts the structured search fields into the single
//! free text query string the search endpoint consumes
//!

/// One search request worth of optional filters. `None` and an
/// empty string both count as "filter not applied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQueryField {
    pub keyword: Option<String>,
    pub track: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub popularity: Option<String>,
}

impl SearchQueryField {
    /// Flatten to the query string: the bare keyword first, then one
    /// name:value token per populated field, space joined in fixed
    /// field order. All fields unset yields "", which callers pass
    /// through as "no filter".
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(keyword) = present(&self.keyword) {
            parts.push(keyword.to_string());
        }
        push_scoped(&mut parts, "track", &self.track);
        push_scoped(&mut parts, "artist", &self.artist);
        push_scoped(&mut parts, "album", &self.album);
        push_scoped(&mut parts, "genre", &self.genre);
        push_scoped(&mut parts, "year", &self.year);
        push_scoped(&mut parts, "popularity", &self.popularity);
        parts.join(" ")
    }

    /// True when no field would contribute a token.
    pub fn is_empty(&self) -> bool {
        [
            &self.keyword, &self.track, &self.artist, &self.album,
            &self.genre, &self.year, &self.popularity,
        ]
        .into_iter()
        .all(|field| present(field).is_none())
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn push_scoped(parts: &mut Vec<String>, name: &str, field: &Option<String>) {
    if let Some(value) = present(field) {
        parts.push(format!("{name}:{value}"));
    }
}
