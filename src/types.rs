//!
//! src/types.rs
//!
//! Item types the search endpoint accepts
//!

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Album,
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
}

impl SearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::Album    => "album",
            SearchType::Artist   => "artist",
            SearchType::Playlist => "playlist",
            SearchType::Track    => "track",
            SearchType::Show     => "show",
            SearchType::Episode  => "episode",
        }
    }

    pub fn parse(s: &str) -> Option<SearchType> {
        match s {
            "album"    => Some(SearchType::Album),
            "artist"   => Some(SearchType::Artist),
            "playlist" => Some(SearchType::Playlist),
            "track"    => Some(SearchType::Track),
            "show"     => Some(SearchType::Show),
            "episode"  => Some(SearchType::Episode),
            _ => None,
        }
    }
}
