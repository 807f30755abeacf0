use std::{fs, io::Write, path::{Path, PathBuf}};
use serde_json::Value;

use crate::errors::SamplerError;

/// Wrapper objects a search response may carry items under
pub const ITEM_WRAPPERS: [&str; 6] = [
    "tracks", "albums", "artists", "playlists", "shows", "episodes"
];

/// Keys that add noise without carrying catalog data
const NOISE_KEYS: [&str; 4] = ["href", "uri", "available_markets", "external_urls"];

pub struct ResultSink {
    root: PathBuf
}

impl ResultSink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Shared stem so the json and csv files of one run pair up
    pub fn timestamp_stem() -> String {
        chrono::Local::now().format("sample-%Y%m%d-%H%M%S").to_string()
    }

    /// The json file keeps the response exactly as received
    pub fn write_json(&self, stem: &str, body: &Value) ->
        Result<PathBuf, SamplerError> {

        let bytes = serde_json::to_vec_pretty(body)?;
        let path = self.root.join(format!("{stem}.json"));
        Self::persist(&path, &bytes)?;
        Ok(path)
    }

    pub fn write_csv(&self, stem: &str, body: &Value) ->
        Result<PathBuf, SamplerError> {

        let items = Self::collect_items(body);
        let csv = Self::render_csv(&items);
        let path = self.root.join(format!("{stem}.csv"));
        Self::persist(&path, csv.as_bytes())?;
        Ok(path)
    }

    fn persist(path: &Path, bytes: &[u8]) -> Result<(), SamplerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e|
                SamplerError::Sink(
                    format!("create dir {}: {e}", parent.display())
            ))?;
        }

        let mut temp = tempfile::NamedTempFile::new_in(path.parent().unwrap())
            .map_err(|e| SamplerError::Sink(
                format!("tempfile in {}: {e}", path.parent().unwrap().display())
            ))?;

        temp.write_all(bytes).map_err(|e| SamplerError::Sink(
            format!("write {}: {e}", path.display())
        ))?;

        temp.persist(path).map_err(|e|
            SamplerError::Sink(format!("persist {}: {e}", path.display())))?;

        Ok(())
    }

    /// Pulls items out of whichever wrapper objects the response used
    fn collect_items(body: &Value) -> Vec<Value> {
        let mut items = Vec::new();
        for wrapper in ITEM_WRAPPERS {
            if let Some(Value::Array(arr)) = body.pointer(&format!("/{wrapper}/items")) {
                for element in arr {
                    let mut item = element.clone();
                    Self::drop_keys_recursive(&mut item, &NOISE_KEYS);
                    items.push(item);
                }
            }
        }
        items
    }

    /// Header is the union of item keys in first-seen order, rows leave
    /// missing cells empty
    fn render_csv(items: &[Value]) -> String {
        let mut columns: Vec<String> = Vec::new();
        for item in items {
            if let Value::Object(map) = item {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
        }

        let mut lines = Vec::new();
        lines.push(
            columns.iter()
                .map(|c| Self::escape_field(c))
                .collect::<Vec<_>>()
                .join(",")
        );

        for item in items {
            let row = columns.iter()
                .map(|column| Self::escape_field(&Self::render_cell(item.get(column))))
                .collect::<Vec<_>>()
                .join(",");
            lines.push(row);
        }

        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }

    fn render_cell(cell: Option<&Value>) -> String {
        match cell {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }

    fn escape_field(field: &str) -> String {
        if field.contains([',', '"', '\r', '\n']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn drop_keys_recursive(v: &mut Value, keys: &[&str]) {
        match v {
            Value::Object(map) => {
                for key in keys {
                    map.remove(*key);
                }
                for val in map.values_mut() {
                    Self::drop_keys_recursive(val, keys);
                }
            }
            Value::Array(arr) => {
                for element in arr {
                    Self::drop_keys_recursive(element, keys);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_write_round_trips_the_raw_body() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::new(dir.path());

        let body = json!({
            "tracks": {
                "href": "https://api.spotify.com/v1/search?query=x",
                "items": [{
                    "id": "abc",
                    "uri": "spotify:track:abc",
                    "available_markets": ["JP", "US"],
                    "album": {
                        "name": "X",
                        "uri": "spotify:album:xyz"
                    }
                }]
            }
        });

        let path = sink.write_json("sample-test", &body).unwrap();
        assert!(path.ends_with("sample-test.json"));

        let written: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, body);
        assert!(written.pointer("/tracks/href").is_some());
        assert!(written.pointer("/tracks/items/0/available_markets").is_some());
    }

    #[test]
    fn csv_flattens_union_of_columns() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::new(dir.path());

        let body = json!({
            "tracks": {
                "items": [
                    { "id": "a", "name": "One", "popularity": 42 },
                    { "id": "b", "name": "Two", "explicit": true }
                ]
            }
        });

        let path = sink.write_csv("sample-test", &body).unwrap();
        assert!(path.ends_with("sample-test.csv"));

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "id,name,popularity,explicit\r\na,One,42,\r\nb,Two,,true\r\n"
        );
    }

    #[test]
    fn csv_of_empty_items_is_a_bare_line() {
        let dir = tempfile::tempdir().unwrap();
        let sink = ResultSink::new(dir.path());

        let body = json!({ "tracks": { "items": [] } });
        let path = sink.write_csv("sample-test", &body).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "\r\n");
    }

    #[test]
    fn items_collected_across_wrapper_objects() {
        let body = json!({
            "albums": { "items": [{ "id": "al1" }] },
            "episodes": { "items": [{ "id": "ep1" }] }
        });

        let items = ResultSink::collect_items(&body);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], json!("al1"));
        assert_eq!(items[1]["id"], json!("ep1"));
    }

    #[test]
    fn collected_items_lose_noise_keys_recursively() {
        let body = json!({
            "tracks": {
                "items": [{
                    "id": "abc",
                    "href": "https://api.spotify.com/v1/tracks/abc",
                    "album": {
                        "name": "X",
                        "available_markets": ["JP", "US"],
                        "external_urls": { "spotify": "https://open.spotify.com" }
                    }
                }]
            }
        });

        let items = ResultSink::collect_items(&body);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], json!("abc"));
        assert!(items[0].get("href").is_none());
        assert!(items[0]["album"].get("available_markets").is_none());
        assert!(items[0]["album"].get("external_urls").is_none());
        assert_eq!(items[0]["album"]["name"], json!("X"));
    }

    #[test]
    fn cells_render_scalars_bare_and_nested_values_as_json() {
        assert_eq!(ResultSink::render_cell(None), "");
        assert_eq!(ResultSink::render_cell(Some(&json!(null))), "");
        assert_eq!(ResultSink::render_cell(Some(&json!("hi"))), "hi");
        assert_eq!(ResultSink::render_cell(Some(&json!(false))), "false");
        assert_eq!(ResultSink::render_cell(Some(&json!(7))), "7");
        assert_eq!(
            ResultSink::render_cell(Some(&json!({ "a": 1 }))),
            "{\"a\":1}"
        );
    }

    #[test]
    fn fields_needing_quotes_are_quoted_and_doubled() {
        assert_eq!(ResultSink::escape_field("plain"), "plain");
        assert_eq!(ResultSink::escape_field("a,b"), "\"a,b\"");
        assert_eq!(ResultSink::escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(ResultSink::escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn stem_carries_prefix_and_full_timestamp() {
        let stem = ResultSink::timestamp_stem();
        assert!(stem.starts_with("sample-"));
        assert_eq!(stem.len(), "sample-".len() + 15);
    }
}
