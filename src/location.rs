//! Location descriptor and query-string decoding.
//!
//! This module provides the value types and pure functions that the reducer,
//! history adapter, and bridge all consume. No I/O occurs here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::form_urlencoded;

/// A structured navigation point: path, query string, fragment, and an
/// optional decoded query mapping.
///
/// `search` carries its leading `?` and `hash` its leading `#` when non-empty,
/// matching how the components appear in an address bar. `query`, when
/// present, is the decoded form of `search`; the reducer derives it exactly
/// once and never overwrites a mapping that is already attached.
///
/// # Examples
///
/// ```
/// use histsync::Location;
///
/// let location = Location::parse("/inbox?page=2#latest");
/// assert_eq!(location.pathname, "/inbox");
/// assert_eq!(location.search, "?page=2");
/// assert_eq!(location.hash, "#latest");
/// assert!(location.query.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Path component, e.g. `/path/to/somewhere`.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    #[serde(default)]
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    #[serde(default)]
    pub hash: String,
    /// Decoded query mapping. Absent until derived from `search`, or supplied
    /// pre-decoded by the emitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Map<String, Value>>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            pathname: "/".to_owned(),
            search: String::new(),
            hash: String::new(),
            query: None,
        }
    }
}

impl Location {
    /// Split a path string into its pathname, search, and hash components.
    ///
    /// The fragment is split off first, then the query string, so a `?`
    /// inside the fragment stays part of the fragment. Components keep their
    /// `?`/`#` prefixes; missing components are empty strings. The decoded
    /// `query` mapping is left unset.
    ///
    /// # Arguments
    ///
    /// * `path` - A path string such as `/a/b?c=d#e`.
    pub fn parse(path: &str) -> Self {
        let (rest, hash) = match path.find('#') {
            Some(i) => (&path[..i], path[i..].to_owned()),
            None => (path, String::new()),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) => (rest[..i].to_owned(), rest[i..].to_owned()),
            None => (rest.to_owned(), String::new()),
        };
        Self {
            pathname,
            search,
            hash,
            query: None,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Decode a query string into a JSON object map.
///
/// A leading `?` is tolerated and stripped. The empty string decodes to an
/// empty map. A key that repeats collects its values into an array, in
/// encounter order. Decoding is lossy rather than fallible: undecodable
/// percent-sequences degrade to replacement characters, so navigation is
/// never blocked by a malformed query string.
///
/// # Examples
///
/// ```
/// use histsync::decode_query;
/// use serde_json::json;
///
/// let query = decode_query("?query=test");
/// assert_eq!(query.get("query"), Some(&json!("test")));
/// assert!(decode_query("").is_empty());
/// ```
pub fn decode_query(search: &str) -> Map<String, Value> {
    let raw = search.strip_prefix('?').unwrap_or(search);
    let mut decoded = Map::new();
    if raw.is_empty() {
        return decoded;
    }
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        let value = Value::String(value.into_owned());
        match decoded.get_mut(key.as_ref()) {
            None => {
                decoded.insert(key.into_owned(), value);
            }
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_full_path() {
        let location = Location::parse("/path/to/somewhere?query=test#section");
        assert_eq!(location.pathname, "/path/to/somewhere");
        assert_eq!(location.search, "?query=test");
        assert_eq!(location.hash, "#section");
        assert_eq!(location.query, None);
    }

    #[test]
    fn parse_pathname_only() {
        let location = Location::parse("/plain");
        assert_eq!(location.pathname, "/plain");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "");
    }

    #[test]
    fn parse_hash_before_search_keeps_question_mark_in_hash() {
        // A `?` after the fragment delimiter belongs to the fragment.
        let location = Location::parse("/a#frag?not-a-query");
        assert_eq!(location.pathname, "/a");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "#frag?not-a-query");
    }

    #[test]
    fn parse_empty_string() {
        let location = Location::parse("");
        assert_eq!(location.pathname, "");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "");
    }

    #[test]
    fn default_is_root() {
        let location = Location::default();
        assert_eq!(location.pathname, "/");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "");
        assert_eq!(location.query, None);
    }

    #[test]
    fn display_reassembles_components() {
        let location = Location::parse("/a/b?c=d#e");
        assert_eq!(location.to_string(), "/a/b?c=d#e");
    }

    #[test]
    fn decode_single_pair() {
        let query = decode_query("?query=test");
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("query"), Some(&json!("test")));
    }

    #[test]
    fn decode_without_question_mark_prefix() {
        let query = decode_query("a=1&b=2");
        assert_eq!(query.get("a"), Some(&json!("1")));
        assert_eq!(query.get("b"), Some(&json!("2")));
    }

    #[test]
    fn decode_empty_string_is_empty_map() {
        assert!(decode_query("").is_empty());
        assert!(decode_query("?").is_empty());
    }

    #[test]
    fn decode_repeated_key_collects_array() {
        let query = decode_query("?tag=a&tag=b&tag=c");
        assert_eq!(query.get("tag"), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn decode_percent_encoded_value() {
        let query = decode_query("?q=hello%20world");
        assert_eq!(query.get("q"), Some(&json!("hello world")));
    }

    #[test]
    fn decode_plus_as_space() {
        let query = decode_query("?q=hello+world");
        assert_eq!(query.get("q"), Some(&json!("hello world")));
    }

    #[test]
    fn decode_malformed_sequence_degrades_without_error() {
        // An invalid UTF-8 percent-sequence must not panic or drop the pair;
        // the value decodes lossily.
        let query = decode_query("?bad=%FF");
        assert!(query.contains_key("bad"));
    }

    #[test]
    fn decode_valueless_key_maps_to_empty_string() {
        let query = decode_query("?flag");
        assert_eq!(query.get("flag"), Some(&json!("")));
    }

    #[test]
    fn serde_omits_absent_query() {
        let location = Location::parse("/a?b=c");
        let value = serde_json::to_value(&location).expect("serialize location");
        assert_eq!(
            value,
            json!({"pathname": "/a", "search": "?b=c", "hash": ""})
        );
    }

    #[test]
    fn serde_roundtrip_with_query() {
        let mut location = Location::parse("/a?b=c");
        location.query = Some(decode_query(&location.search));
        let json = serde_json::to_string(&location).expect("serialize location");
        let back: Location = serde_json::from_str(&json).expect("deserialize location");
        assert_eq!(back, location);
    }

    #[test]
    fn deserialize_tolerates_missing_optional_fields() {
        let location: Location =
            serde_json::from_value(json!({"pathname": "/x"})).expect("deserialize location");
        assert_eq!(location.pathname, "/x");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "");
        assert_eq!(location.query, None);
    }
}
