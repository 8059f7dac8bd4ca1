//! Query string encoding for optional, repeated and enumerated parameters.
//!
//! `None` means "leave the key out entirely". Falsy values such as `false`,
//! `0` and `""` are real values and are always sent.

use crate::WireValue;
use reqwest::Url;
use tracing::trace;

/// Ordered list of query pairs built from optional values.
///
/// Keys are emitted in the order they are added. Repeated keys keep the
/// order of their values and are never collapsed.
///
/// # Examples
///
/// ```
/// use ballchasing::QueryEncoder;
///
/// let mut query = QueryEncoder::new();
/// query
///     .field("title", Some("finals"))
///     .field::<str>("season", None)
///     .field("pro", Some(&false))
///     .repeated("player-name", ["a", "b", "a"]);
///
/// let keys: Vec<_> = query.pairs().iter().map(|(k, v)| format!("{k}={v}")).collect();
/// assert_eq!(keys, ["title=finals", "pro=false", "player-name=a", "player-name=b", "player-name=a"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEncoder {
    pairs: Vec<(&'static str, String)>,
}

impl QueryEncoder {
    /// Create an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key` if `value` is provided.
    pub fn field<V>(&mut self, key: &'static str, value: Option<&V>) -> &mut Self
    where
        V: WireValue + ?Sized,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.wire().into_owned()));
        }
        self
    }

    /// Append `key` once per value, in order.
    pub fn repeated<I>(&mut self, key: &'static str, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: WireValue,
    {
        for value in values {
            self.pairs.push((key, value.wire().into_owned()));
        }
        self
    }

    /// Encoded pairs, in emission order.
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// True when nothing will be sent.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Replace the query of `url` with these pairs, form-urlencoded.
    ///
    /// An empty encoder leaves the URL without a `?`.
    pub fn apply(&self, url: &mut Url) {
        url.set_query(None);
        if self.pairs.is_empty() {
            return;
        }
        trace!(pairs = self.pairs.len(), "Encoding query");
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choice, Playlist};

    #[test]
    fn test_unset_values_emit_nothing() {
        let mut query = QueryEncoder::new();
        query
            .field::<String>("title", None)
            .field::<bool>("pro", None)
            .field::<u32>("count", None)
            .repeated("playlist", Vec::<Choice<Playlist>>::new());
        assert!(query.is_empty());

        let mut url = Url::parse("https://ballchasing.com/api/replays").unwrap();
        query.apply(&mut url);
        assert_eq!(url.as_str(), "https://ballchasing.com/api/replays");
    }

    #[test]
    fn test_falsy_values_are_sent() {
        let mut query = QueryEncoder::new();
        query
            .field("title", Some(""))
            .field("pro", Some(&false))
            .field("count", Some(&0u32));
        assert_eq!(
            query.pairs(),
            &[("title", String::new()), ("pro", "false".to_string()), ("count", "0".to_string())]
        );
    }

    #[test]
    fn test_apply_percent_encodes() {
        let mut query = QueryEncoder::new();
        query.field("title", Some("a b&c")).field("player-id", Some("steam:1"));
        let mut url = Url::parse("https://ballchasing.com/api/replays").unwrap();
        query.apply(&mut url);
        assert_eq!(url.query(), Some("title=a+b%26c&player-id=steam%3A1"));
    }
}
