//! Query string building for REST requests.

use std::fmt::Display;

/// Ordered query parameters
///
/// Unset optional values are skipped and list parameters are sent as
/// repeated keys (`id=1&id=2`), which is what the API expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn push(mut self, key: &str, value: impl Display) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a parameter only when it is set
    pub fn push_opt<V: Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// Append a flag as `0` or `1`
    pub fn push_flag(self, key: &str, value: bool) -> Self {
        self.push(key, u8::from(value))
    }

    /// Append one pair per value, all under the same key
    pub fn push_all<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        for value in values {
            self = self.push(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs in insertion order
    pub fn to_query_params(&self) -> &[(String, String)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_values_skipped() {
        let params = QueryParams::new()
            .push("game", "csgo")
            .push_opt::<u64>("min_price", None)
            .push_opt("max_price", Some(1000))
            .push_flag("minified", true);

        assert_eq!(
            params.to_query_params(),
            &[
                ("game".to_string(), "csgo".to_string()),
                ("max_price".to_string(), "1000".to_string()),
                ("minified".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_repeated_keys() {
        let params = QueryParams::new().push_all("id", [1, 2, 3]);
        let keys: Vec<&str> = params
            .to_query_params()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["id", "id", "id"]);
        assert!(QueryParams::new().is_empty());
    }
}
