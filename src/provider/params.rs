use std::collections::HashMap;

/// Name of the single parameter sent with every key request.
pub const API_VERSION: &str = "api_version";

/// Shortest API version string the backend accepts.
pub const MIN_API_VERSION_LEN: usize = 4;

/// Parameters for one ephemeral-key request.
///
/// Built fresh for every call. The map always holds exactly one entry,
/// [`API_VERSION`], so it can be sent as-is as a form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParams {
    entries: HashMap<String, String>,
}

impl KeyParams {
    /// Parameters for the given API version.
    ///
    /// The version is not checked here; callers validate it upstream (see
    /// [`is_valid_api_version`]).
    pub fn new(api_version: impl Into<String>) -> Self {
        let mut entries = HashMap::with_capacity(1);
        entries.insert(API_VERSION.to_string(), api_version.into());
        Self { entries }
    }

    pub fn api_version(&self) -> &str {
        self.entries
            .get(API_VERSION)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.entries
    }
}

/// Whether `api_version` satisfies the request contract (at least
/// [`MIN_API_VERSION_LEN`] characters).
pub fn is_valid_api_version(api_version: &str) -> bool {
    api_version.chars().count() >= MIN_API_VERSION_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_exactly_one_api_version_entry() {
        for version in ["2017-06-05", "2020-08-27", "abcd"] {
            let params = KeyParams::new(version);
            assert_eq!(params.as_map().len(), 1);
            assert_eq!(params.as_map().get("api_version").map(String::as_str), Some(version));
            assert_eq!(params.api_version(), version);
        }
    }

    #[test]
    fn validation_requires_four_characters() {
        assert!(!is_valid_api_version(""));
        assert!(!is_valid_api_version("abc"));
        assert!(is_valid_api_version("abcd"));
        assert!(is_valid_api_version("2017-06-05"));
    }

    #[test]
    fn validation_counts_characters_not_bytes() {
        assert!(!is_valid_api_version("ééé"));
    }
}
