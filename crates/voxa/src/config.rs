//! Runtime configuration for utterances.
//!
//! A [`Config`] is fixed when an [`Utterance`](crate::hrg::Utterance) is
//! created. Defaults suit production use; [`Config::from_env`] lets a
//! deployment override them without code changes.

use crate::container::MapKind;
use crate::error::{Error, Result};

/// Environment variable toggling consistency checks (`0`/`1`).
pub const ENV_CHECK_INVARIANTS: &str = "VOXA_CHECK_INVARIANTS";
/// Environment variable naming the feature map class.
pub const ENV_FEATURE_MAP: &str = "VOXA_FEATURE_MAP";

/// Utterance configuration.
///
/// # Example
///
/// ```
/// use voxa::Config;
/// use voxa::container::MapKind;
///
/// let config = Config::default()
///     .with_feature_map(MapKind::Hash)
///     .with_item_ids(false);
/// assert_eq!(config.feature_map, MapKind::Hash);
/// assert!(!config.assign_item_ids);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backing used for content and utterance feature maps.
    pub feature_map: MapKind,
    /// Give every new content an `_id` int feature from the utterance
    /// counter.
    pub assign_item_ids: bool,
    /// Verify graph consistency after every structural mutation. Only has
    /// an effect in builds with debug assertions.
    pub check_invariants: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            feature_map: MapKind::List,
            assign_item_ids: true,
            check_invariants: cfg!(debug_assertions),
        }
    }
}

impl Config {
    /// Sets the feature map backing.
    #[must_use]
    pub fn with_feature_map(mut self, kind: MapKind) -> Self {
        self.feature_map = kind;
        self
    }

    /// Enables or disables `_id` assignment.
    #[must_use]
    pub fn with_item_ids(mut self, enabled: bool) -> Self {
        self.assign_item_ids = enabled;
        self
    }

    /// Enables or disables consistency checks.
    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Builds a configuration from the defaults and the `VOXA_*`
    /// environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] or [`Error::UnknownClass`] if a
    /// variable holds an unusable value.
    pub fn from_env() -> Result<Self> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();
        if let Some(value) = lookup(ENV_CHECK_INVARIANTS) {
            config.check_invariants = parse_flag(ENV_CHECK_INVARIANTS, &value)?;
        }
        if let Some(value) = lookup(ENV_FEATURE_MAP) {
            config.feature_map = MapKind::from_class_name(value.trim())?;
        }
        Ok(config)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => Err(Error::invalid_argument(format!(
            "{name} must be 0 or 1, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.feature_map, MapKind::List);
        assert!(config.assign_item_ids);
        assert_eq!(config.check_invariants, cfg!(debug_assertions));
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            (ENV_CHECK_INVARIANTS, "0"),
            (ENV_FEATURE_MAP, "HashMap"),
        ]))
        .unwrap();
        assert!(!config.check_invariants);
        assert_eq!(config.feature_map, MapKind::Hash);

        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_CHECK_INVARIANTS, "maybe")])).unwrap_err(),
            Error::InvalidArgument { .. }
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_FEATURE_MAP, "ArrayList")])).unwrap_err(),
            Error::InvalidArgument { .. }
        ));
    }
}
