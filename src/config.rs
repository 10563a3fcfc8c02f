use crate::i18n::TranslationStore;
use crate::trans::KeepSet;
use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Active language for the demo store
    pub language: String,

    // Optional JSON resources file ({"en": {...}, "es": {...}})
    pub resources_path: Option<String>,

    // Tags that round-trip literally
    pub keep_tags: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let keep_tags = std::env::var("TRANS_KEEP_TAGS")
            .map(|raw| parse_tag_list(&raw))
            .unwrap_or_else(|_| vec!["br".to_string(), "strong".to_string()]);

        if let Some(tag) = keep_tags.iter().find(|tag| !is_valid_tag(tag)) {
            bail!("TRANS_KEEP_TAGS contains invalid tag name '{}'", tag);
        }

        Ok(Self {
            language: std::env::var("TRANS_LANGUAGE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "en".to_string()),
            resources_path: std::env::var("TRANS_RESOURCES")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            keep_tags,
        })
    }

    pub fn keep_set(&self) -> KeepSet {
        KeepSet::new(self.keep_tags.iter().cloned())
    }

    /// Load the resources file, if one is configured, with `language` active.
    pub fn load_store(&self) -> Result<Option<TranslationStore>> {
        let Some(path) = &self.resources_path else {
            return Ok(None);
        };

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resources file {}", path))?;
        let mut store = TranslationStore::from_json(&json)
            .with_context(|| format!("Invalid resources file {}", path))?;
        store.set_language(self.language.as_str());
        Ok(Some(store))
    }
}

fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.bytes().all(|b| b.is_ascii_digit())
        && tag
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b':' | b'_' | b'.' | b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var("TRANS_LANGUAGE");
        std::env::remove_var("TRANS_RESOURCES");
        std::env::remove_var("TRANS_KEEP_TAGS");
    }

    // ==================== Environment Tests ====================

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load defaults");

        assert_eq!(config.language, "en");
        assert_eq!(config.resources_path, None);
        assert_eq!(config.keep_tags, vec!["br", "strong"]);
        assert_eq!(config.keep_set(), KeepSet::default());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("TRANS_LANGUAGE", "es");
        std::env::set_var("TRANS_RESOURCES", "/tmp/resources.json");
        std::env::set_var("TRANS_KEEP_TAGS", " br , em,,i ");

        let config = Config::from_env().expect("Should load overrides");
        clear_env();

        assert_eq!(config.language, "es");
        assert_eq!(config.resources_path.as_deref(), Some("/tmp/resources.json"));
        assert_eq!(config.keep_tags, vec!["br", "em", "i"]);
        assert!(config.keep_set().contains("em"));
        assert!(!config.keep_set().contains("strong"));
    }

    #[test]
    #[serial]
    fn test_empty_keep_tags_means_empty_set() {
        clear_env();
        std::env::set_var("TRANS_KEEP_TAGS", "");

        let config = Config::from_env().expect("Should load");
        clear_env();

        assert!(config.keep_set().is_empty());
    }

    #[test]
    #[serial]
    fn test_invalid_keep_tag_is_rejected() {
        clear_env();
        std::env::set_var("TRANS_KEEP_TAGS", "br,<b>");

        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("<b>"));
    }

    #[test]
    #[serial]
    fn test_numeric_keep_tag_is_rejected() {
        clear_env();
        std::env::set_var("TRANS_KEEP_TAGS", "0");

        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    // ==================== Resource Loading Tests ====================

    #[test]
    fn test_load_store_without_path() {
        let config = Config {
            language: "en".to_string(),
            resources_path: None,
            keep_tags: vec![],
        };
        assert!(config.load_store().expect("Should succeed").is_none());
    }

    #[test]
    fn test_load_store_from_file() {
        use crate::i18n::Lookup;

        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(file, r#"{{"es": {{"Example": "Ejemplo"}}}}"#).expect("Failed to write");

        let config = Config {
            language: "es".to_string(),
            resources_path: Some(file.path().to_string_lossy().into_owned()),
            keep_tags: vec![],
        };

        let store = config
            .load_store()
            .expect("Should load")
            .expect("Should have a store");
        assert_eq!(store.current_language(), Some("es"));
        assert_eq!(store.lookup("Example"), "Ejemplo");
    }

    #[test]
    fn test_load_store_missing_file() {
        let config = Config {
            language: "es".to_string(),
            resources_path: Some("/nonexistent/resources.json".to_string()),
            keep_tags: vec![],
        };

        let err = config.load_store().unwrap_err();
        assert!(err.to_string().contains("Failed to read resources file"));
    }
}
