use crate::error::{Error, Result};
use crate::models::{Config, ConfigOverlay};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the current and home directories
pub const CONFIG_FILE_NAME: &str = ".universalist.json";

/// Load configuration from file or use defaults
///
/// Search order:
/// 1. Custom path if provided via --config
/// 2. .universalist.json in current directory
/// 3. ~/.universalist.json in home directory
/// 4. Built-in defaults
pub fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    // If custom path provided, use it exclusively
    if let Some(path) = custom_path {
        return load_config_from_file(path);
    }

    let candidates = [Some(PathBuf::from(CONFIG_FILE_NAME)), get_home_config_path()];

    for candidate in candidates.into_iter().flatten() {
        if !candidate.exists() {
            continue;
        }
        match load_config_from_file(&candidate) {
            Ok(config) => return Ok(config),
            Err(err) => warn!(
                path = %candidate.display(),
                error = %err,
                "ignoring unusable config file"
            ),
        }
    }

    Ok(Config::default())
}

/// Load an overlay from a specific file and apply it to the defaults
pub fn load_config_from_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| config_error(path, e))?;

    let overlay: ConfigOverlay = if is_toml(path) {
        toml::from_str(&contents).map_err(|e| config_error(path, e))?
    } else {
        serde_json::from_str(&contents).map_err(|e| config_error(path, e))?
    };

    debug!(
        path = %path.display(),
        keywords = overlay.keywords.as_ref().map(Vec::len),
        excluded = overlay.excluded.as_ref().map(Vec::len),
        "loaded config overlay"
    );

    Ok(Config::default().apply(overlay))
}

/// Save a config to a file (useful for creating example configs)
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let overlay = config.to_overlay();

    let contents = if is_toml(path) {
        toml::to_string_pretty(&overlay).map_err(|e| config_error(path, e))?
    } else {
        serde_json::to_string_pretty(&overlay).map_err(|e| config_error(path, e))?
    };

    fs::write(path, contents).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("toml")
}

fn config_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Get path to home directory config file
fn get_home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Annotation;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_load_json_overlay() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"{
            "path": "src",
            "keywords": [
                {"text": "HACK", "color": "green", "priority": 2},
                {"text": "NOTE", "color": "blue", "priority": 0}
            ],
            "excluded": ["*.min.js"]
        }"#;
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = load_config_from_file(temp_file.path()).unwrap();
        assert_eq!(config.path, Some(PathBuf::from("src")));
        assert_eq!(
            config.keywords,
            vec![Annotation::new("HACK", "green", 2), Annotation::new("NOTE", "blue", 0)]
        );
        assert_eq!(config.excluded, vec!["*.min.js".to_string()]);
    }

    #[test]
    fn test_load_toml_overlay() {
        let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
        let config_content = r#"
excluded = ["target/*"]

[[keywords]]
text = "XXX"
color = "red"
priority = 5
"#;
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = load_config_from_file(temp_file.path()).unwrap();
        assert_eq!(config.keywords, vec![Annotation::new("XXX", "red", 5)]);
        assert_eq!(config.excluded, vec!["target/*".to_string()]);
    }

    #[test]
    fn test_empty_lists_replace_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(br#"{"keywords": [], "excluded": []}"#).unwrap();

        let config = load_config_from_file(temp_file.path()).unwrap();
        assert!(config.keywords.is_empty());
        assert!(config.excluded.is_empty());
    }

    #[test]
    fn test_missing_fields_keep_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(br#"{"excluded": ["*.lock"]}"#).unwrap();

        let config = load_config_from_file(temp_file.path()).unwrap();
        assert_eq!(config.keywords, Annotation::defaults());
        assert_eq!(config.excluded, vec!["*.lock".to_string()]);
    }

    #[test]
    fn test_malformed_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ not json").unwrap();

        let err = load_config(Some(temp_file.path())).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_unreadable_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = load_config(Some(temp_dir.path().join("missing.json").as_path())).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = Config::default();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config_from_file(temp_file.path()).unwrap();

        assert_eq!(config, loaded);
    }
}
