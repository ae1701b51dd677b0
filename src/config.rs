use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CmvnError;

/// Front-end settings that accompany an acoustic model.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FrontendConfig {
    #[serde(alias = "cmvn_path")]
    pub cmvn_file: PathBuf,
    #[serde(default, alias = "dim")]
    pub feature_dim: Option<usize>,
    /// Accept an artifact that only carries one of the two blocks.
    #[serde(default)]
    pub allow_partial: bool,
    // Set by `load`, relative `cmvn_file` paths are resolved against it.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl FrontendConfig {
    pub fn new(cmvn_file: impl Into<PathBuf>, feature_dim: Option<usize>) -> Self {
        Self {
            cmvn_file: cmvn_file.into(),
            feature_dim,
            allow_partial: false,
            base_dir: None,
        }
    }

    pub fn load(config_path: impl AsRef<Path>) -> Result<Self, CmvnError> {
        let config_path = config_path.as_ref();
        let contents = fs::read_to_string(config_path).map_err(|e| CmvnError::io(config_path, e))?;

        let mut config: FrontendConfig =
            serde_json::from_str(&contents).map_err(|e| CmvnError::Config {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        config.base_dir = config_path.parent().map(Path::to_path_buf);

        log::debug!("loaded frontend config from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    pub fn resolved_cmvn_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(dir) if self.cmvn_file.is_relative() => dir.join(&self.cmvn_file),
            _ => self.cmvn_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_load_resolves_relative_cmvn_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("frontend.json");
        fs::write(&config_path, r#"{"cmvn_file": "am.mvn", "feature_dim": 560}"#).unwrap();

        let config = FrontendConfig::load(&config_path).unwrap();
        assert_eq!(config.feature_dim, Some(560));
        assert!(!config.allow_partial);
        assert_eq!(config.resolved_cmvn_path(), dir.path().join("am.mvn"));
    }

    #[test]
    fn test_absolute_cmvn_path_is_kept() {
        let dir = tempdir().unwrap();
        let absolute = dir.path().join("models").join("am.mvn");
        let config_path = dir.path().join("frontend.json");
        let json = serde_json::json!({ "cmvn_file": absolute, "allow_partial": true });
        fs::write(&config_path, json.to_string()).unwrap();

        let config = FrontendConfig::load(&config_path).unwrap();
        assert!(config.allow_partial);
        assert_eq!(config.feature_dim, None);
        assert_eq!(config.resolved_cmvn_path(), absolute);
    }

    #[test]
    fn test_aliases() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"cmvn_path": "/models/am.mvn", "dim": 80}"#).unwrap();

        let config = FrontendConfig::load(file.path()).unwrap();
        assert_eq!(config.cmvn_file, PathBuf::from("/models/am.mvn"));
        assert_eq!(config.feature_dim, Some(80));
    }

    #[test]
    fn test_new_config_path_is_used_as_is() {
        let config = FrontendConfig::new("am.mvn", None);
        assert_eq!(config.resolved_cmvn_path(), PathBuf::from("am.mvn"));
    }

    #[test]
    fn test_missing_config_file() {
        let result = FrontendConfig::load("non_existent_frontend.json");
        assert!(matches!(result, Err(CmvnError::Io { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"feature_dim": 80]"#).unwrap();
        let result = FrontendConfig::load(file.path());
        assert!(matches!(result, Err(CmvnError::Config { .. })));
    }

    #[test]
    fn test_missing_cmvn_file_field() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"feature_dim": 80}"#).unwrap();
        let result = FrontendConfig::load(file.path());
        assert!(matches!(result, Err(CmvnError::Config { source, .. }) if source.to_string().contains("cmvn_file")));
    }
}
