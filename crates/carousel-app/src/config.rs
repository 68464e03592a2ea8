//! Runtime configuration.

use std::path::{Path, PathBuf};

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "carousel-studio";

/// Where the studio keeps its data and writes exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub font_dir: Option<PathBuf>,
}

impl StudioConfig {
    /// Build a config rooted at `data_dir`, or the platform default.
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let export_dir = dirs::download_dir().unwrap_or_else(|| data_dir.join("exports"));
        Self {
            data_dir,
            export_dir,
            font_dir: None,
        }
    }

    pub fn with_export_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.export_dir = dir;
        }
        self
    }

    pub fn with_font_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.font_dir = dir;
        self
    }

    /// Directory of the key-value store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    pub fn font_dir(&self) -> Option<&Path> {
        self.font_dir.as_deref()
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir() {
        let config = StudioConfig::new(Some(PathBuf::from("/tmp/studio")));
        assert_eq!(config.store_dir(), PathBuf::from("/tmp/studio/store"));
        assert!(config.font_dir().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = StudioConfig::new(Some(PathBuf::from("/tmp/studio")))
            .with_export_dir(Some(PathBuf::from("/tmp/out")))
            .with_font_dir(Some(PathBuf::from("/tmp/fonts")));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.font_dir(), Some(Path::new("/tmp/fonts")));

        let unchanged = config.clone().with_export_dir(None);
        assert_eq!(unchanged.export_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_default_dir_name() {
        assert!(StudioConfig::new(None).data_dir.ends_with(APP_DIR_NAME));
    }
}
