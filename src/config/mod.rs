use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the download directory
pub const DOWNLOAD_DIR_ENV: &str = "YT_SUBS_DOWNLOAD_DIR";

/// Environment variable pointing at a configuration file
pub const CONFIG_PATH_ENV: &str = "YT_SUBS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory for subtitle artifacts and saved transcripts
    pub download_dir: Option<PathBuf>,

    /// External tool settings
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// yt-dlp executable name or path
    pub yt_dlp: String,

    /// ffmpeg executable name or path
    pub ffmpeg: String,

    /// Browser to import cookies from (passed to `--cookies-from-browser`)
    pub cookies_from_browser: Option<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp: "yt-dlp".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            cookies_from_browser: None,
        }
    }
}

impl Config {
    /// Load configuration from file (if any) and apply the download directory override.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>, download_dir_override: Option<PathBuf>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };

        if let Some(dir) = download_dir_override.filter(|d| !d.as_os_str().is_empty()) {
            config.download_dir = Some(dir);
        }

        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from {}", path.display());

        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// `<config_dir>/yt-subs-mcp/config.yaml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("yt-subs-mcp").join("config.yaml"))
    }

    fn validate(&self) -> Result<()> {
        if self.tools.yt_dlp.trim().is_empty() {
            anyhow::bail!("tools.yt_dlp must not be empty");
        }

        if self.tools.ffmpeg.trim().is_empty() {
            anyhow::bail!("tools.ffmpeg must not be empty");
        }

        Ok(())
    }

    /// The download directory, defaulting to `~/Downloads/yts`
    pub fn downloads_path(&self) -> PathBuf {
        match &self.download_dir {
            Some(dir) => dir.clone(),
            None => default_download_dir(dirs::home_dir()),
        }
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Download Directory: {}", self.downloads_path().display());
        println!("  yt-dlp: {}", self.tools.yt_dlp);
        println!("  ffmpeg: {}", self.tools.ffmpeg);
        if let Some(browser) = &self.tools.cookies_from_browser {
            println!("  Cookies From Browser: {}", browser);
        }
    }
}

fn default_download_dir(home: Option<PathBuf>) -> PathBuf {
    home.unwrap_or_else(|| PathBuf::from("."))
        .join("Downloads")
        .join("yts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_download_dir_under_home() {
        assert_eq!(
            default_download_dir(Some(PathBuf::from("/home/alex"))),
            PathBuf::from("/home/alex/Downloads/yts")
        );
    }

    #[test]
    fn test_override_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "download_dir: /from/file\ntools:\n  cookies_from_browser: firefox\n").unwrap();

        let config = Config::load(Some(&path), Some(PathBuf::from("/from/env"))).unwrap();
        assert_eq!(config.downloads_path(), PathBuf::from("/from/env"));
        assert_eq!(config.tools.yt_dlp, "yt-dlp");
        assert_eq!(config.tools.cookies_from_browser.as_deref(), Some("firefox"));
    }

    #[test]
    fn test_file_value_used_without_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "download_dir: /from/file\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.downloads_path(), PathBuf::from("/from/file"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("missing.yaml")), None).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            download_dir: Some(PathBuf::from("/data/yts")),
            tools: ToolsConfig {
                ffmpeg: "/opt/ffmpeg/bin/ffmpeg".to_string(),
                ..ToolsConfig::default()
            },
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(Some(&path), None).unwrap(), config);
    }

    #[test]
    fn test_empty_tool_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs_err::write(&path, "tools:\n  ffmpeg: ''\n").unwrap();

        assert!(Config::load(Some(&path), None).is_err());
    }
}
