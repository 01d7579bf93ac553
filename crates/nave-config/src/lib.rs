use nave_security::DescriptionPlaceholder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const JIRA_URL: &str = "JIRA_URL";
pub const JIRA_USERNAME: &str = "JIRA_USERNAME";
pub const JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const NAVE_API_URL: &str = "NAVE_API_URL";
pub const NAVE_API_KEY: &str = "NAVE_API_KEY";
pub const NAVE_DASHBOARD_ID: &str = "NAVE_DASHBOARD_ID";

/// Environment variables a sync run cannot start without
pub const REQUIRED_VARIABLES: [&str; 6] = [
    JIRA_URL,
    JIRA_USERNAME,
    JIRA_API_TOKEN,
    NAVE_API_URL,
    NAVE_API_KEY,
    NAVE_DASHBOARD_ID,
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Settings (~/.config/nave/settings.toml)
// ============================================================================

/// Tunables that are not secrets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory transient export files are written to
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    #[serde(default)]
    pub tracker: TrackerSettings,

    #[serde(default)]
    pub dashboard: DashboardSettings,

    #[serde(default)]
    pub masking: MaskingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSettings {
    #[serde(default = "default_jql")]
    pub jql: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,

    #[serde(default = "default_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default)]
    pub cumulative: bool,

    #[serde(default = "default_timeout_secs")]
    pub upload_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaskingSettings {
    #[serde(default)]
    pub description_placeholder: DescriptionPlaceholder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            tracker: TrackerSettings::default(),
            dashboard: DashboardSettings::default(),
            masking: MaskingSettings::default(),
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            jql: default_jql(),
            page_size: default_page_size(),
            max_pages: None,
            fetch_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            cumulative: false,
            upload_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_jql() -> String {
    "ORDER BY updated DESC".to_string()
}

fn default_page_size() -> usize {
    1000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Settings {
    /// Load settings from the default location, creating it if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            let settings = Settings::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&settings)?;
            std::fs::write(path, content)?;
            Ok(settings)
        }
    }

    pub fn settings_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "nave", "nave") {
            dirs.config_dir().join("settings.toml")
        } else {
            PathBuf::from("~/.nave/settings.toml")
        }
    }
}

// ============================================================================
// Credentials and endpoints (environment)
// ============================================================================

#[derive(Clone)]
pub struct TrackerConfig {
    pub url: String,
    pub username: String,
    pub api_token: String,
}

#[derive(Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub api_key: String,
    pub dashboard_id: String,
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("api_token", &"<hidden>")
            .finish()
    }
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<hidden>")
            .field("dashboard_id", &self.dashboard_id)
            .finish()
    }
}

/// Load variables from a `.env` file into the process environment.
///
/// With no `path`, `.env` is searched for from the current directory upwards
/// and its absence is not an error. Variables already set are kept.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(e.into()),
        },
    }
}

/// Everything a sync run needs
#[derive(Debug, Clone)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub dashboard: DashboardConfig,
    pub settings: Settings,
}

impl Config {
    pub fn from_env(settings: Settings) -> Result<Self> {
        Self::from_lookup(settings, |name| std::env::var(name).ok())
    }

    /// Resolve the required variables through `lookup`.
    ///
    /// Empty values count as missing, and every missing name is reported at once.
    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |name: &str| match lookup(name).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let tracker = TrackerConfig {
            url: get(JIRA_URL),
            username: get(JIRA_USERNAME),
            api_token: get(JIRA_API_TOKEN),
        };
        let dashboard = DashboardConfig {
            api_url: get(NAVE_API_URL),
            api_key: get(NAVE_API_KEY),
            dashboard_id: get(NAVE_DASHBOARD_ID),
        };

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        Ok(Self {
            tracker,
            dashboard,
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        REQUIRED_VARIABLES
            .iter()
            .map(|name| (*name, format!("value-of-{}", name)))
            .collect()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.tracker.jql, "ORDER BY updated DESC");
        assert_eq!(settings.tracker.page_size, 1000);
        assert_eq!(settings.tracker.max_pages, None);
        assert_eq!(settings.tracker.fetch_timeout_secs, 60);
        assert_eq!(settings.dashboard.upload_timeout_secs, 60);
        assert!(!settings.dashboard.cumulative);
        assert_eq!(settings.work_dir, PathBuf::from("."));
        assert_eq!(
            settings.masking.description_placeholder,
            DescriptionPlaceholder::Fixed("text".to_string())
        );
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let toml_str = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.tracker.page_size, settings.tracker.page_size);
        assert_eq!(
            parsed.masking.description_placeholder,
            settings.masking.description_placeholder
        );
    }

    #[test]
    fn test_partial_settings_file() {
        let parsed: Settings = toml::from_str(
            r#"
            work_dir = "/tmp/nave"

            [tracker]
            page_size = 100
            max_pages = 3
            fetch_timeout_secs = 15

            [dashboard]
            upload_timeout_secs = 120

            [masking]
            description_placeholder = "generated"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.work_dir, PathBuf::from("/tmp/nave"));
        assert_eq!(parsed.tracker.page_size, 100);
        assert_eq!(parsed.tracker.max_pages, Some(3));
        assert_eq!(parsed.tracker.jql, "ORDER BY updated DESC");
        assert_eq!(parsed.tracker.fetch_timeout_secs, 15);
        assert_eq!(parsed.dashboard.upload_timeout_secs, 120);
        assert!(!parsed.dashboard.cumulative);
        assert_eq!(
            parsed.masking.description_placeholder,
            DescriptionPlaceholder::Generated
        );
    }

    #[test]
    fn test_load_from_creates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let settings = Settings::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(settings.tracker.page_size, 1000);
        let reloaded = Settings::load_from(&path).unwrap();
        assert_eq!(reloaded.tracker.jql, settings.tracker.jql);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[tracker\npage_size = ").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_from_lookup() {
        let env = full_env();
        let config = Config::from_lookup(Settings::default(), |name| env.get(name).cloned()).unwrap();

        assert_eq!(config.tracker.url, "value-of-JIRA_URL");
        assert_eq!(config.tracker.api_token, "value-of-JIRA_API_TOKEN");
        assert_eq!(config.dashboard.dashboard_id, "value-of-NAVE_DASHBOARD_ID");
    }

    #[test]
    fn test_all_missing_variables_reported() {
        let mut env = full_env();
        env.remove(JIRA_API_TOKEN);
        env.insert(NAVE_API_KEY, "   ".to_string());

        let err = Config::from_lookup(Settings::default(), |name| env.get(name).cloned()).unwrap_err();

        match err {
            ConfigError::MissingVariables(missing) => {
                assert_eq!(missing, vec![JIRA_API_TOKEN, NAVE_API_KEY]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_message_lists_names() {
        let err = Config::from_lookup(Settings::default(), |_| None).unwrap_err();
        let message = err.to_string();

        for name in REQUIRED_VARIABLES {
            assert!(message.contains(name));
        }
    }

    #[test]
    fn test_dotenv_file_fills_variables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut contents = String::from("# tracker and dashboard credentials\n");
        for name in REQUIRED_VARIABLES {
            contents.push_str(&format!("{}=\"from-dotenv-{}\"\n", name, name));
        }
        std::fs::write(&path, contents).unwrap();

        let loaded = load_dotenv(Some(&path)).unwrap();
        let config = Config::from_env(Settings::default()).unwrap();

        assert_eq!(loaded, Some(path));
        assert_eq!(config.tracker.username, "from-dotenv-JIRA_USERNAME");
        assert_eq!(config.dashboard.dashboard_id, "from-dotenv-NAVE_DASHBOARD_ID");
    }

    #[test]
    fn test_dotenv_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NAVE_API_KEY=\"unterminated\n").unwrap();

        let err = load_dotenv(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Dotenv(_)));
    }

    #[test]
    fn test_dotenv_file_missing() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_dotenv(Some(&dir.path().join(".env"))).unwrap_err();
        assert!(matches!(err, ConfigError::Dotenv(_)));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let env = full_env();
        let config = Config::from_lookup(Settings::default(), |name| env.get(name).cloned()).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("value-of-JIRA_API_TOKEN"));
        assert!(!debug.contains("value-of-NAVE_API_KEY"));
        assert!(debug.contains("value-of-JIRA_USERNAME"));
    }
}
