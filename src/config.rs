use crate::error::{Result, YtsrtError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// InnerTube client identity used when asking YouTube for caption tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientProfile {
    #[default]
    Android,
    Ios,
    Web,
    AndroidMusic,
    IosMusic,
}

impl ClientProfile {
    /// Value sent as `clientName`.
    pub fn client_name(&self) -> &'static str {
        match self {
            ClientProfile::Android => "ANDROID",
            ClientProfile::Ios => "IOS",
            ClientProfile::Web => "WEB",
            // YouTube Music on Android is served through the regular
            // Android client.
            ClientProfile::AndroidMusic => "ANDROID",
            ClientProfile::IosMusic => "IOS_MUSIC",
        }
    }

    /// Client version sent when none is configured.
    pub fn default_version(&self) -> &'static str {
        match self {
            ClientProfile::Android | ClientProfile::Ios | ClientProfile::AndroidMusic => {
                "19.08.35"
            }
            ClientProfile::Web => "2.20240726.00.00",
            ClientProfile::IosMusic => "6.41",
        }
    }
}

impl std::fmt::Display for ClientProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientProfile::Android => write!(f, "android"),
            ClientProfile::Ios => write!(f, "ios"),
            ClientProfile::Web => write!(f, "web"),
            ClientProfile::AndroidMusic => write!(f, "android_music"),
            ClientProfile::IosMusic => write!(f, "ios_music"),
        }
    }
}

impl std::str::FromStr for ClientProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "android" => Ok(ClientProfile::Android),
            "ios" => Ok(ClientProfile::Ios),
            "web" => Ok(ClientProfile::Web),
            "android_music" => Ok(ClientProfile::AndroidMusic),
            "ios_music" => Ok(ClientProfile::IosMusic),
            _ => Err(format!(
                "Unknown client: {}. Use 'android', 'ios', 'web', 'android_music' or 'ios_music'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub profile: ClientProfile,
    /// Overrides the profile's default client version.
    pub version: Option<String>,
    /// Interface language sent with requests.
    pub hl: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            profile: ClientProfile::default(),
            version: None,
            hl: "en".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(profile: ClientProfile) -> Self {
        Self {
            profile,
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The version actually sent to the API.
    pub fn effective_version(&self) -> &str {
        self.version
            .as_deref()
            .unwrap_or_else(|| self.profile.default_version())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub default_language: Option<String>,
    pub output: PathBuf,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            default_language: None,
            output: PathBuf::from("captions.srt"),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        config.apply_env()?;
        Ok(config)
    }

    /// Read a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            YtsrtError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(client) = std::env::var("YTSRT_CLIENT") {
            self.client.profile = client.parse().map_err(YtsrtError::Config)?;
        }
        if let Ok(version) = std::env::var("YTSRT_CLIENT_VERSION") {
            self.client.version = Some(version);
        }
        if let Ok(language) = std::env::var("YTSRT_LANGUAGE") {
            self.default_language = Some(language);
        }
        if let Ok(timeout) = std::env::var("YTSRT_TIMEOUT_SECS") {
            self.timeout_secs = timeout.parse().map_err(|_| {
                YtsrtError::Config(format!("YTSRT_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.client.effective_version().trim().is_empty() {
            return Err(YtsrtError::Config(
                "Client version must not be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(YtsrtError::Config(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Write the configuration to the user config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()
            .ok_or_else(|| YtsrtError::Config("No config directory on this system".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the configuration as TOML, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| YtsrtError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ytsrt").join("config.toml"))
    }
}
