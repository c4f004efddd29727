use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SETTINGS_FILE: &str = "config.json";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file {0:?} not found")]
    Missing(PathBuf),
    #[error("failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file {path:?} is malformed: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Run settings loaded from the JSON settings document.
///
/// Every field has a default, so a document only needs the keys it changes.
/// Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub api_key_file: PathBuf,
    #[serde(rename = "openai_model")]
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_response_bytes: u64,
    /// Encoding label for articles that are not UTF-8, e.g. `windows-1250`.
    pub input_encoding: Option<String>,
    /// Replacement instruction template; must contain `{article}`.
    pub prompt_file: Option<PathBuf>,
    /// Reduce a full HTML document in the reply to its body fragment.
    pub unwrap_document: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("article.txt"),
            output_file: PathBuf::from("artykul.html"),
            api_key_file: PathBuf::from("API_KEY"),
            model: "gpt-4o-mini".to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
            max_response_bytes: 4 * 1024 * 1024,
            input_encoding: None,
            prompt_file: None,
            unwrap_document: true,
        }
    }
}

/// Values given on the command line that take precedence over the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub model: Option<String>,
}

impl SettingsOverrides {
    pub fn is_empty(&self) -> bool {
        self.input_file.is_none() && self.output_file.is_none() && self.model.is_none()
    }

    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(path) = &self.input_file {
            settings.input_file = path.clone();
        }
        if let Some(path) = &self.output_file {
            settings.output_file = path.clone();
        }
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        settings
    }
}

/// Load settings from a JSON object document.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_settings(&content).map_err(|message| ConfigError::Malformed {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_settings(content: &str) -> Result<Settings, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("top-level value must be a JSON object".to_string());
    }
    let settings: Settings = serde_json::from_value(value).map_err(|e| e.to_string())?;
    settings.check_limits()?;
    Ok(settings)
}

impl Settings {
    /// A zero timeout or size cap would fail every request, so it is refused up front.
    fn check_limits(&self) -> Result<(), String> {
        let limits = [
            ("request_timeout_secs", self.request_timeout_secs),
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("max_response_bytes", self.max_response_bytes),
        ];
        match limits.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(format!("{name} must be greater than zero")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_settings, Settings, SettingsOverrides};
    use std::path::PathBuf;

    #[test]
    fn non_object_documents_are_rejected() {
        assert!(parse_settings("[1, 2]").is_err());
        assert!(parse_settings("\"article.txt\"").is_err());
        assert!(parse_settings("null").is_err());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let err = parse_settings(r#"{"request_timeout_secs": 0}"#).unwrap_err();
        assert_eq!(err, "request_timeout_secs must be greater than zero");
        let err = parse_settings(r#"{"connect_timeout_secs": 0}"#).unwrap_err();
        assert_eq!(err, "connect_timeout_secs must be greater than zero");
        let err = parse_settings(r#"{"max_response_bytes": 0}"#).unwrap_err();
        assert_eq!(err, "max_response_bytes must be greater than zero");
        assert!(parse_settings(r#"{"request_timeout_secs": 1}"#).is_ok());
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let overrides = SettingsOverrides {
            output_file: Some(PathBuf::from("out/page.html")),
            model: Some("gpt-4o".to_string()),
            ..SettingsOverrides::default()
        };
        let settings = overrides.apply(Settings::default());

        assert_eq!(settings.input_file, PathBuf::from("article.txt"));
        assert_eq!(settings.output_file, PathBuf::from("out/page.html"));
        assert_eq!(settings.model, "gpt-4o");
        assert!(SettingsOverrides::default().is_empty());
    }
}
