//! Settings store
//!
//! A flat key/value file with a single `[DEFAULT]` section. The whole file is
//! rewritten on every save.

use crate::error::SettingsError;
use std::fs;
use std::path::{Path, PathBuf};

pub const KEY_AUTH_TOKEN: &str = "authToken";
pub const KEY_RETRIEVAL_SPEED: &str = "retrievalSpeed";
pub const KEY_CUTOFF: &str = "latestConversationCutoff";
pub const KEY_LANGUAGE: &str = "selectedLanguage";
pub const KEY_OPENAI_API_KEY: &str = "openAiApiKey";

pub const DEFAULT_RETRIEVAL_SPEED: f64 = 3.0;
pub const DEFAULT_CUTOFF: f64 = 30.0;
pub const DEFAULT_LANGUAGE: &str = "zh_CN";
pub const LANGUAGES: &[&str] = &["en", "zh_CN", "zh_HK"];

pub const RETRIEVAL_SPEED_RANGE: (f64, f64) = (0.25, 10.0);
pub const CUTOFF_RANGE: (f64, f64) = (1.0, 300.0);

const SECTION: &str = "[DEFAULT]";
const FILE_NAME: &str = "settings.ini";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub auth_token: String,
    /// Seconds between polls.
    pub retrieval_speed: f64,
    /// Maximum age in seconds of a conversation we are willing to attach to.
    pub latest_conversation_cutoff: f64,
    pub selected_language: String,
    pub openai_api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            retrieval_speed: DEFAULT_RETRIEVAL_SPEED,
            latest_conversation_cutoff: DEFAULT_CUTOFF,
            selected_language: DEFAULT_LANGUAGE.to_string(),
            openai_api_key: String::new(),
        }
    }
}

impl Settings {
    pub fn has_auth_token(&self) -> bool {
        !self.auth_token.trim().is_empty()
    }

    /// The file is read unclamped, so the range is enforced here.
    pub fn poll_interval(&self) -> std::time::Duration {
        let secs = if self.retrieval_speed.is_finite() {
            self.retrieval_speed
                .clamp(RETRIEVAL_SPEED_RANGE.0, RETRIEVAL_SPEED_RANGE.1)
        } else {
            DEFAULT_RETRIEVAL_SPEED
        };
        std::time::Duration::from_secs_f64(secs)
    }

    /// Parse the file contents. Unknown keys are ignored; malformed numbers
    /// fall back to their default.
    pub fn parse(contents: &str) -> Self {
        let mut settings = Settings::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=').or_else(|| line.split_once(':')) else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            // keys may have been lowercased by another writer
            if let Err(err) = settings.apply(&key.to_ascii_lowercase(), value, false) {
                tracing::warn!("ignoring setting: {}", err);
            }
        }
        settings
    }

    /// Serialize the full record.
    pub fn render(&self) -> String {
        format!(
            "{SECTION}\n{KEY_AUTH_TOKEN} = {}\n{KEY_RETRIEVAL_SPEED} = {}\n{KEY_CUTOFF} = {}\n{KEY_LANGUAGE} = {}\n{KEY_OPENAI_API_KEY} = {}\n",
            self.auth_token,
            self.retrieval_speed,
            self.latest_conversation_cutoff,
            self.selected_language,
            self.openai_api_key,
        )
    }

    /// Set one value by its file key. Numbers are clamped to the ranges the
    /// settings panel allows.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.apply(&key.to_ascii_lowercase(), value.trim(), true)
    }

    fn apply(&mut self, key: &str, value: &str, clamp: bool) -> Result<(), SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            k if k.eq_ignore_ascii_case(KEY_AUTH_TOKEN) => {
                self.auth_token = strip_bearer(value).to_string()
            }
            k if k.eq_ignore_ascii_case(KEY_RETRIEVAL_SPEED) => {
                let speed = parse_seconds(value).ok_or_else(invalid)?;
                self.retrieval_speed = if clamp {
                    speed.clamp(RETRIEVAL_SPEED_RANGE.0, RETRIEVAL_SPEED_RANGE.1)
                } else {
                    speed
                };
            }
            k if k.eq_ignore_ascii_case(KEY_CUTOFF) => {
                let cutoff = parse_seconds(value).ok_or_else(invalid)?;
                self.latest_conversation_cutoff = if clamp {
                    cutoff.clamp(CUTOFF_RANGE.0, CUTOFF_RANGE.1)
                } else {
                    cutoff
                };
            }
            k if k.eq_ignore_ascii_case(KEY_LANGUAGE) => {
                if clamp && !LANGUAGES.contains(&value) {
                    return Err(invalid());
                }
                self.selected_language = value.to_string();
            }
            k if k.eq_ignore_ascii_case(KEY_OPENAI_API_KEY) => {
                self.openai_api_key = value.to_string()
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_seconds(value: &str) -> Option<f64> {
    value
        .trim_end_matches('s')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Users tend to paste the whole header value.
fn strip_bearer(value: &str) -> &str {
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim()
}

/// Where the settings file lives unless overridden.
pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = std::env::var("VOICEMODE_SETTINGS") {
        return PathBuf::from(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("voicemode-chat").join(FILE_NAME);
    }

    PathBuf::from(FILE_NAME)
}

/// File-backed settings. Holds the last loaded or saved record.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    current: Settings,
}

impl SettingsStore {
    /// Load the file at `path`, falling back to defaults when it is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(contents) => Settings::parse(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no settings file at {}, using defaults", path.display());
                Settings::default()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, current })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.current
    }

    /// Replace the record and rewrite the file.
    pub fn save(&mut self, settings: Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, settings.render())?;
        tracing::debug!("settings written to {}", self.path.display());
        self.current = settings;
        Ok(())
    }

    /// Change one key and persist immediately.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&Settings, SettingsError> {
        let mut updated = self.current.clone();
        updated.set(key, value)?;
        self.save(updated)?;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_file() {
        let settings = Settings::parse("");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.retrieval_speed, 3.0);
        assert_eq!(settings.latest_conversation_cutoff, 30.0);
        assert_eq!(settings.selected_language, "zh_CN");
        assert!(!settings.has_auth_token());
    }

    #[test]
    fn test_parse_lowercased_keys() {
        // other writers may lowercase keys
        let contents = "[DEFAULT]\nauthtoken = eyJabc\nretrievalspeed = 1.5\nlatestconversationcutoff = 60.0\nselectedlanguage = zh_HK\nopenaiapikey = sk-1\n";
        let settings = Settings::parse(contents);
        assert_eq!(settings.auth_token, "eyJabc");
        assert_eq!(settings.retrieval_speed, 1.5);
        assert_eq!(settings.latest_conversation_cutoff, 60.0);
        assert_eq!(settings.selected_language, "zh_HK");
        assert_eq!(settings.openai_api_key, "sk-1");
    }

    #[test]
    fn test_malformed_number_keeps_default() {
        let settings = Settings::parse("[DEFAULT]\nretrievalSpeed = fast\n");
        assert_eq!(settings.retrieval_speed, DEFAULT_RETRIEVAL_SPEED);
    }

    #[test]
    fn test_render_then_parse() {
        let settings = Settings {
            auth_token: "tok".into(),
            retrieval_speed: 0.5,
            latest_conversation_cutoff: 120.0,
            selected_language: "en".into(),
            openai_api_key: "sk".into(),
        };
        assert_eq!(Settings::parse(&settings.render()), settings);
    }

    #[test]
    fn test_set_clamps_and_validates() {
        let mut settings = Settings::default();
        settings.set("retrievalSpeed", "0.01").unwrap();
        assert_eq!(settings.retrieval_speed, 0.25);
        settings.set("latestConversationCutoff", "900").unwrap();
        assert_eq!(settings.latest_conversation_cutoff, 300.0);
        settings.set("authToken", "Bearer eyJxyz").unwrap();
        assert_eq!(settings.auth_token, "eyJxyz");

        assert!(matches!(
            settings.set("selectedLanguage", "fr"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.set("theme", "dark"),
            Err(SettingsError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_poll_interval() {
        let settings = Settings {
            retrieval_speed: 2.5,
            ..Settings::default()
        };
        assert_eq!(
            settings.poll_interval(),
            std::time::Duration::from_millis(2500)
        );
    }

    #[test]
    fn test_poll_interval_clamps_file_values() {
        let settings = Settings::parse("[DEFAULT]\nretrievalSpeed = 1e20\n");
        assert_eq!(settings.retrieval_speed, 1e20);
        assert_eq!(settings.poll_interval(), std::time::Duration::from_secs(10));

        let settings = Settings::parse("[DEFAULT]\nretrievalSpeed = 0.001\n");
        assert_eq!(
            settings.poll_interval(),
            std::time::Duration::from_millis(250)
        );

        let settings = Settings {
            retrieval_speed: f64::NAN,
            ..Settings::default()
        };
        assert_eq!(settings.poll_interval(), std::time::Duration::from_secs(3));
    }
}
