use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use leadquiz_core::rules::phone::{MAX_DIGITS, MIN_SEQUENCE_WINDOW};
use leadquiz_core::rules::{PhoneRules, SequenceWindow};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "leadquiz";
const CONFIG_FILENAME: &str = "config.toml";

pub const WEBHOOK_URL_ENV: &str = "GOOGLE_SHEETS_WEBHOOK_URL";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const MAX_TEMPERATURE: f32 = 2.0;
pub const DEFAULT_SHEET_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ASSESSMENT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub sheet: SheetConfig,
    pub assessment: AssessmentConfig,
    pub phone: PhoneRules,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentConfig {
    pub api_key_env: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl AssessmentConfig {
    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        env::var(&self.api_key_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sheet: SheetConfig {
                webhook_url: None,
                timeout_secs: DEFAULT_SHEET_TIMEOUT_SECS,
            },
            assessment: AssessmentConfig {
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                endpoint: DEFAULT_ENDPOINT.to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: DEFAULT_TEMPERATURE,
                timeout_secs: DEFAULT_ASSESSMENT_TIMEOUT_SECS,
            },
            phone: PhoneRules::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid sheet.webhook_url: {0}")]
    InvalidWebhookUrl(String),
    #[error("invalid assessment.endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("invalid {field} value: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error("invalid phone.sequence_window value: {0}")]
    InvalidSequenceWindow(usize),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    sheet: Option<SheetFile>,
    assessment: Option<AssessmentFile>,
    phone: Option<PhoneFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetFile {
    webhook_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssessmentFile {
    api_key_env: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PhoneFile {
    sequence_window: Option<usize>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let env_webhook = env::var(WEBHOOK_URL_ENV).ok();
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => {
            return merge_config(ConfigFile::default(), env_webhook)
        }
        Err(ConfigError::InvalidConfigPath(_)) if !required => {
            return merge_config(ConfigFile::default(), env_webhook)
        }
        Err(err) => return Err(err),
    };
    let parsed = load_at_path(&path, required)?.unwrap_or_default();
    merge_config(parsed, env_webhook)
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(parsed))
}

fn merge_config(parsed: ConfigFile, env_webhook: Option<String>) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    let mut webhook_url = None;
    if let Some(sheet) = parsed.sheet {
        webhook_url = sheet.webhook_url;
        if let Some(timeout) = sheet.timeout_secs {
            config.sheet.timeout_secs = validate_timeout("sheet.timeout_secs", timeout)?;
        }
    }
    let webhook_url = webhook_url
        .or(env_webhook)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    if let Some(url) = webhook_url {
        if !is_https_url(&url) {
            return Err(ConfigError::InvalidWebhookUrl(url));
        }
        config.sheet.webhook_url = Some(url);
    }

    if let Some(assessment) = parsed.assessment {
        if let Some(name) = assessment.api_key_env {
            config.assessment.api_key_env = non_empty("assessment.api_key_env", name)?;
        }
        if let Some(endpoint) = assessment.endpoint {
            let endpoint = endpoint.trim().trim_end_matches('/').to_string();
            if !is_https_url(&endpoint) {
                return Err(ConfigError::InvalidEndpoint(endpoint));
            }
            config.assessment.endpoint = endpoint;
        }
        if let Some(model) = assessment.model {
            config.assessment.model = non_empty("assessment.model", model)?;
        }
        if let Some(temperature) = assessment.temperature {
            if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
                return Err(ConfigError::InvalidField {
                    field: "assessment.temperature",
                    value: temperature.to_string(),
                });
            }
            config.assessment.temperature = temperature;
        }
        if let Some(timeout) = assessment.timeout_secs {
            config.assessment.timeout_secs =
                validate_timeout("assessment.timeout_secs", timeout)?;
        }
    }

    if let Some(phone) = parsed.phone {
        if let Some(window) = phone.sequence_window {
            if !(MIN_SEQUENCE_WINDOW..=MAX_DIGITS).contains(&window) {
                return Err(ConfigError::InvalidSequenceWindow(window));
            }
            config.phone = PhoneRules::with_sequence_window(SequenceWindow::Sliding(window));
        }
    }

    Ok(config)
}

fn is_https_url(raw: &str) -> bool {
    matches!(Url::parse(raw), Ok(url) if url.scheme() == "https" && url.host_str().is_some())
}

fn validate_timeout(field: &'static str, value: u64) -> Result<u64> {
    if value == 0 {
        return Err(ConfigError::InvalidField {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn non_empty(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidField { field, value });
    }
    Ok(trimmed.to_string())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, AssessmentFile, ConfigError, ConfigFile, PhoneFile,
        SheetFile, DEFAULT_MODEL,
    };
    use leadquiz_core::rules::{PhoneRules, SequenceWindow};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    fn sheet(url: &str) -> Option<SheetFile> {
        Some(SheetFile {
            webhook_url: Some(url.to_string()),
            timeout_secs: None,
        })
    }

    #[test]
    fn merge_config_defaults() {
        let merged = merge_config(ConfigFile::default(), None).expect("merge");
        assert_eq!(merged.sheet.webhook_url, None);
        assert_eq!(merged.assessment.model, DEFAULT_MODEL);
        assert_eq!(merged.assessment.api_key_env, "API_KEY");
        assert_eq!(merged.phone, PhoneRules::default());
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            sheet: Some(SheetFile {
                webhook_url: Some("https://script.google.com/macros/s/abc/exec".to_string()),
                timeout_secs: Some(10),
            }),
            assessment: Some(AssessmentFile {
                api_key_env: Some("GEMINI_KEY".to_string()),
                endpoint: Some("https://example.com/v1beta/".to_string()),
                model: Some("gemini-pro".to_string()),
                temperature: Some(0.2),
                timeout_secs: Some(15),
            }),
            phone: Some(PhoneFile {
                sequence_window: Some(6),
            }),
        };
        let merged = merge_config(parsed, None).expect("merge");
        assert_eq!(
            merged.sheet.webhook_url.as_deref(),
            Some("https://script.google.com/macros/s/abc/exec")
        );
        assert_eq!(merged.sheet.timeout_secs, 10);
        assert_eq!(merged.assessment.endpoint, "https://example.com/v1beta");
        assert_eq!(merged.assessment.model, "gemini-pro");
        assert_eq!(merged.assessment.timeout_secs, 15);
        assert_eq!(
            merged.phone.sequence_window,
            SequenceWindow::Sliding(6)
        );
    }

    #[test]
    fn merge_config_prefers_file_webhook_over_env() {
        let parsed = ConfigFile {
            sheet: sheet("https://file.example.com/hook"),
            ..ConfigFile::default()
        };
        let merged =
            merge_config(parsed, Some("https://env.example.com/hook".to_string())).expect("merge");
        assert_eq!(
            merged.sheet.webhook_url.as_deref(),
            Some("https://file.example.com/hook")
        );

        let merged = merge_config(
            ConfigFile::default(),
            Some("https://env.example.com/hook".to_string()),
        )
        .expect("merge");
        assert_eq!(
            merged.sheet.webhook_url.as_deref(),
            Some("https://env.example.com/hook")
        );
    }

    #[test]
    fn merge_config_rejects_plain_http_webhook() {
        let parsed = ConfigFile {
            sheet: sheet("http://example.com/hook"),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWebhookUrl(_)));
    }

    #[test]
    fn merge_config_rejects_out_of_range_values() {
        let parsed = ConfigFile {
            assessment: Some(AssessmentFile {
                api_key_env: None,
                endpoint: None,
                model: None,
                temperature: Some(3.5),
                timeout_secs: None,
            }),
            ..ConfigFile::default()
        };
        assert!(matches!(
            merge_config(parsed, None).unwrap_err(),
            ConfigError::InvalidField {
                field: "assessment.temperature",
                ..
            }
        ));

        let parsed = ConfigFile {
            phone: Some(PhoneFile {
                sequence_window: Some(2),
            }),
            ..ConfigFile::default()
        };
        assert!(matches!(
            merge_config(parsed, None).unwrap_err(),
            ConfigError::InvalidSequenceWindow(2)
        ));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[sheet]\nwebhook_url = \"https://example.com/exec\"\n[assessment]\nmodel = \"m\"\n[phone]\nsequence_window = 6\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let parsed = load_at_path(&path, true).expect("load").expect("config");
        let config = merge_config(parsed, None).expect("merge");
        assert_eq!(config.sheet.webhook_url.as_deref(), Some("https://example.com/exec"));
        assert_eq!(config.assessment.model, "m");
        assert_eq!(config.phone.sequence_window, SequenceWindow::Sliding(6));
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[sheet]\nurl = \"https://example.com\"\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn load_at_path_rejects_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write config");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).expect("chmod");

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }
}
