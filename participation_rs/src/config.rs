//! Configuration types and loading for the forum participation loader.
//!
//! Precedence: CLI options, then environment, then the config file, then
//! built-in defaults. Text overrides merge instead: file entries first, CLI
//! entries on top.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use participation_report::TextCatalog;
use serde::{Deserialize, Serialize};

/// Survey Tool web application root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/cldr-apps/";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default config file location (before `~` expansion).
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/forum-participation/config.toml";

pub const ENV_BASE_URL: &str = "FORUM_PARTICIPATION_BASE_URL";
pub const ENV_SESSION: &str = "FORUM_PARTICIPATION_SESSION";

/// Config file format (TOML, or JSON for any other extension).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub session: Option<String>,
    pub timeout_ms: Option<u64>,
    pub log_level: Option<String>,
    /// Text key → display text overrides
    pub texts: BTreeMap<String, String>,
}

/// Resolved runtime parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedParams {
    pub base_url: String,
    pub session: Option<String>,
    pub request_timeout: Duration,
    pub log_level: String,
    pub texts: BTreeMap<String, String>,
}

impl ResolvedParams {
    /// Defaults for everything except the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            session: None,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            texts: BTreeMap::new(),
        }
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = Some(session.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(key.into(), text.into());
        self
    }

    /// Built-in English strings with the configured overrides applied.
    pub fn text_catalog(&self) -> TextCatalog {
        TextCatalog::default().with_overrides(self.texts.clone())
    }
}

/// CLI options that can override config file settings.
///
/// Lets the binary hand its parsed arguments to [`resolve_params`] without
/// the library depending on clap types.
pub trait CliOptions {
    fn base_url(&self) -> Option<String>;
    fn session(&self) -> Option<String>;
    fn timeout_ms(&self) -> Option<u64>;
    fn log_level(&self) -> Option<String>;
    fn texts(&self) -> Vec<(String, String)>;
}

pub fn expand_path(raw: impl AsRef<str>) -> PathBuf {
    let s = raw.as_ref();
    if let Some(stripped) = s.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(s)
}

/// Load a config file. A missing file is not an error.
pub fn load_config(path: &Path) -> Result<Option<FileConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let cfg: FileConfig = match ext.as_str() {
        "toml" => toml::from_str(&data)
            .with_context(|| format!("failed to parse toml config {}", path.display()))?,
        _ => serde_json::from_str(&data)
            .with_context(|| format!("failed to parse json config {}", path.display()))?,
    };
    Ok(Some(cfg))
}

/// Split a `KEY=VALUE` text override.
pub fn parse_text_override(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("text override '{raw}' must look like KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("text override '{raw}' has an empty key"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Resolve runtime parameters from CLI options, environment and config file.
pub fn resolve_params<C: CliOptions>(cli: &C, config: Option<&FileConfig>) -> Result<ResolvedParams> {
    let base_url = cli
        .base_url()
        .or_else(|| env_value(ENV_BASE_URL))
        .or_else(|| config.and_then(|c| c.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let session = cli
        .session()
        .or_else(|| env_value(ENV_SESSION))
        .or_else(|| config.and_then(|c| c.session.clone()));

    let timeout_ms = cli
        .timeout_ms()
        .or_else(|| config.and_then(|c| c.timeout_ms))
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    if timeout_ms == 0 {
        return Err(anyhow!("request timeout must be greater than zero"));
    }

    let log_level = cli
        .log_level()
        .or_else(|| config.and_then(|c| c.log_level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    let mut texts = config.map(|c| c.texts.clone()).unwrap_or_default();
    texts.extend(cli.texts());

    Ok(ResolvedParams {
        base_url,
        session,
        request_timeout: Duration::from_millis(timeout_ms),
        log_level,
        texts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use participation_report::TextLookup;
    use serial_test::serial;
    use tempfile::TempDir;

    #[derive(Default)]
    struct TestCli {
        base_url: Option<String>,
        session: Option<String>,
        timeout_ms: Option<u64>,
        log_level: Option<String>,
        texts: Vec<(String, String)>,
    }

    impl CliOptions for TestCli {
        fn base_url(&self) -> Option<String> {
            self.base_url.clone()
        }
        fn session(&self) -> Option<String> {
            self.session.clone()
        }
        fn timeout_ms(&self) -> Option<u64> {
            self.timeout_ms
        }
        fn log_level(&self) -> Option<String> {
            self.log_level.clone()
        }
        fn texts(&self) -> Vec<(String, String)> {
            self.texts.clone()
        }
    }

    fn clear_env() {
        // SAFETY: tests touching the environment run under #[serial].
        unsafe {
            std::env::remove_var(ENV_BASE_URL);
            std::env::remove_var(ENV_SESSION);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_cli_or_config() {
        clear_env();
        let params = resolve_params(&TestCli::default(), None).expect("resolve");
        assert_eq!(params, ResolvedParams::new(DEFAULT_BASE_URL));
    }

    #[test]
    #[serial]
    fn cli_beats_env_beats_file() {
        clear_env();
        let file = FileConfig {
            base_url: Some("http://file/".into()),
            session: Some("file-session".into()),
            timeout_ms: Some(1_000),
            log_level: Some("warn".into()),
            texts: BTreeMap::new(),
        };

        let from_file = resolve_params(&TestCli::default(), Some(&file)).expect("resolve");
        assert_eq!(from_file.base_url, "http://file/");
        assert_eq!(from_file.session.as_deref(), Some("file-session"));
        assert_eq!(from_file.request_timeout, Duration::from_secs(1));
        assert_eq!(from_file.log_level, "warn");

        // SAFETY: serialized test.
        unsafe {
            std::env::set_var(ENV_BASE_URL, "http://env/");
            std::env::set_var(ENV_SESSION, "env-session");
        }
        let from_env = resolve_params(&TestCli::default(), Some(&file)).expect("resolve");
        assert_eq!(from_env.base_url, "http://env/");
        assert_eq!(from_env.session.as_deref(), Some("env-session"));

        let cli = TestCli {
            base_url: Some("http://cli/".into()),
            session: Some("cli-session".into()),
            ..Default::default()
        };
        let from_cli = resolve_params(&cli, Some(&file)).expect("resolve");
        assert_eq!(from_cli.base_url, "http://cli/");
        assert_eq!(from_cli.session.as_deref(), Some("cli-session"));
        clear_env();
    }

    #[test]
    #[serial]
    fn text_overrides_merge_file_then_cli() {
        clear_env();
        let file = FileConfig {
            texts: BTreeMap::from([
                ("recentLoc".to_string(), "Region".to_string()),
                ("forum_participation_ACT".to_string(), "Todo".to_string()),
            ]),
            ..Default::default()
        };
        let cli = TestCli {
            texts: vec![("recentLoc".into(), "Sprache".into())],
            ..Default::default()
        };
        let params = resolve_params(&cli, Some(&file)).expect("resolve");
        let catalog = params.text_catalog();
        assert_eq!(catalog.get("recentLoc"), "Sprache");
        assert_eq!(catalog.get("forum_participation_ACT"), "Todo");
        assert_eq!(catalog.get("forum_participation_ORG"), "Org Posts");
    }

    #[test]
    #[serial]
    fn zero_timeout_is_rejected() {
        clear_env();
        let cli = TestCli {
            timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(resolve_params(&cli, None).is_err());
    }

    #[test]
    fn load_missing_file_is_none() {
        let temp = TempDir::new().expect("temp dir");
        let cfg = load_config(&temp.path().join("absent.toml")).expect("load");
        assert!(cfg.is_none());
    }

    #[test]
    fn load_toml_and_json() {
        let temp = TempDir::new().expect("temp dir");

        let toml_path = temp.path().join("config.toml");
        fs::write(
            &toml_path,
            r#"
base_url = "https://st.example.org/cldr-apps/"
timeout_ms = 5000

[texts]
recentLoc = "Locale ID"
"#,
        )
        .expect("write toml");
        let cfg = load_config(&toml_path).expect("load").expect("present");
        assert_eq!(cfg.base_url.as_deref(), Some("https://st.example.org/cldr-apps/"));
        assert_eq!(cfg.timeout_ms, Some(5000));
        assert_eq!(cfg.texts.get("recentLoc").map(String::as_str), Some("Locale ID"));

        let json_path = temp.path().join("config.json");
        fs::write(&json_path, r#"{"session": "abc"}"#).expect("write json");
        let cfg = load_config(&json_path).expect("load").expect("present");
        assert_eq!(cfg.session.as_deref(), Some("abc"));
        assert!(cfg.texts.is_empty());
    }

    #[test]
    fn broken_config_reports_path() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "base_url = [").expect("write");
        let err = load_config(&path).expect_err("parse error");
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn text_override_parsing() {
        assert_eq!(
            parse_text_override("recentLoc=Locale=ID").expect("parse"),
            ("recentLoc".to_string(), "Locale=ID".to_string())
        );
        assert!(parse_text_override("novalue").is_err());
        assert!(parse_text_override("=x").is_err());
    }

    #[test]
    fn expand_path_handles_home() {
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(expand_path("~/x.toml"), PathBuf::from(home).join("x.toml"));
        }
        assert_eq!(expand_path("/etc/x.toml"), PathBuf::from("/etc/x.toml"));
    }
}
