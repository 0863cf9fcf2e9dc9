//! Loader for portal configuration with YAML + environment overlays.
//!
//! Every section has defaults, so an empty configuration is valid and points
//! the client at a backend on `http://127.0.0.1:1314`.
//!
//! Precedence, lowest first: YAML files in the order they were attached, then
//! `TIANYAN__SECTION__KEY` environment variables. String values may reference
//! other variables as `${VAR}`; expansion runs after merging.
//!
//! ```yaml
//! backend:
//!   base_url: "http://127.0.0.1:1314"
//!   search_path: "search/"
//!   results_path: "show/"
//!   timeout_secs: 20          # optional; no timeout when absent
//! quote:
//!   enabled: true
//!   endpoint: "https://v1.hitokoto.cn"
//! extractor:
//!   convention: keywords      # or description_word
//!   max_results: 200
//! pager:
//!   page_size: 10
//!   max_controls: 10
//! ui:
//!   title_suffix: " - 天眼搜索"
//! logging:
//!   format: text              # or json
//!   filter: info
//!   stderr: false
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tianyan_common::observability::LogFormat;
use tianyan_common::{APP_NAME, DEFAULT_TITLE_SUFFIX};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "TIANYAN";

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "tianyan.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub backend: BackendConfig,
    pub quote: QuoteConfig,
    pub extractor: ExtractorConfig,
    pub pager: PagerConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Where the search backend lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub search_path: String,
    pub results_path: String,
    pub timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:1314".into(),
            search_path: "search/".into(),
            results_path: "show/".into(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://v1.hitokoto.cn".into(),
        }
    }
}

/// Which key names the backend uses for result fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConventionKind {
    #[default]
    Keywords,
    DescriptionWord,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub convention: ConventionKind,
    pub max_results: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            convention: ConventionKind::Keywords,
            max_results: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    pub page_size: usize,
    pub max_controls: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_controls: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title_suffix: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title_suffix: DEFAULT_TITLE_SUFFIX.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub filter: String,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            filter: "info".into(),
            stderr: false,
        }
    }
}

/// `~/.config/tianyan/tianyan.yaml` (or the platform equivalent).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct PortalConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: &'static str,
}

impl Default for PortalConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalConfigLoader {
    /// Start with defaults only; `TIANYAN__` env overrides are applied at load time.
    ///
    /// ```
    /// use tianyan_config::PortalConfigLoader;
    ///
    /// let config = PortalConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.backend.base_url, "http://127.0.0.1:1314");
    /// assert_eq!(config.pager.page_size, 10);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: ENV_PREFIX,
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when it does not exist.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use tianyan_config::{ConventionKind, PortalConfigLoader};
    ///
    /// let cfg = PortalConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// extractor:
    ///   convention: description_word
    /// pager:
    ///   max_controls: 5
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.extractor.convention, ConventionKind::DescriptionWord);
    /// assert_eq!(cfg.extractor.max_results, 200);
    /// assert_eq!(cfg.pager.max_controls, 5);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use tianyan_config::PortalConfigLoader;
    ///
    /// unsafe { std::env::set_var("PORTAL_HOST", "http://search.lan:1314"); }
    ///
    /// let config = PortalConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// backend:
    ///   base_url: "${PORTAL_HOST}"
    ///   timeout_secs: 3
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.backend.base_url, "http://search.lan:1314");
    /// assert_eq!(config.backend.timeout_secs, Some(3));
    /// assert_eq!(config.backend.search_path, "search/");
    ///
    /// unsafe { std::env::remove_var("PORTAL_HOST"); }
    /// ```
    pub fn load(self) -> Result<PortalConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: PortalConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("BACKEND_PORT", Some("1314"), || {
            let mut v = json!("http://127.0.0.1:${BACKEND_PORT}/");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("http://127.0.0.1:1314/"));
        });
    }

    #[test]
    fn expands_nested_sections() {
        temp_env::with_vars([("HOST", Some("search.lan")), ("PORT", Some("80"))], || {
            let mut v = json!({
                "backend": { "base_url": "http://${HOST}:${PORT}" },
                "paths": ["$HOST/show/", 3, false, null]
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "backend": { "base_url": "http://search.lan:80" },
                    "paths": ["search.lan/show/", 3, false, null]
                })
            );
        });
    }

    #[test]
    fn expands_chained_references() {
        temp_env::with_vars(
            [
                ("INNER", Some("1314")),
                ("MIDDLE", Some("127.0.0.1:${INNER}")),
                ("OUTER", Some("http://${MIDDLE}")),
            ],
            || {
                let mut v = json!("${OUTER}/search/");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("http://127.0.0.1:1314/search/"));
            },
        );
    }

    #[test]
    fn cyclic_references_terminate() {
        temp_env::with_vars([("PING", Some("${PONG}")), ("PONG", Some("${PING}"))], || {
            let mut v = json!("a=${PING};");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("a=") && s.ends_with(';'));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("x-${TIANYAN_SURELY_UNSET}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("x-${TIANYAN_SURELY_UNSET}"));
    }

    #[test]
    fn user_config_path_ends_with_app_file() {
        if let Some(p) = user_config_path() {
            assert!(p.ends_with(Path::new(APP_NAME).join(CONFIG_FILE_NAME)));
        }
    }
}
