//! Application configuration: typed global sections plus a free-form bag of
//! per-module settings that each module deserializes on its own.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::paths::home_dir::resolve_home_dir;

/// Environment prefix for layered overrides, e.g. `USERDESK__APP__HOME_DIR`.
pub const ENV_PREFIX: &str = "USERDESK__";

/// Module section that `--base-url` writes into.
pub const DIRECTORY_MODULE: &str = "users_console";

/// Home directory name below the platform home when none is configured.
const HOME_SUBDIR: &str = ".userdesk";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    /// Subsystem name → logging section. `None` until set by YAML, env or CLI.
    pub logging: Option<LoggingConfig>,
    /// Directory of `<module>.yaml` files merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    #[serde(default)]
    pub modules: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
    /// Empty selects `~/.userdesk` (`%APPDATA%\.userdesk` on Windows).
    /// Absolute after loading.
    #[serde(default)]
    pub home_dir: String,
}

/// Subsystem (target prefix, or `default`) → settings.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    /// Level on stderr, `off` to silence.
    pub console_level: String,
    /// Log file, relative to the home dir. Empty: no file of its own.
    pub file: String,
    #[serde(default)]
    pub file_level: String,
    /// Rotated files are dropped after this many days unless
    /// `max_backups` is set.
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub max_backups: Option<usize>,
    /// Rotate once the file grows past this size.
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

/// Quiet console (`warn`) so log lines stay out of the interactive screen;
/// the file gets everything down to `debug`.
pub fn default_logging_config() -> LoggingConfig {
    HashMap::from([(
        "default".to_string(),
        Section {
            console_level: "warn".to_string(),
            file: "logs/userdesk.log".to_string(),
            file_level: "debug".to_string(),
            max_age_days: Some(7),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    )])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

/// Command line values that feed into the configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub base_url: Option<String>,
    pub print_config: bool,
    pub verbose: u8,
}

/// `-v` count → console level; 0 keeps the configured one.
fn console_level_for(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

impl AppConfig {
    /// Built-in defaults, then `config_path`, then `USERDESK__*` variables
    /// (`__` separates nesting levels). The home dir is resolved and created
    /// and `modules_dir` is merged before returning.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref();
        // figment would quietly treat a missing file as empty.
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }

        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };
        let mut config: AppConfig = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;

        config.resolve_home_dir()?;
        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, Path::new(&dir))?;
        }
        Ok(config)
    }

    /// `load_layered` when a path is given, built-in defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_layered(path);
        }
        let mut config = Self::default();
        config.resolve_home_dir()?;
        Ok(config)
    }

    fn resolve_home_dir(&mut self) -> Result<()> {
        let configured = Some(self.app.home_dir.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let resolved = resolve_home_dir(configured, HOME_SUBDIR, true)
            .context("failed to resolve app.home_dir")?;
        self.app.home_dir = resolved.to_string_lossy().into_owned();
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to render config as YAML")
    }

    /// Command line wins over file and environment.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(url) = &args.base_url {
            let section = self
                .modules
                .entry(DIRECTORY_MODULE.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match section {
                Value::Object(map) => {
                    map.insert("base_url".to_string(), Value::String(url.clone()));
                }
                other => *other = serde_json::json!({ "base_url": url }),
            }
        }

        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let (Some(level), Some(default)) =
            (console_level_for(args.verbose), logging.get_mut("default"))
        {
            default.console_level = level.to_string();
        }
    }

    /// Lenient: a missing or malformed section yields `T::default()`.
    pub fn module_config<T: DeserializeOwned + Default>(&self, module: &str) -> T {
        self.module_config_required(module).unwrap_or_default()
    }

    /// Strict: a malformed section is an error naming the module. A missing
    /// section reads as `{}` so `#[serde(default)]` fields still apply.
    pub fn module_config_required<T: DeserializeOwned>(&self, module: &str) -> Result<T> {
        let raw = self
            .modules
            .get(module)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        serde_json::from_value(raw).with_context(|| format!("invalid {module} config"))
    }

    /// Absolute once loaded through `load_*`.
    pub fn home_dir(&self) -> PathBuf {
        PathBuf::from(&self.app.home_dir)
    }
}

/// Every `<name>.yml` / `<name>.yaml` in `dir` becomes `modules.<name>`,
/// replacing an inline section of the same name. A missing dir is fine.
fn merge_module_files(modules: &mut HashMap<String, Value>, dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    let entries = fs::read_dir(dir)
        .with_context(|| format!("cannot read modules_dir {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !path.is_file() || !is_yaml {
            continue;
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let section: Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;
        modules.insert(name.to_string(), section);
    }
    Ok(())
}
