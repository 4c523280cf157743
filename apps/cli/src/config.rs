use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use units_app::app::{DEFAULT_CALENDAR_NAME, DEFAULT_UNKNOWN_UNITS, DEFAULT_WEEKLY_GUIDELINE};

const CONFIG_DIR_NAME: &str = "units-tracker";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 8080;
pub const PORT_ENV: &str = "UNITS_TRACKER_PORT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub port: u16,
    pub calendar_name: String,
    pub unknown_default: f64,
    pub weekly_guideline: f64,
    pub events_file: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
            unknown_default: DEFAULT_UNKNOWN_UNITS,
            weekly_guideline: DEFAULT_WEEKLY_GUIDELINE,
            events_file: None,
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub paths: ConfigPaths,
    pub created: bool,
}

pub fn load_or_create(file_override: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match file_override {
        Some(path) => path.to_path_buf(),
        None => config_dir()?.join(CONFIG_FILE_NAME),
    };
    load_or_create_at(file)
}

fn load_or_create_at(file: PathBuf) -> Result<ConfigLoad, String> {
    let paths = ConfigPaths { file };

    if paths.file.exists() {
        let contents = fs::read_to_string(&paths.file)
            .map_err(|err| format!("read config {}: {}", paths.file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", paths.file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            paths,
            created: false,
        });
    }

    if let Some(dir) = paths.file.parent() {
        fs::create_dir_all(dir)
            .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    }
    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&paths.file, contents)
        .map_err(|err| format!("write config {}: {}", paths.file.display(), err))?;

    Ok(ConfigLoad {
        config,
        paths,
        created: true,
    })
}

/// `--port` beats the environment, which beats the config file.
pub fn resolve_port(flag: Option<u16>, env_value: Option<&str>, config: &CliConfig) -> Result<u16, String> {
    if let Some(port) = flag {
        return Ok(port);
    }
    match env_value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| format!("invalid {PORT_ENV} value: {value}")),
        None => Ok(config.port),
    }
}

fn config_dir() -> Result<PathBuf, String> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(dir).join(CONFIG_DIR_NAME));
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}
