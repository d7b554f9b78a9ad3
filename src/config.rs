use std::convert::TryInto;
use std::ffi::OsStr;
use std::fs::File;

use anyhow::anyhow;
use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::Unquote;

// Set some default values
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_STORE_PATH: &str = "./sound-recommender.db";

pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub data: DataConfig,
}

pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub num_workers: usize,
}

pub struct LogConfig {
    pub level: String,
}

pub struct DataConfig {
    pub store_path: String,
    pub seed_path: Option<String>,
}

impl AppConfig {
    /// Reads the optional config file at `config_path` together with the
    /// environment variables below. Missing values fall back to defaults.
    pub fn new(config_path: String) -> anyhow::Result<AppConfig> {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(&config_path) {
            let config_text = ConfigText::new(config_file, &config_path)
                .map_err(|err| anyhow!("Loading configuration file {} failed: {}", config_path, err))?;
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (
                ConfPath::from(&["server", "host"]),
                OsStr::new("SERVER_HOST"),
            ),
            (
                ConfPath::from(&["server", "port"]),
                OsStr::new("SERVER_PORT"),
            ),
            (
                ConfPath::from(&["server", "num_workers"]),
                OsStr::new("NUM_WORKERS"),
            ),
            (ConfPath::from(&["log", "level"]), OsStr::new("LOG_LEVEL")),
            (
                ConfPath::from(&["data", "store_path"]),
                OsStr::new("STORE_PATH"),
            ),
            (
                ConfPath::from(&["data", "seed_path"]),
                OsStr::new("SEED_PATH"),
            ),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        Ok(AppConfig::parse(&conf))
    }

    fn parse(conf: &Config) -> AppConfig {
        AppConfig {
            server: ServerConfig::parse(conf, ConfPath::from(&["server"])),
            log: LogConfig::parse(conf, ConfPath::from(&["log"])),
            data: DataConfig::parse(conf, ConfPath::from(&["data"])),
        }
    }
}

impl ServerConfig {
    fn parse(conf: &Config, path: ConfPath) -> ServerConfig {
        ServerConfig {
            host: conf
                .get(path.push("host"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_HOST)),
            port: conf
                .get(path.push("port"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_PORT),
            num_workers: conf
                .get(path.push("num_workers"))
                .trim()
                .value()
                // Detect number of CPUs
                .unwrap_or_else(|_| detected_cpus()),
        }
    }
}

fn detected_cpus() -> usize {
    sys_info::cpu_num()
        .ok()
        .and_then(|qty_cpus| qty_cpus.try_into().ok())
        .filter(|qty_cpus: &usize| *qty_cpus > 0)
        .unwrap_or(1)
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            level: conf
                .get(path.push("level"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_LOG_LEVEL)),
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        DataConfig {
            store_path: conf
                .get(path.push("store_path"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_STORE_PATH)),
            seed_path: conf
                .get(path.push("seed_path"))
                .unquote()
                .value()
                .ok()
                .filter(|seed_path: &String| !seed_path.is_empty()),
        }
    }
}

#[cfg(test)]
mod config_test {
    use std::io::Write;

    use super::*;

    #[test]
    fn should_fall_back_to_defaults() {
        let config = AppConfig::parse(&Config::default());
        assert_eq!(DEFAULT_HOST, config.server.host);
        assert_eq!(DEFAULT_PORT, config.server.port);
        assert!(config.server.num_workers > 0);
        assert_eq!(DEFAULT_LOG_LEVEL, config.log.level);
        assert_eq!(DEFAULT_STORE_PATH, config.data.store_path);
        assert_eq!(None, config.data.seed_path);
    }

    #[test]
    fn should_read_config_file() {
        let mut config_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(config_file, "[server]").unwrap();
        writeln!(config_file, "port=9090").unwrap();
        writeln!(config_file, "num_workers=3").unwrap();
        writeln!(config_file, "[data]").unwrap();
        writeln!(config_file, "store_path=\"/tmp/sounds.db\"").unwrap();
        writeln!(config_file, "seed_path=\"./data/sounds.json\"").unwrap();

        let config_path = config_file.path().display().to_string();
        let config = AppConfig::new(config_path).unwrap();

        assert_eq!(9090, config.server.port);
        assert_eq!(3, config.server.num_workers);
        assert_eq!("/tmp/sounds.db", config.data.store_path);
        assert_eq!(Some("./data/sounds.json".to_string()), config.data.seed_path);
    }
}
