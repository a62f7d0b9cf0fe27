use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsOptions, DEFAULT_WEEKS_BACK};

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "JournalCore";
const APP_NAME: &str = "journal";

pub const CONFIG_ENV: &str = "JOURNAL_CONFIG";
pub const MAX_WEEKS_BACK: u32 = 520;
pub const MAX_LOOKBACK_DAYS: u32 = MAX_WEEKS_BACK * 7;

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        if self.paths.config_file.exists() {
            return self.load();
        }
        let mut cfg = AppConfig::default();
        cfg.post_load();
        self.persist(&cfg)?;
        Ok(cfg)
    }

    pub fn load(&self) -> Result<AppConfig> {
        let file = &self.paths.config_file;
        let raw =
            fs::read_to_string(file).with_context(|| format!("reading config {}", file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }

    fn persist(&self, cfg: &AppConfig) -> Result<()> {
        let file = &self.paths.config_file;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let body = toml::to_string_pretty(cfg).context("serializing default config")?;
        fs::write(file, body).with_context(|| format!("writing config {}", file.display()))?;
        tracing::info!(path = %file.display(), "wrote default config");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var(CONFIG_ENV).ok().map(PathBuf::from);

        let config_dir = match &override_config {
            Some(p) if p.is_dir() => p.clone(),
            Some(p) => p.parent().map(Path::to_path_buf).unwrap_or_else(|| p.clone()),
            None => ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
                .context("resolving XDG project directories")?
                .config_dir()
                .to_path_buf(),
        };

        let config_file = override_config
            .filter(|p| p.is_file() || p.extension().is_some())
            .unwrap_or_else(|| config_dir.join("config.toml"));

        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let config_file = config_dir.join("config.toml");
        Self {
            config_dir,
            config_file,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analytics: AnalyticsOptions,
}

impl AppConfig {
    fn post_load(&mut self) {
        let analytics = &mut self.analytics;
        if analytics.weeks_back == 0 {
            tracing::warn!("weeks_back of 0 in config, falling back to {DEFAULT_WEEKS_BACK}");
            analytics.weeks_back = DEFAULT_WEEKS_BACK;
        }
        if analytics.weeks_back > MAX_WEEKS_BACK {
            tracing::warn!(
                weeks_back = analytics.weeks_back,
                "weeks_back too large in config, capping at {MAX_WEEKS_BACK}"
            );
            analytics.weeks_back = MAX_WEEKS_BACK;
        }
        if analytics.lookback_days > MAX_LOOKBACK_DAYS {
            tracing::warn!(
                lookback_days = analytics.lookback_days,
                "lookback_days too large in config, capping at {MAX_LOOKBACK_DAYS}"
            );
            analytics.lookback_days = MAX_LOOKBACK_DAYS;
        }
    }
}
