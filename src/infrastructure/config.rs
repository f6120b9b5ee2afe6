use anyhow::Context;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://script.google.com/macros/s/TU_DEPLOY_ID/exec";
const DEFAULT_READ_KEY: &str = "TU_READ_KEY_SEGURA";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_REFRESH_SECS: i64 = 60;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub source: SourceSettings,
    pub server: ServerSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub base_url: String,
    /// Used when the page URL carries no `key`.
    pub default_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub refresh_interval_secs: u64,
}

impl DashboardSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl AppConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.source.base_url.trim().is_empty() {
            anyhow::bail!("source.base_url must not be empty");
        }
        reqwest::Url::parse(&self.source.base_url)
            .with_context(|| format!("Invalid source.base_url {:?}", self.source.base_url))?;
        if self.dashboard.refresh_interval_secs == 0 {
            anyhow::bail!("dashboard.refresh_interval_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Load `config/dashboard.*` (optional) with `FETALALERT__*` environment overrides.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("FETALALERT").separator("__"));

    build_config(builder)
}

fn build_config(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<AppConfig> {
    let settings = builder
        .set_default("source.base_url", DEFAULT_BASE_URL)?
        .set_default("source.default_key", DEFAULT_READ_KEY)?
        .set_default("server.bind_addr", DEFAULT_BIND_ADDR)?
        .set_default("dashboard.refresh_interval_secs", DEFAULT_REFRESH_SECS)?
        .build()
        .context("Failed to load dashboard configuration")?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
