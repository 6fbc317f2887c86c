use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::Args;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/financecore.toml";
const ENV_PREFIX: &str = "FINANCECORE";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub timezone: String,
    pub page_size: usize,
    pub login_floor_ms: u64,
    pub request_timeout_secs: u64,
    pub export_dir: String,
    pub state_path: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "https://controle-gastos-familiar-api.onrender.com/api/".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
            page_size: engine::DEFAULT_PAGE_SIZE,
            login_floor_ms: 4500,
            request_timeout_secs: 30,
            export_dir: "exports".to_string(),
            state_path: "config/financecore_state.json".to_string(),
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(AppError::InvalidConfig(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            AppError::InvalidConfig(format!("unknown timezone: {}", self.timezone))
        })
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(chrono::Utc::now().with_timezone(&self.tz()?).date_naive())
    }

    pub fn login_floor(&self) -> Duration {
        Duration::from_millis(self.login_floor_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the Gateway base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long, global = true)]
    pub timezone: Option<String>,
}

pub fn load(args: &ConfigArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(timezone) = &args.timezone {
        settings.timezone = timezone.clone();
    }

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.login_floor(), Duration::from_millis(4500));
        assert_eq!(config.tz().unwrap(), chrono_tz::America::Sao_Paulo);
    }

    #[test]
    fn rejects_zero_page_size_and_unknown_timezone() {
        let config = AppConfig {
            page_size: 0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));

        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn cli_flags_override_file_values() {
        let args = ConfigArgs {
            config: Some("does/not/exist".to_string()),
            base_url: Some("http://127.0.0.1:9/api/".to_string()),
            timezone: Some("Europe/Lisbon".to_string()),
        };
        let config = load(&args).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9/api/");
        assert_eq!(config.timezone, "Europe/Lisbon");
    }
}
