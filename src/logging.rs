use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "GRADECALCD_LOG";
const LOG_JSON_ENV: &str = "GRADECALCD_LOG_JSON";
const DEFAULT_LEVEL: &str = "warn";

/// Logging settings read from the environment at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Option<String>,
    pub json: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let level = get(LOG_ENV).filter(|v| !v.trim().is_empty());
        let json = get(LOG_JSON_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self { level, json }
    }

    fn directive(&self) -> String {
        let level = self.level.as_deref().unwrap_or(DEFAULT_LEVEL);
        if level.contains('=') {
            level.to_string()
        } else {
            format!("gradecalcd={level}")
        }
    }
}

/// Installs the stderr subscriber. Stdout carries IPC responses and must
/// never receive log output.
pub fn init_tracing(cfg: &LogConfig) -> anyhow::Result<()> {
    let filter = match cfg.level {
        Some(_) => EnvFilter::try_new(cfg.directive())?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.directive())),
    };

    let registry = tracing_subscriber::registry().with(filter);

    if cfg.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
