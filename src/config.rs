use anyhow::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for HerbTrace
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HerbTraceConfig {
    /// Processing tracker settings
    pub tracker: TrackerConfig,
    /// Single-image verification settings
    pub dashboard: DashboardConfig,
    /// Metadata for the batch created when the tracker is first entered
    pub batch: BatchConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Simulated verification latency per step
    pub verification_delay_ms: u64,
    /// Lowest score a simulated verification can assign
    pub score_floor: u8,
    /// Width of the score range; scores land in [floor, floor + span)
    pub score_span: u8,
    /// Steps a batch is expected to pass through
    pub total_steps: u32,
    /// Verified steps required before certification can be issued
    pub certification_threshold: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Simulated latency of the image verification
    pub verification_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    pub herb_name: String,
    pub scientific_name: String,
    pub collection_location: String,
    pub collector_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit structured JSON log lines instead of plain text
    pub json_logs: bool,
    /// Log counters at shutdown
    pub metrics_enabled: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            verification_delay_ms: 2000,
            score_floor: 85,
            score_span: 15,
            total_steps: 8,
            certification_threshold: 5,
        }
    }
}

impl TrackerConfig {
    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            verification_delay_ms: 3000,
        }
    }
}

impl DashboardConfig {
    pub fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            herb_name: "Tulsi (Holy Basil)".to_string(),
            scientific_name: "Ocimum tenuiflorum".to_string(),
            collection_location: "Himalayan Foothills".to_string(),
            collector_name: "Rajesh Kumar".to_string(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: true,
            metrics_enabled: true,
        }
    }
}

impl HerbTraceConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (herbtrace.toml, .herbtrace-rc)
    /// 3. Environment variables (prefixed with HERBTRACE_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("herbtrace.toml").exists() {
            builder = builder.add_source(File::with_name("herbtrace"));
        }

        if Path::new(".herbtrace-rc").exists() {
            builder = builder.add_source(
                File::with_name(".herbtrace-rc").format(FileFormat::Toml),
            );
        }

        // HERBTRACE_TRACKER__VERIFICATION_DELAY_MS style keys; single
        // underscores stay inside field names.
        builder = builder.add_source(
            Environment::with_prefix("HERBTRACE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let herbtrace_config: HerbTraceConfig = config.try_deserialize()?;

        Ok(herbtrace_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<HerbTraceConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = HerbTraceConfig::load_env_file();
        HerbTraceConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static HerbTraceConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_prototype_constants() {
        let config = HerbTraceConfig::default();
        assert_eq!(config.tracker.verification_delay(), Duration::from_secs(2));
        assert_eq!(config.tracker.score_floor, 85);
        assert_eq!(config.tracker.score_span, 15);
        assert_eq!(config.tracker.total_steps, 8);
        assert_eq!(config.tracker.certification_threshold, 5);
        assert_eq!(config.dashboard.verification_delay(), Duration::from_secs(3));
        assert_eq!(config.batch.scientific_name, "Ocimum tenuiflorum");
    }

    #[test]
    fn save_round_trips_through_toml() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let path = temp_dir.path().join("herbtrace.toml");

        let mut original = HerbTraceConfig::default();
        original.tracker.verification_delay_ms = 10;
        original.save_to_file(&path)?;

        let text = std::fs::read_to_string(&path)?;
        let reloaded: HerbTraceConfig = toml::from_str(&text)?;
        assert_eq!(reloaded.tracker.verification_delay_ms, 10);
        assert_eq!(reloaded.batch.herb_name, original.batch.herb_name);
        Ok(())
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let reloaded: HerbTraceConfig = toml::from_str("[tracker]\ntotal_steps = 10\n").unwrap();
        assert_eq!(reloaded.tracker.total_steps, 10);
        assert_eq!(reloaded.tracker.certification_threshold, 5);
        assert_eq!(reloaded.observability.log_level, "info");
    }
}
