// Configuration loading
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TimelineConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub utilization: UtilizationSettings,
    #[serde(default)]
    pub sampling: SamplingSettings,
    #[serde(default)]
    pub replay: ReplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UtilizationSettings {
    /// Y-axis ceiling for the utilization graph, in percent.
    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SamplingSettings {
    /// Default sampling resolution for series queries, in milliseconds.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplaySettings {
    /// Optional dump file to replay into the timeline at startup.
    pub dump_path: Option<String>,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_ceiling() -> f64 {
    100.0
}

fn default_resolution() -> f64 {
    crate::domain::MIN_DATA_RESOLUTION
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for UtilizationSettings {
    fn default() -> Self {
        Self {
            ceiling: default_ceiling(),
        }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
        }
    }
}

pub fn load_timeline_config() -> anyhow::Result<TimelineConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/timeline").required(false))
        .add_source(config::Environment::with_prefix("TIMELINE").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_config_absent() {
        let config = TimelineConfig::default();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.utilization.ceiling, 100.0);
        assert_eq!(config.sampling.resolution, crate::domain::MIN_DATA_RESOLUTION);
        assert!(config.replay.dump_path.is_none());
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nbind = \"127.0.0.1:9000\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: TimelineConfig = settings.try_deserialize().unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.utilization.ceiling, 100.0);
    }
}
