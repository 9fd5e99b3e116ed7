use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::flow::{FlowDefinition, VEHICLE_ONBOARDING};

const CONFIG_FILE: &str = "rideops/wizard.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub general: GeneralConfig,
    pub drafts: DraftConfig,
    pub prefetch: PrefetchConfig,
    /// Extra flows; a flow with a built-in id replaces the built-in
    pub flows: Vec<FlowDefinition>,
}

impl WizardConfig {
    /// `$XDG_CONFIG_HOME/rideops/wizard.toml` or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_FILE))
    }

    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: WizardConfig = toml::from_str(&content)?;
        for flow in &config.flows {
            flow.validate()?;
        }
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn flow(&self, id: &str) -> Result<FlowDefinition> {
        let flow = FlowDefinition::find(id, &self.flows)?;
        flow.validate()?;
        Ok(flow)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    /// Flow started when `--flow` is not given
    pub default_flow: String,
    /// Use demo prefill data and keep drafts in memory only
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "RideOps".to_string(),
            default_flow: VEHICLE_ONBOARDING.to_string(),
            dryrun: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    pub enabled: bool,
    /// Defaults to `<data dir>/rideops/drafts`
    pub dir: Option<PathBuf>,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl DraftConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("rideops")
                .join("drafts")
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrefetchConfig {
    /// TOML file of prefill values keyed by step id
    pub fixtures: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::flow::{FlowError, BOOKING};
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let config = WizardConfig::load_from("/nonexistent/wizard.toml").unwrap();
        assert_eq!(config.general.default_flow, VEHICLE_ONBOARDING);
        assert!(config.drafts.enabled);
        assert!(config.flows.is_empty());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[general]
default_flow = "booking"

[drafts]
dir = "/tmp/rideops-drafts"
"#
        )
        .unwrap();

        let config = WizardConfig::load_from(file.path()).unwrap();
        assert_eq!(config.general.default_flow, BOOKING);
        assert_eq!(config.general.title, "RideOps");
        assert_eq!(config.drafts.resolved_dir(), PathBuf::from("/tmp/rideops-drafts"));
        assert!(config.flow(BOOKING).is_ok());
    }

    #[test]
    fn invalid_custom_flow_is_rejected_at_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[[flows]]
id = "empty"
title = "Empty"
steps = []
"#
        )
        .unwrap();

        assert!(matches!(
            WizardConfig::load_from(file.path()),
            Err(AppError::Flow(FlowError::NoSteps(_)))
        ));
    }

    #[test]
    fn unknown_flow_is_an_error() {
        assert!(matches!(
            WizardConfig::default().flow("staff"),
            Err(AppError::Flow(FlowError::UnknownFlow(_)))
        ));
    }
}
