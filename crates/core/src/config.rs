//! Event configuration schema and loader
//!
//! An event file names the address prefix, optionally the event schedule,
//! and lists the seed booths the registry starts from.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Booth, BoothId, BoothStage, BoothStatus, Claim, EventSchedule, Position};

/// Built-in demo event: a 3x3 park venue with three approved stalls
pub const DEMO_EVENT_TOML: &str = include_str!("../assets/demo_event.toml");

/// Event configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub event: EventMeta,
    #[serde(default)]
    pub schedule: Option<EventSchedule>,
    #[serde(default)]
    pub booths: Vec<BoothSeed>,
}

/// Event metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMeta {
    /// Address prefix, the `<event>` part of `<event>-<shopName>`
    pub prefix: String,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
}

/// One booth as written in the event file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoothSeed {
    pub id: BoothId,
    pub row: u32,
    pub col: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub status: BoothStatus,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Derived from the prefix when omitted
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<NaiveDate>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read event file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse event TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid event configuration: {0}")]
    Invalid(String),
}

impl EventConfig {
    /// Load and validate an event file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate event TOML
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EventConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The built-in demo event
    pub fn demo() -> Result<Self, ConfigError> {
        Self::from_toml(DEMO_EVENT_TOML)
    }

    /// Check the prefix, the schedule, and every seed entry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event.prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("event prefix is empty".to_string()));
        }

        if let Some(schedule) = &self.schedule {
            if !schedule.is_well_formed() {
                return Err(ConfigError::Invalid(format!(
                    "schedule ends on {} before it starts on {}",
                    schedule.ends_on, schedule.starts_on
                )));
            }
        }

        let mut seen = HashSet::new();
        for seed in &self.booths {
            if !seen.insert(seed.id) {
                return Err(ConfigError::Invalid(format!("duplicate booth id {}", seed.id)));
            }
            seed.to_booth(&self.event.prefix)?;
        }

        Ok(())
    }

    /// Convert seed entries into booth records, in file order
    pub fn seed_booths(&self) -> Result<Vec<Booth>, ConfigError> {
        self.booths
            .iter()
            .map(|seed| seed.to_booth(&self.event.prefix))
            .collect()
    }
}

impl BoothSeed {
    /// Build the booth record this entry describes
    pub fn to_booth(&self, prefix: &str) -> Result<Booth, ConfigError> {
        if self.id == 0 {
            return Err(ConfigError::Invalid("booth id 0 is reserved".to_string()));
        }

        if self.popularity.is_some_and(|p| !p.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "booth {} has a non-finite popularity",
                self.id
            )));
        }

        let stage = match self.status {
            BoothStatus::Unset => {
                if self.name.is_some() || self.address.is_some() {
                    return Err(ConfigError::Invalid(format!(
                        "booth {} is unset but carries a name or address",
                        self.id
                    )));
                }
                BoothStage::Unset
            }
            BoothStatus::Pending => BoothStage::Pending(self.claim(prefix)?),
            BoothStatus::Approved => BoothStage::Approved(self.claim(prefix)?),
            BoothStatus::Rejected => BoothStage::Rejected(self.claim(prefix)?),
        };

        Ok(Booth {
            id: self.id,
            row: self.row,
            col: self.col,
            position: Position::new(self.x, self.y),
            stage,
            views: self.views,
            popularity: self.popularity,
        })
    }

    fn claim(&self, prefix: &str) -> Result<Claim, ConfigError> {
        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "booth {} is {} but has no name",
                    self.id, self.status
                )))
            }
        };

        let submitted_at = self.submitted_at.ok_or_else(|| {
            ConfigError::Invalid(format!(
                "booth {} is {} but has no submitted_at",
                self.id, self.status
            ))
        })?;

        let mut claim = Claim::new(
            prefix,
            name,
            self.description.as_deref().unwrap_or_default(),
            submitted_at,
        );
        if let Some(address) = &self.address {
            if address.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "booth {} has a blank address",
                    self.id
                )));
            }
            claim.address = address.clone();
        }
        Ok(claim)
    }
}
