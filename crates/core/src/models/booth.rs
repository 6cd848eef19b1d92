//! Booth model - one stall slot in the venue grid

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable booth identifier, assigned at seed time
pub type BoothId = u32;

/// Layout position in percent of the venue map
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Lifecycle status as shown to operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothStatus {
    /// Slot never claimed
    #[default]
    Unset,
    /// Claimed, awaiting moderation
    Pending,
    Approved,
    Rejected,
}

impl BoothStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            BoothStatus::Unset => "unset",
            BoothStatus::Pending => "pending",
            BoothStatus::Approved => "approved",
            BoothStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for BoothStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A vendor's claim on a booth
///
/// The address is captured once when the claim is made and is never
/// recomputed from `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    pub submitted_at: NaiveDate,
}

impl Claim {
    pub fn new(prefix: &str, name: &str, description: &str, submitted_at: NaiveDate) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            address: Self::address_for(prefix, name),
            submitted_at,
        }
    }

    /// Build the `<event>-<shopName>` address
    pub fn address_for(prefix: &str, name: &str) -> String {
        format!("{}-{}", prefix, name)
    }
}

/// Where a booth sits in its lifecycle
///
/// Every stage past `Unset` carries the claim that produced it, so a
/// registered booth without a name or address cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BoothStage {
    #[default]
    Unset,
    Pending(Claim),
    Approved(Claim),
    /// Rejected claims keep their data; the slot reads as unregistered
    Rejected(Claim),
}

impl BoothStage {
    pub fn status(&self) -> BoothStatus {
        match self {
            BoothStage::Unset => BoothStatus::Unset,
            BoothStage::Pending(_) => BoothStatus::Pending,
            BoothStage::Approved(_) => BoothStatus::Approved,
            BoothStage::Rejected(_) => BoothStatus::Rejected,
        }
    }

    pub fn claim(&self) -> Option<&Claim> {
        match self {
            BoothStage::Unset => None,
            BoothStage::Pending(claim)
            | BoothStage::Approved(claim)
            | BoothStage::Rejected(claim) => Some(claim),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, BoothStage::Pending(_) | BoothStage::Approved(_))
    }
}

/// A physical stall slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booth {
    pub id: BoothId,
    pub row: u32,
    pub col: u32,
    pub position: Position,
    #[serde(flatten)]
    pub stage: BoothStage,
    /// Display counter fed from outside the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    /// Display score fed from outside the registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
}

impl Booth {
    /// An empty, never-claimed slot
    pub fn vacant(id: BoothId, row: u32, col: u32, position: Position) -> Self {
        Self {
            id,
            row,
            col,
            position,
            stage: BoothStage::Unset,
            views: None,
            popularity: None,
        }
    }

    pub fn with_stage(mut self, stage: BoothStage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_views(mut self, views: u64) -> Self {
        self.views = Some(views);
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = Some(popularity);
        self
    }

    pub fn status(&self) -> BoothStatus {
        self.stage.status()
    }

    pub fn is_registered(&self) -> bool {
        self.stage.is_registered()
    }

    pub fn claim(&self) -> Option<&Claim> {
        self.stage.claim()
    }

    pub fn name(&self) -> Option<&str> {
        self.claim().map(|c| c.name.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.claim().map(|c| c.description.as_str())
    }

    pub fn address(&self) -> Option<&str> {
        self.claim().map(|c| c.address.as_str())
    }

    pub fn submitted_at(&self) -> Option<NaiveDate> {
        self.claim().map(|c| c.submitted_at)
    }

    /// Label for listings: the shop name, or "Booth <id>" for empty slots
    pub fn label(&self) -> String {
        match self.name() {
            Some(name) => name.to_string(),
            None => format!("Booth {}", self.id),
        }
    }
}
