//! Booth Core Library
//!
//! Booth models, the registration/moderation registry, dashboard statistics,
//! and event configuration for the market object-address scheme.

pub mod clock;
pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod registry;
pub mod shared;
pub mod stats;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BoothSeed, ConfigError, EventConfig, EventMeta};
pub use error::{Error, Result};
pub use models::*;
pub use registry::{BoothRegistry, Decision};
pub use shared::SharedRegistry;
pub use stats::{Occupancy, Statistics, ViewRank};
