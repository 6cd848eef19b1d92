//! Data models for the booth registry

mod booth;
mod schedule;

pub use booth::*;
pub use schedule::*;
