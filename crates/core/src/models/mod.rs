//! Data models for Hotelier

mod category;
mod convention;
mod equipment;
mod establishment;
pub mod list_entry;
mod maintenance;
mod room;

pub use category::*;
pub use convention::*;
pub use equipment::*;
pub use establishment::*;
pub use list_entry::ListEntry;
pub use maintenance::*;
pub use room::*;

/// A stored or submitted enum value that matches no known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
