//! Plugin data model
//!
//! Serde-backed representation of a plugin document: records, quests,
//! aliases, VM adapters and script property bindings. The binary plugin
//! codec itself is out of scope; documents are stored as JSON (see
//! [`crate::store`]).

mod form;
mod plugin;
mod project;
mod quest;
mod record;
mod script;

pub use form::*;
pub use plugin::*;
pub use project::*;
pub use quest::*;
pub use record::*;
pub use script::*;
