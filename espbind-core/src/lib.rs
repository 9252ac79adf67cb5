//! EspBind Core Library
//!
//! This crate provides the core functionality for EspBind:
//! - Plugin data model (quests, aliases, scripts, property bindings)
//! - Load-order record index with TTL caching
//! - Papyrus property declaration extraction
//! - Type-directed editor-ID resolution
//! - Alias/fragment graph management
//! - Script property binding and auto-fill orchestration

pub mod alias;
pub mod autofill;
pub mod bulk;
pub mod error;
pub mod extract;
pub mod index;
pub mod properties;
pub mod resolve;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use alias::{add_reference_alias, attach_script_to_alias, get_or_create_fragment};
pub use autofill::{auto_fill_alias_script, auto_fill_quest_script, auto_fill_script, AutoFillOutcome};
pub use bulk::{auto_fill_all, auto_fill_quests, BulkOutcome, SCRIPT_EXT};
pub use error::{BindError, Result};
pub use extract::{extract_declarations, extract_from_file};
pub use index::{CacheStats, Clock, IndexCache, RecordIndex, SystemClock, BASE_MASTER, EXPANSION_MASTERS, UPDATE_MASTER};
pub use properties::{
    find_alias_script, find_alias_script_mut, find_quest_script, find_quest_script_mut,
    set_alias_property, set_bool_property, set_float_property, set_int_property,
    set_object_property, set_property_from_str, set_string_property,
};
pub use resolve::{families_for, is_primitive, resolve, Resolution};
pub use store::{load_plugin, save_plugin};
pub use types::{
    AliasKind, FormKey, FragmentAlias, PluginFile, ProjectConfig, PropertyDeclaration,
    PropertyKind, PropertyValue, Quest, QuestAdapter, QuestAlias, Record, RecordIdentifier,
    ScriptEntry, ScriptProperty, TypeFamily, CONFIG_FILE_NAME,
};
