//! Script attachments and property bindings

use serde::{Deserialize, Serialize};

use super::FormKey;

/// Sentinel alias index meaning "not an alias reference".
pub const NO_ALIAS: i32 = -1;

/// A compiled script attached to a quest or an alias fragment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEntry {
    pub name: String,

    /// Property bindings, unique by name (case-insensitive). Setters
    /// upsert-by-replace; see [`crate::properties`].
    #[serde(default)]
    pub properties: Vec<ScriptProperty>,
}

impl ScriptEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }
}

/// A named, typed value bound to a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptProperty {
    pub name: String,
    pub value: PropertyValue,
}

/// Closed set of property binding kinds.
///
/// Alias-slot references use `Object` with the owning quest as the form and
/// the alias index set, distinguishing "points at a record" from "points at
/// an alias slot resolved at runtime".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum PropertyValue {
    Object { form: FormKey, alias_index: i32 },
    Int(i32),
    Float(f32),
    Bool(bool),
    String(String),
    ObjectList(Vec<FormKey>),
}

impl PropertyValue {
    /// An object reference with no alias slot.
    pub fn object(form: FormKey) -> Self {
        PropertyValue::Object {
            form,
            alias_index: NO_ALIAS,
        }
    }
}

/// Kind tag for the generic string-valued property setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Object,
    Int,
    Float,
    Bool,
    String,
}

/// A property declaration extracted from Papyrus source. Drives resolution
/// only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclaration {
    pub name: String,
    pub type_name: String,
    pub is_array: bool,
}
