//! Record headers and type families

use serde::{Deserialize, Serialize};

use super::FormKey;

/// Capability tag grouping record kinds for type-directed resolution.
///
/// A Papyrus type maps to one or more families (see [`crate::resolve`]);
/// the load-order index keeps one name table per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFamily {
    Keyword,
    Global,
    Quest,
    Faction,
    Npc,
    Spell,
    Perk,
    Weapon,
    Armor,
    Book,
    Location,
    Worldspace,
    MagicEffect,
    ObjectEffect,
    FormList,
    LeveledItem,
    LeveledNpc,
    LeveledSpell,
    SoundDescriptor,
    SoundMarker,
    Static,
    MovableStatic,
    Activator,
    Container,
    Key,
    Ingestible,
    Ingredient,
    Race,
    Class,
    CombatStyle,
    EncounterZone,
    VoiceType,
    Furniture,
    Package,
    IdleAnimation,
    Message,
    Shout,
    EffectShader,
    Explosion,
    ImageSpaceAdapter,
    Hazard,
    Scroll,
    ArtObject,
    Projectile,
}

/// Flat record header inside a plugin document. Only the fields needed for
/// index building are modeled; record bodies are opaque to this tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Editor ID (the human-readable symbol auto-fill matches against)
    pub editor_id: String,

    /// Local form ID within the owning plugin
    pub id: u32,

    /// Record kind family
    pub family: TypeFamily,
}

/// A single entry produced by an index scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIdentifier {
    pub editor_id: String,
    pub form_key: FormKey,
    pub family: TypeFamily,
}
