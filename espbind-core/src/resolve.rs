//! Type-directed editor-ID resolution
//!
//! Maps a declared Papyrus type to its candidate record-type families and
//! queries the load-order index for an exact (case-insensitive) editor-ID
//! match. Families are tried in the table's declared order and the first hit
//! wins, so a name defined in several families resolves to the earliest one.

use crate::index::RecordIndex;
use crate::types::{FormKey, TypeFamily};

use TypeFamily::*;

/// Papyrus type → candidate record families, tried in declared order.
pub const PAPYRUS_TYPE_FAMILIES: &[(&str, &[TypeFamily])] = &[
    ("Keyword", &[Keyword]),
    ("GlobalVariable", &[Global]),
    ("Quest", &[Quest]),
    ("Faction", &[Faction]),
    ("Actor", &[Npc]),
    ("ActorBase", &[Npc]),
    ("Spell", &[Spell]),
    ("Perk", &[Perk]),
    ("Weapon", &[Weapon]),
    ("Armor", &[Armor]),
    ("Book", &[Book]),
    ("Location", &[Location]),
    ("WorldSpace", &[Worldspace]),
    ("MagicEffect", &[MagicEffect]),
    ("Enchantment", &[ObjectEffect]),
    ("FormList", &[FormList]),
    ("LeveledItem", &[LeveledItem]),
    ("LeveledActor", &[LeveledNpc]),
    ("LeveledSpell", &[LeveledSpell]),
    ("Sound", &[SoundDescriptor, SoundMarker]),
    ("Static", &[Static, MovableStatic]),
    ("Activator", &[Activator]),
    ("Container", &[Container]),
    ("Key", &[Key]),
    ("Potion", &[Ingestible]),
    ("Ingredient", &[Ingredient]),
    ("Race", &[Race]),
    ("Class", &[Class]),
    ("CombatStyle", &[CombatStyle]),
    ("EncounterZone", &[EncounterZone]),
    ("VoiceType", &[VoiceType]),
    ("Furniture", &[Furniture]),
    ("Package", &[Package]),
    ("Idle", &[IdleAnimation]),
    ("Message", &[Message]),
    ("Shout", &[Shout]),
    ("EffectShader", &[EffectShader]),
    ("Explosion", &[Explosion]),
    ("ImageSpaceModifier", &[ImageSpaceAdapter]),
    ("Hazard", &[Hazard]),
    ("Scroll", &[Scroll]),
    ("ArtObject", &[ArtObject]),
    ("Projectile", &[Projectile]),
];

/// Outcome of a resolution attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(FormKey),
    /// Known type, no record with that editor ID in any candidate family.
    NotFound,
    /// Papyrus type with no family mapping. Callers report this as Skipped,
    /// not NotFound.
    Unsupported,
}

/// Candidate families for a Papyrus type name (case-insensitive), in
/// declared order.
pub fn families_for(type_name: &str) -> Option<&'static [TypeFamily]> {
    PAPYRUS_TYPE_FAMILIES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(type_name))
        .map(|(_, families)| *families)
}

/// Primitive Papyrus types never resolve to records; callers must filter
/// them before invoking [`resolve`].
pub fn is_primitive(type_name: &str) -> bool {
    type_name.is_empty()
        || type_name.eq_ignore_ascii_case("String")
        || type_name.eq_ignore_ascii_case("Int")
        || type_name.eq_ignore_ascii_case("Float")
        || type_name.eq_ignore_ascii_case("Bool")
}

/// Resolve an editor ID for a declared Papyrus type. First family wins.
pub fn resolve(index: &RecordIndex, editor_id: &str, type_name: &str) -> Resolution {
    let Some(families) = families_for(type_name) else {
        return Resolution::Unsupported;
    };

    for family in families {
        if let Some(form_key) = index.lookup(*family, editor_id) {
            tracing::debug!("Resolved {editor_id} as {family:?}: {form_key}");
            return Resolution::Found(form_key.clone());
        }
    }

    Resolution::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PluginFile, Record};

    fn index_with(records: Vec<Record>) -> RecordIndex {
        let mut plugin = PluginFile::new("Skyrim.esm");
        plugin.records = records;
        RecordIndex::build([&plugin])
    }

    fn record(editor_id: &str, id: u32, family: TypeFamily) -> Record {
        Record {
            editor_id: editor_id.to_string(),
            id,
            family,
        }
    }

    #[test]
    fn test_primitives_are_filtered_by_name() {
        assert!(is_primitive("Int"));
        assert!(is_primitive("string"));
        assert!(is_primitive(""));
        assert!(!is_primitive("Keyword"));
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let index = index_with(vec![]);
        assert_eq!(resolve(&index, "Anything", "NotAType"), Resolution::Unsupported);
    }

    #[test]
    fn test_known_type_without_match_is_not_found() {
        let index = index_with(vec![record("SomeKeyword", 0x1, Keyword)]);
        assert_eq!(resolve(&index, "OtherKeyword", "Keyword"), Resolution::NotFound);
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        let index = index_with(vec![record("LocTypeInn", 0x1, Keyword)]);
        let Resolution::Found(key) = resolve(&index, "loctypeinn", "keyword") else {
            panic!("expected a hit");
        };
        assert_eq!(key.id, 0x1);
    }

    #[test]
    fn test_first_family_wins_on_ambiguity() {
        // "Sound" maps to [SoundDescriptor, SoundMarker]; a name defined in
        // both must resolve to the SoundDescriptor record.
        let index = index_with(vec![
            record("AmbWind", 0x10, SoundMarker),
            record("AmbWind", 0x20, SoundDescriptor),
        ]);
        assert_eq!(
            resolve(&index, "AmbWind", "Sound"),
            Resolution::Found(FormKey::new("Skyrim.esm", 0x20))
        );
    }

    #[test]
    fn test_second_family_is_tried_when_first_misses() {
        let index = index_with(vec![record("AmbWind", 0x10, SoundMarker)]);
        assert_eq!(
            resolve(&index, "AmbWind", "Sound"),
            Resolution::Found(FormKey::new("Skyrim.esm", 0x10))
        );
    }

    #[test]
    fn test_table_order_is_declared_not_alphabetical() {
        // Resolution walks the table top to bottom; the common
        // quest-scripting types come first.
        assert_eq!(PAPYRUS_TYPE_FAMILIES[0].0, "Keyword");
        assert_eq!(PAPYRUS_TYPE_FAMILIES[1].0, "GlobalVariable");
    }
}
