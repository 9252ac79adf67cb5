//! Plugin documents

use serde::{Deserialize, Serialize};

use super::{FormKey, Quest, Record, RecordIdentifier, TypeFamily};

/// A plugin document: the decoded content of one master/plugin file.
///
/// The binary codec is an external concern; this tool works on decoded
/// documents (JSON on disk, see [`crate::store`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginFile {
    /// Plugin file name, e.g. `MyMod.esp` (used as the form key origin)
    pub name: String,

    /// Declared master files, in dependency order
    #[serde(default)]
    pub masters: Vec<String>,

    /// Flat record headers (everything that is not a quest)
    #[serde(default)]
    pub records: Vec<Record>,

    /// Quest records, modeled fully because auto-fill mutates them
    #[serde(default)]
    pub quests: Vec<Quest>,
}

impl PluginFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            masters: Vec::new(),
            records: Vec::new(),
            quests: Vec::new(),
        }
    }

    /// Find a quest by editor ID (exact match).
    pub fn quest(&self, editor_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.editor_id == editor_id)
    }

    /// Find a quest by editor ID (exact match), mutably.
    pub fn quest_mut(&mut self, editor_id: &str) -> Option<&mut Quest> {
        self.quests.iter_mut().find(|q| q.editor_id == editor_id)
    }

    /// All indexable identifiers in this plugin: flat records plus quests
    /// (quests are indexable under [`TypeFamily::Quest`]).
    pub fn identifiers(&self) -> impl Iterator<Item = RecordIdentifier> + '_ {
        let records = self.records.iter().map(move |r| RecordIdentifier {
            editor_id: r.editor_id.clone(),
            form_key: FormKey::new(self.name.clone(), r.id),
            family: r.family,
        });
        let quests = self.quests.iter().map(move |q| RecordIdentifier {
            editor_id: q.editor_id.clone(),
            form_key: q.form_key(&self.name),
            family: TypeFamily::Quest,
        });
        records.chain(quests)
    }
}
