//! Load-order record index and its TTL cache
//!
//! Builds a read-only editor-ID index over the fixed master load order
//! (base → update → expansions); later files override earlier ones for the
//! same editor ID. Building the index means decoding every master file, so
//! the result is cached in a single slot with a 5-minute TTL.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{BindError, Result};
use crate::store::load_plugin;
use crate::types::{FormKey, PluginFile, TypeFamily};

/// Mandatory base master. Index builds fail without it.
pub const BASE_MASTER: &str = "Skyrim.esm";

/// Optional incremental-update master, layered directly after the base.
pub const UPDATE_MASTER: &str = "Update.esm";

/// Optional expansion masters, layered in this fixed precedence.
pub const EXPANSION_MASTERS: [&str; 3] = ["Dawnguard.esm", "HearthFires.esm", "Dragonborn.esm"];

/// Immutable editor-ID → form-key index, one name table per type family.
///
/// Lookups are case-insensitive exact matches. Later plugins in the build
/// order shadow earlier definers of the same editor ID.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    families: HashMap<TypeFamily, HashMap<String, FormKey>>,
    plugin_count: usize,
}

impl RecordIndex {
    /// Build an index over an ordered plugin list.
    pub fn build<'a>(plugins: impl IntoIterator<Item = &'a PluginFile>) -> Self {
        let mut index = RecordIndex::default();
        for plugin in plugins {
            index.apply(plugin);
        }
        index
    }

    /// Layer one more plugin on top, overriding existing definitions.
    fn apply(&mut self, plugin: &PluginFile) {
        for ident in plugin.identifiers() {
            self.families
                .entry(ident.family)
                .or_default()
                .insert(ident.editor_id.to_lowercase(), ident.form_key);
        }
        self.plugin_count += 1;
    }

    /// Resolve an editor ID within one family (case-insensitive).
    pub fn lookup(&self, family: TypeFamily, editor_id: &str) -> Option<&FormKey> {
        self.families
            .get(&family)?
            .get(&editor_id.to_lowercase())
    }

    /// Number of plugins layered into this index.
    pub fn plugin_count(&self) -> usize {
        self.plugin_count
    }
}

/// Injectable time source, so cache TTL behavior is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time source used outside of tests.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheSlot {
    index: Arc<RecordIndex>,
    data_folder: PathBuf,
    built_at: Instant,
}

/// Single-slot TTL cache over the base load-order index.
///
/// Owned by the composition root and passed explicitly; last writer wins.
/// Requesting an index for a different data folder evicts the current entry.
pub struct IndexCache {
    ttl: Duration,
    clock: Box<dyn Clock>,
    slot: Mutex<Option<CacheSlot>>,
}

/// Snapshot of the cache state.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub cached: bool,
    pub age: Duration,
    pub data_folder: Option<PathBuf>,
    pub expired: bool,
}

impl IndexCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

    pub fn new() -> Self {
        Self::with_clock(Self::DEFAULT_TTL, Box::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Get the base index for a data folder, rebuilding if the cached entry
    /// is absent, expired, for a different folder, or a refresh is forced.
    ///
    /// Nothing is cached on failure.
    pub fn get_or_build(
        &self,
        data_folder: &Path,
        use_cache: bool,
        force_refresh: bool,
    ) -> Result<Arc<RecordIndex>> {
        if use_cache && !force_refresh {
            let slot = self.slot.lock().expect("index cache poisoned");
            if let Some(entry) = slot.as_ref() {
                let age = self.clock.now().saturating_duration_since(entry.built_at);
                if age < self.ttl && entry.data_folder == data_folder {
                    tracing::debug!("Using cached record index (age: {:.1}s)", age.as_secs_f64());
                    return Ok(Arc::clone(&entry.index));
                }
                tracing::debug!("Cached record index expired or data folder changed, rebuilding");
            }
        }

        let index = Arc::new(self.build_base(data_folder)?);

        let mut slot = self.slot.lock().expect("index cache poisoned");
        *slot = Some(CacheSlot {
            index: Arc::clone(&index),
            data_folder: data_folder.to_path_buf(),
            built_at: self.clock.now(),
        });

        Ok(index)
    }

    /// Build the base index: base master → update → expansions, in fixed
    /// precedence. Only the base master is mandatory.
    fn build_base(&self, data_folder: &Path) -> Result<RecordIndex> {
        if !data_folder.is_dir() {
            return Err(BindError::config_with(
                format!("Game data folder not found: {}", data_folder.display()),
                None,
                &[
                    "Verify the path to your game Data folder",
                    "Example: C:/Program Files (x86)/Steam/steamapps/common/Skyrim Special Edition/Data",
                    "Use --data-folder to specify the correct path",
                ],
            ));
        }

        let base_path = data_folder.join(BASE_MASTER);
        if !base_path.exists() {
            return Err(BindError::config_with(
                format!("{BASE_MASTER} not found in data folder"),
                Some(&format!("Expected at: {}", base_path.display())),
                &[
                    "Ensure you're pointing to the correct game Data folder",
                    "The base master is required for auto-fill to work",
                ],
            ));
        }

        tracing::debug!("Building record index from: {}", data_folder.display());

        let mut plugins = vec![load_plugin(&base_path)?];

        let update_path = data_folder.join(UPDATE_MASTER);
        if update_path.exists() {
            plugins.push(load_plugin(&update_path)?);
            tracing::debug!("Loaded {UPDATE_MASTER}");
        }

        for expansion in EXPANSION_MASTERS {
            let path = data_folder.join(expansion);
            if path.exists() {
                plugins.push(load_plugin(&path)?);
                tracing::debug!("Loaded {expansion}");
            }
        }

        let index = RecordIndex::build(&plugins);
        tracing::info!("Built record index over {} master file(s)", index.plugin_count());
        Ok(index)
    }

    /// Build an index with a working plugin (and its declared masters)
    /// layered atop the cached base order, for symbols visible to that
    /// plugin. The result is not cached.
    ///
    /// Missing masters are logged as warnings, not fatal.
    pub fn with_plugin(&self, data_folder: &Path, plugin: &PluginFile) -> Result<Arc<RecordIndex>> {
        tracing::debug!("Building record index with plugin: {}", plugin.name);

        let base = self.get_or_build(data_folder, true, false)?;
        let mut index = (*base).clone();

        for master in &plugin.masters {
            // Fixed-order masters are already in the base index.
            if master == BASE_MASTER
                || master == UPDATE_MASTER
                || EXPANSION_MASTERS.contains(&master.as_str())
            {
                continue;
            }
            let path = data_folder.join(master);
            if path.exists() {
                index.apply(&load_plugin(&path)?);
                tracing::debug!("Loaded master: {master}");
            } else {
                tracing::warn!("Master not found: {master}");
            }
        }

        index.apply(plugin);
        tracing::info!(
            "Built record index with {} and {} total file(s)",
            plugin.name,
            index.plugin_count()
        );
        Ok(Arc::new(index))
    }

    /// Drop the cached entry, forcing a rebuild on next access.
    pub fn clear(&self) {
        tracing::debug!("Clearing cached record index");
        let mut slot = self.slot.lock().expect("index cache poisoned");
        *slot = None;
    }

    /// Current cache state.
    pub fn stats(&self) -> CacheStats {
        let slot = self.slot.lock().expect("index cache poisoned");
        match slot.as_ref() {
            Some(entry) => {
                let age = self.clock.now().saturating_duration_since(entry.built_at);
                CacheStats {
                    cached: true,
                    age,
                    data_folder: Some(entry.data_folder.clone()),
                    expired: age >= self.ttl,
                }
            }
            None => CacheStats {
                cached: false,
                age: Duration::ZERO,
                data_folder: None,
                expired: false,
            },
        }
    }
}

impl Default for IndexCache {
    fn default() -> Self {
        Self::new()
    }
}
