//! Per-compilation import state.
//!
//! Everything the broker mutates lives here: the wrapper cache, the
//! generation counter, the host name→module table, the synthetic import
//! location counter and the first-loaded-module slot. One session per
//! compilation; nothing is shared across threads.

use ferry_identity::{ModuleRef, Symbol, WrapperId};
use rustc_hash::FxHashMap;

use crate::cache::WrapperCache;
use crate::errors::ImportError;
use crate::foreign::ImportLocation;
use crate::generation::Generation;

/// Counters describing what the session has done so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Wrapper modules created (equals the cache size)
    pub wrappers_created: usize,
    /// Wrapper lookups answered from the cache
    pub cache_hits: usize,
    /// Adapter forcing walks started by module loads
    pub forcing_runs: usize,
    /// Value lookups performed, including those driven by enumeration
    pub lookups: usize,
}

#[derive(Debug, Default)]
pub struct ImportSession {
    pub(crate) cache: WrapperCache,
    generation: Generation,
    /// Host module table: name → the module the host should bind it to.
    loaded_modules: FxHashMap<Symbol, ModuleRef>,
    first_module: Option<WrapperId>,
    import_counter: u32,
    pub(crate) stats: ImportStats,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &WrapperCache {
        &self.cache
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub(crate) fn bump_generation(&mut self) -> Generation {
        self.generation.bump()
    }

    /// First wrapper ever loaded, usable wherever any live foreign context
    /// will do.
    pub fn first_module(&self) -> Option<WrapperId> {
        self.first_module
    }

    pub(crate) fn note_loaded(&mut self, wrapper: WrapperId) {
        self.first_module.get_or_insert(wrapper);
    }

    /// Fresh placeholder location for the next foreign module load.
    pub(crate) fn next_import_location(&mut self) -> ImportLocation {
        let location = ImportLocation::new(self.import_counter);
        self.import_counter += 1;
        location
    }

    pub fn stats(&self) -> &ImportStats {
        &self.stats
    }

    pub fn loaded_module(&self, name: Symbol) -> Option<ModuleRef> {
        self.loaded_modules.get(&name).copied()
    }

    /// Bind a freshly loaded top-level wrapper to its name unless something
    /// already answers to it. Its adapter may replace the binding later.
    pub(crate) fn bind_wrapper_name(&mut self, name: Symbol, wrapper: WrapperId) {
        self.loaded_modules
            .entry(name)
            .or_insert(ModuleRef::Wrapper(wrapper));
    }

    /// Drop the binding made by [`bind_wrapper_name`](Self::bind_wrapper_name)
    /// if it still names `wrapper`.
    pub(crate) fn unbind_wrapper_name(&mut self, name: Symbol, wrapper: WrapperId) {
        if self.loaded_modules.get(&name) == Some(&ModuleRef::Wrapper(wrapper)) {
            self.loaded_modules.remove(&name);
        }
    }

    /// Bind `name` to `module` in the host module table.
    ///
    /// An existing binding may only be replaced when it already is `module`
    /// or is the wrapper `claimant` that `module` adapts. Anything else means
    /// two different modules claim one host name.
    pub fn register_loaded_module(
        &mut self,
        name: Symbol,
        name_text: &str,
        module: ModuleRef,
        claimant: Option<WrapperId>,
    ) -> Result<(), ImportError> {
        if let Some(existing) = self.loaded_modules.get(&name).copied() {
            let is_claimant = claimant.is_some_and(|w| existing == ModuleRef::Wrapper(w));
            if existing != module && !is_claimant {
                tracing::error!(name = name_text, ?existing, ?module, "adapter name collision");
                return Err(ImportError::AdapterNameCollision {
                    name: name_text.to_string(),
                    existing: existing.to_string(),
                    adapter: module.to_string(),
                });
            }
        }
        self.loaded_modules.insert(name, module);
        Ok(())
    }
}
