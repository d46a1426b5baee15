//! Identity-keyed wrapper cache.
//!
//! Maps each foreign module handle to exactly one [`WrapperModule`] for the
//! lifetime of the session. Wrappers are stored in an arena and addressed by
//! [`WrapperId`]; the cache never removes or replaces an entry.
//!
//! The cache itself neither bumps the generation nor runs adapter forcing.
//! It only records whether forcing has happened, so the load path can run
//! those steps once per wrapper.

use ferry_identity::{ComponentId, ForeignModuleId, WrapperId};
use rustc_hash::FxHashMap;

use crate::foreign::ForeignCompiler;
use crate::host::HostContext;
use crate::wrapper::WrapperModule;

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    wrapper: WrapperId,
    /// Adapter forcing has run for this wrapper.
    forced: bool,
}

/// Outcome of [`WrapperCache::get_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLookup {
    pub wrapper: WrapperId,
    pub created: bool,
}

#[derive(Debug, Default)]
pub struct WrapperCache {
    wrappers: Vec<WrapperModule>,
    entries: FxHashMap<ForeignModuleId, CacheEntry>,
    next_component: u32,
}

impl WrapperCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the wrapper for `handle`, creating it on first reference.
    ///
    /// On a hit `component` is ignored. On a miss a fresh component is
    /// allocated unless one is supplied.
    pub fn get_or_create(
        &mut self,
        foreign: &dyn ForeignCompiler,
        host: &mut dyn HostContext,
        handle: ForeignModuleId,
        component: Option<ComponentId>,
    ) -> CacheLookup {
        if let Some(entry) = self.entries.get(&handle) {
            return CacheLookup {
                wrapper: entry.wrapper,
                created: false,
            };
        }

        let component = component.unwrap_or_else(|| self.new_component());
        let id = WrapperId::new(self.wrappers.len() as u32);
        let name = host.intern(foreign.module_name(handle));
        let debug_name = foreign.full_module_name(handle);
        tracing::debug!(?id, %debug_name, ?component, "created wrapper module");

        self.wrappers
            .push(WrapperModule::new(name, debug_name, handle, component));
        self.entries.insert(
            handle,
            CacheEntry {
                wrapper: id,
                forced: false,
            },
        );
        CacheLookup {
            wrapper: id,
            created: true,
        }
    }

    /// Allocate a fresh component.
    pub fn new_component(&mut self) -> ComponentId {
        let id = ComponentId::new(self.next_component);
        self.next_component += 1;
        id
    }

    /// Cached wrapper for `handle`, without creating one.
    pub fn get(&self, handle: ForeignModuleId) -> Option<WrapperId> {
        self.entries.get(&handle).map(|entry| entry.wrapper)
    }

    pub fn wrapper(&self, id: WrapperId) -> &WrapperModule {
        &self.wrappers[id.index() as usize]
    }

    pub(crate) fn wrapper_mut(&mut self, id: WrapperId) -> &mut WrapperModule {
        &mut self.wrappers[id.index() as usize]
    }

    pub fn is_forced(&self, handle: ForeignModuleId) -> bool {
        self.entries.get(&handle).is_some_and(|entry| entry.forced)
    }

    /// Set the forced flag. Returns `true` if it was previously unset.
    pub(crate) fn mark_forced(&mut self, handle: ForeignModuleId) -> bool {
        match self.entries.get_mut(&handle) {
            Some(entry) if !entry.forced => {
                entry.forced = true;
                true
            }
            _ => false,
        }
    }

    /// Undo [`mark_forced`](Self::mark_forced) after a failed forcing run.
    pub(crate) fn clear_forced(&mut self, handle: ForeignModuleId) {
        if let Some(entry) = self.entries.get_mut(&handle) {
            entry.forced = false;
        }
    }

    /// Number of distinct foreign modules wrapped so far.
    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }
}
