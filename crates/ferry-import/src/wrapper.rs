// wrapper.rs
//
// Host-side stand-in for one foreign module.

use ferry_identity::{ComponentId, ForeignModuleId, ModuleRef, Symbol};

/// Lazily resolved link from a wrapper to its hand-written host adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterLink {
    module: Option<ModuleRef>,
    resolved: bool,
}

impl AdapterLink {
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn resolved(module: Option<ModuleRef>) -> Self {
        Self {
            module,
            resolved: true,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// The adapter, once resolved. `None` before resolution or when the
    /// wrapper has no adapter.
    pub fn module(&self) -> Option<ModuleRef> {
        self.module
    }
}

/// A wrapper module. Created once per foreign module and never reshaped;
/// only the adapter link is filled in later.
#[derive(Debug, Clone)]
pub struct WrapperModule {
    /// Host identifier derived from the foreign module's short name.
    name: Symbol,
    /// Full dotted foreign name, for diagnostics.
    debug_name: String,
    foreign: ForeignModuleId,
    component: ComponentId,
    pub(crate) adapter: AdapterLink,
}

impl WrapperModule {
    pub(crate) fn new(
        name: Symbol,
        debug_name: String,
        foreign: ForeignModuleId,
        component: ComponentId,
    ) -> Self {
        Self {
            name,
            debug_name,
            foreign,
            component,
            adapter: AdapterLink::unresolved(),
        }
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn debug_name(&self) -> &str {
        &self.debug_name
    }

    pub fn foreign_module(&self) -> ForeignModuleId {
        self.foreign
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }

    pub fn adapter_link(&self) -> AdapterLink {
        self.adapter
    }
}
