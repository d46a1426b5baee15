//! Borrowed view over the session and both compilers.
//!
//! Every broker operation runs against an [`ImportEnv`]; the decl importer
//! receives the same view so it can create wrappers for the modules owning
//! the declarations it imports. Adapter resolution and re-export handling
//! add further `impl ImportEnv` blocks in their own modules.

use ferry_identity::{ComponentId, ForeignDeclId, ForeignModuleId, WrapperId};

use crate::foreign::ForeignCompiler;
use crate::host::HostContext;
use crate::session::ImportSession;
use crate::wrapper::WrapperModule;

pub struct ImportEnv<'a> {
    pub session: &'a mut ImportSession,
    pub foreign: &'a mut dyn ForeignCompiler,
    pub host: &'a mut dyn HostContext,
}

impl<'a> ImportEnv<'a> {
    pub fn new(
        session: &'a mut ImportSession,
        foreign: &'a mut dyn ForeignCompiler,
        host: &'a mut dyn HostContext,
    ) -> Self {
        Self {
            session,
            foreign,
            host,
        }
    }

    /// Wrapper for `handle`, created on first reference.
    pub fn wrapper_module(
        &mut self,
        handle: ForeignModuleId,
        component: Option<ComponentId>,
    ) -> WrapperId {
        let lookup =
            self.session
                .cache
                .get_or_create(&*self.foreign, &mut *self.host, handle, component);
        if lookup.created {
            self.session.stats.wrappers_created += 1;
        } else {
            self.session.stats.cache_hits += 1;
        }
        lookup.wrapper
    }

    pub fn wrapper(&self, id: WrapperId) -> &WrapperModule {
        self.session.cache.wrapper(id)
    }

    pub fn is_top_level(&self, id: WrapperId) -> bool {
        !self.foreign.is_submodule(self.wrapper(id).foreign_module())
    }

    /// Wrapper of the top-level module owning `decl`.
    ///
    /// Classes are attributed to the module holding their full definition
    /// rather than a forward declaration. Submodules are folded into their
    /// top-level module.
    pub fn module_for_decl(&mut self, decl: ForeignDeclId) -> Option<WrapperId> {
        let resolved = self.foreign.decl(decl).resolved_definition();
        let owner = self.foreign.decl(resolved).owning_module?;
        let top = self.foreign.top_level_module(owner);
        Some(self.wrapper_module(top, None))
    }
}
