//! Adapter resolution.
//!
//! A wrapper's adapter is a hand-written host module with the same name that
//! supersedes the wrapper as the user-facing surface. Submodules share the
//! adapter of their top-level module. Top-level wrappers resolve theirs at
//! most once and record it in the session's name→module table.

use ferry_identity::{ModuleRef, WrapperId};

use crate::env::ImportEnv;
use crate::errors::ImportError;
use crate::wrapper::AdapterLink;

impl ImportEnv<'_> {
    /// The adapter module for `wrapper`, if the host has one.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn adapter_module(&mut self, wrapper: WrapperId) -> Result<Option<ModuleRef>, ImportError> {
        let (foreign_module, component, name, link) = {
            let w = self.wrapper(wrapper);
            (w.foreign_module(), w.component(), w.name(), w.adapter_link())
        };

        if self.foreign.is_submodule(foreign_module) {
            let top = self.foreign.top_level_module(foreign_module);
            let top_wrapper = self.wrapper_module(top, Some(component));
            return self.adapter_module(top_wrapper);
        }

        if link.is_resolved() {
            return Ok(link.module());
        }

        let adapter = match self.host.resolve_module(name) {
            // The host resolved the name to a wrapper, so nothing hand-written
            // stands in front of it.
            Some(ModuleRef::Wrapper(_)) | None => None,
            Some(module) => {
                let name_text = self.host.resolve(name).to_string();
                self.session
                    .register_loaded_module(name, &name_text, module, Some(wrapper))?;
                tracing::debug!(name = %name_text, adapter = %module, "resolved adapter module");
                Some(module)
            }
        };

        self.session.cache.wrapper_mut(wrapper).adapter = AdapterLink::resolved(adapter);
        Ok(adapter)
    }
}
