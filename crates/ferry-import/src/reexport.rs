//! Re-export resolution and adapter forcing.

use ferry_identity::{ModuleRef, WrapperId};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::env::ImportEnv;
use crate::errors::ImportError;

pub type ModuleRefVec = SmallVec<[ModuleRef; 4]>;

impl ImportEnv<'_> {
    /// Modules re-exported by `module`, in the foreign export order.
    ///
    /// Each exported module is represented by its adapter, unless it has none
    /// or the adapter is `module`'s own top-level adapter (a module exporting
    /// its own overlay); then the wrapper itself is used. Duplicates are kept.
    pub fn reexported_modules(&mut self, module: WrapperId) -> Result<ModuleRefVec, ImportError> {
        let (underlying, component) = {
            let w = self.wrapper(module);
            (w.foreign_module(), w.component())
        };
        let top_level_adapter = self.adapter_module(module)?;

        let mut exports = ModuleRefVec::new();
        for exported in self.foreign.exported_modules(underlying) {
            let export_wrapper = self.wrapper_module(exported, Some(component));
            let actual = match self.adapter_module(export_wrapper)? {
                Some(adapter) if Some(adapter) != top_level_adapter => adapter,
                _ => ModuleRef::Wrapper(export_wrapper),
            };
            exports.push(actual);
        }
        Ok(exports)
    }

    /// Make everything `root` transitively re-exports visible, materializing
    /// wrappers and resolving adapters along the way. Returns the number of
    /// modules reached, `root` included.
    ///
    /// Hand-written adapters are not descended into; their own imports are the
    /// host's business.
    pub(crate) fn force_visible_modules(&mut self, root: WrapperId) -> Result<usize, ImportError> {
        let mut visited = FxHashSet::default();
        visited.insert(ModuleRef::Wrapper(root));
        let mut worklist = vec![root];

        while let Some(current) = worklist.pop() {
            for module in self.reexported_modules(current)? {
                if visited.insert(module)
                    && let ModuleRef::Wrapper(next) = module
                {
                    worklist.push(next);
                }
            }
        }
        tracing::trace!(root = ?root, reached = visited.len(), "forced visible modules");
        Ok(visited.len())
    }
}
