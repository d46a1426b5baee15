// extensions.rs
//
// Category import for foreign-backed host classes.

use crate::env::ImportEnv;
use crate::generation::Generation;
use crate::host::{DeclImporter, NominalTypeRef};

pub struct ExtensionLoader<'e, 'a> {
    env: &'e mut ImportEnv<'a>,
    decls: &'e mut dyn DeclImporter,
}

impl<'e, 'a> ExtensionLoader<'e, 'a> {
    pub fn new(env: &'e mut ImportEnv<'a>, decls: &'e mut dyn DeclImporter) -> Self {
        Self { env, decls }
    }

    /// Import every visible category of the foreign class behind `nominal`.
    ///
    /// Returns the number of categories handed to the decl importer; zero for
    /// types not backed by a foreign class. `previous_generation` is not
    /// consulted: categories are imported on every call and the decl importer
    /// deduplicates.
    pub fn load_extensions(
        &mut self,
        nominal: NominalTypeRef,
        previous_generation: Generation,
    ) -> usize {
        let Some(backing) = nominal.foreign_decl else {
            return 0;
        };
        let decl = self.env.foreign.decl(backing);
        if !decl.kind.is_class_like() {
            return 0;
        }

        let class = decl.resolved_definition();
        let categories = self.env.foreign.visible_categories(class);
        for category in &categories {
            self.decls.import_decl(self.env, *category);
        }
        tracing::debug!(
            ?class,
            categories = categories.len(),
            %previous_generation,
            "loaded extensions"
        );
        categories.len()
    }
}
