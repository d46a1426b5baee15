//! Enumeration of every foreign declaration the host can currently see.

use ferry_identity::{ForeignDeclId, ModuleRef};

use crate::env::ImportEnv;
use crate::foreign::LookupMode;
use crate::host::{DeclImporter, HostDecl, LookupKind};
use crate::lookup::LookupBroker;
use crate::names::NameTranslator;

impl ImportEnv<'_> {
    /// Visit the raw foreign declarations visible at translation-unit scope,
    /// without importing anything.
    pub fn lookup_visible_foreign_decls(&self, visitor: &mut dyn FnMut(ForeignDeclId)) {
        self.foreign.visit_visible_decls(LookupMode::Any, visitor);
    }
}

/// Drives [`LookupBroker::lookup_value`] once per visible named declaration
/// and hands the results to a consumer.
pub struct VisibleNameEnumerator<'e, 'a> {
    broker: LookupBroker<'e, 'a>,
}

impl<'e, 'a> VisibleNameEnumerator<'e, 'a> {
    pub fn new(
        env: &'e mut ImportEnv<'a>,
        decls: &'e mut dyn DeclImporter,
        names: NameTranslator,
    ) -> Self {
        Self {
            broker: LookupBroker::new(env, decls, names),
        }
    }

    /// Every visible declaration, regardless of module.
    pub fn lookup_visible_decls(&mut self, consumer: &mut dyn FnMut(HostDecl)) {
        self.enumerate(None, consumer);
    }

    /// Visible declarations whose module context is `module`.
    pub fn lookup_visible_decls_in(
        &mut self,
        module: ModuleRef,
        consumer: &mut dyn FnMut(HostDecl),
    ) {
        self.enumerate(Some(module), consumer);
    }

    fn enumerate(&mut self, filter: Option<ModuleRef>, consumer: &mut dyn FnMut(HostDecl)) {
        let mut visible = Vec::new();
        self.broker
            .env()
            .lookup_visible_foreign_decls(&mut |decl| visible.push(decl));

        let mut forwarded = 0usize;
        for id in visible {
            let Some(name) = self.broker.host_name_for(id) else {
                continue;
            };
            for decl in self
                .broker
                .lookup_value(filter, &[], name, LookupKind::Unqualified)
            {
                if filter.is_none_or(|module| decl.module == module) {
                    consumer(decl);
                    forwarded += 1;
                }
            }
        }
        tracing::debug!(?filter, forwarded, "enumerated visible decls");
    }
}
