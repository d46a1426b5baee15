//! Host name lookup into the foreign namespaces.
//!
//! One query composes three foreign lookups:
//! 1. the macro table,
//! 2. the ordinary (or protocol) namespace,
//! 3. the tag namespace, only when step 2 found no type.
//!
//! Results are imported through the [`DeclImporter`]; anything that does not
//! import as a host value, or that turns out to be one of the host's own
//! built-in declarations, is dropped.

use ferry_identity::{ForeignDeclId, ModuleRef, Symbol};
use smallvec::SmallVec;

use crate::env::ImportEnv;
use crate::foreign::LookupMode;
use crate::host::{DeclImporter, HostDecl, LookupKind};
use crate::names::NameTranslator;

/// Suffix that redirects a lookup from the class namespace to protocols.
///
/// This is a heuristic: a host name such as `WidgetProto` always means the
/// protocol `Widget`, even if some foreign entity is literally named
/// `WidgetProto`.
pub const PROTOCOL_SUFFIX: &str = "Proto";

pub type HostDeclVec = SmallVec<[HostDecl; 4]>;

pub struct LookupBroker<'e, 'a> {
    env: &'e mut ImportEnv<'a>,
    decls: &'e mut dyn DeclImporter,
    names: NameTranslator,
}

impl<'e, 'a> LookupBroker<'e, 'a> {
    pub fn new(
        env: &'e mut ImportEnv<'a>,
        decls: &'e mut dyn DeclImporter,
        names: NameTranslator,
    ) -> Self {
        Self { env, decls, names }
    }

    /// Look up `name` as a value at foreign global scope.
    ///
    /// Foreign lookup is global, so `scope` (the module the host is looking
    /// from) only shows up in traces. `access_path` may name at most one
    /// component, which must be `name` itself. Absence is not an error:
    /// unrepresentable or unknown names simply produce no results.
    #[tracing::instrument(level = "debug", skip(self, access_path))]
    pub fn lookup_value(
        &mut self,
        scope: Option<ModuleRef>,
        access_path: &[Symbol],
        name: Symbol,
        kind: LookupKind,
    ) -> HostDeclVec {
        let mut results = HostDeclVec::new();
        debug_assert!(access_path.len() <= 1, "can only refer to top-level decls");
        if access_path.len() > 1 || access_path.first().is_some_and(|first| *first != name) {
            return results;
        }
        self.env.session.stats.lookups += 1;

        let (name, mode) = self.split_protocol_suffix(name);

        let Some(foreign_name) = self
            .names
            .host_to_foreign(&mut *self.env.foreign, &*self.env.host, name)
        else {
            tracing::trace!(?kind, "name has no foreign spelling");
            return results;
        };

        if let Some(definition) = self.env.foreign.macro_definition(foreign_name)
            && let Some(decl) = self.decls.import_macro(self.env, name, &definition)
        {
            results.push(decl);
        }

        let builtin = self.env.host.builtin_module();
        let mut found_type = false;
        for candidate in self.env.foreign.lookup_name(foreign_name, mode) {
            let underlying = self.env.foreign.decl(candidate).underlying_decl();
            let Some(decl) = self.decls.import_decl(self.env, underlying) else {
                continue;
            };
            // The foreign compiler can see some host built-ins; never hand
            // them back as if they belonged to a foreign module.
            if decl.is_value() && decl.module != builtin {
                found_type |= decl.is_type();
                results.push(decl);
            }
        }

        // Tags live in their own namespace. Only consult it when the ordinary
        // pass found no type, so a typedef and its tag yield one declaration.
        if mode == LookupMode::Ordinary && !found_type {
            for candidate in self.env.foreign.lookup_name(foreign_name, LookupMode::Tag) {
                let underlying = self.env.foreign.decl(candidate).underlying_decl();
                if let Some(decl) = self.decls.import_decl(self.env, underlying)
                    && decl.is_value()
                {
                    results.push(decl);
                }
            }
        }

        tracing::trace!(?mode, found = results.len(), "lookup finished");
        results
    }

    pub(crate) fn env(&self) -> &ImportEnv<'a> {
        &*self.env
    }

    /// Host name of a named, non-private foreign declaration.
    pub(crate) fn host_name_for(&mut self, id: ForeignDeclId) -> Option<Symbol> {
        let decl = self.env.foreign.decl(id);
        if !decl.is_named() || decl.module_private {
            return None;
        }
        self.names
            .foreign_to_host(&*self.env.foreign, &mut *self.env.host, &decl.name, "")
    }

    fn split_protocol_suffix(&mut self, name: Symbol) -> (Symbol, LookupMode) {
        match self.env.host.resolve(name).strip_suffix(PROTOCOL_SUFFIX) {
            Some(stripped) => {
                let stripped = stripped.to_string();
                (self.env.host.intern(&stripped), LookupMode::Protocol)
            }
            None => (name, LookupMode::Ordinary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foreign::{ForeignDeclKind, MacroKind, TagKind};
    use crate::host::{HostContext, HostDeclKind};
    use crate::session::ImportSession;
    use crate::testing::{MockDeclImporter, MockForeign, MockHost};

    struct Fixture {
        foreign: MockForeign,
        host: MockHost,
        decls: MockDeclImporter,
        session: ImportSession,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                foreign: MockForeign::new(),
                host: MockHost::new(),
                decls: MockDeclImporter::new(),
                session: ImportSession::new(),
            }
        }

        fn lookup(&mut self, text: &str) -> HostDeclVec {
            self.lookup_with_path(text, &[])
        }

        fn lookup_with_path(&mut self, text: &str, path: &[&str]) -> HostDeclVec {
            let name = self.host.intern(text);
            let path: Vec<Symbol> = path.iter().map(|p| self.host.intern(p)).collect();
            let mut env = ImportEnv::new(&mut self.session, &mut self.foreign, &mut self.host);
            LookupBroker::new(&mut env, &mut self.decls, NameTranslator::new()).lookup_value(
                None,
                &path,
                name,
                LookupKind::Unqualified,
            )
        }
    }

    #[test]
    fn finds_ordinary_functions() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Darwin", None);
        let printf = fx.foreign.add_decl("printf", ForeignDeclKind::Function, Some(module));

        let results = fx.lookup("printf");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, HostDeclKind::Value);
        assert_eq!(fx.decls.host_decl_for(printf), Some(results[0]));
    }

    #[test]
    fn unknown_and_unrepresentable_names_are_empty() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Darwin", None);
        fx.foreign.add_decl("true", ForeignDeclKind::Variable, Some(module));

        assert!(fx.lookup("missing").is_empty());
        assert!(fx.lookup("true").is_empty());
        assert!(fx.lookup("struct").is_empty());
        assert!(fx.lookup("+").is_empty());
    }

    #[test]
    fn tag_found_when_no_ordinary_type() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Geometry", None);
        let tag = fx
            .foreign
            .add_decl("Point", ForeignDeclKind::Tag(TagKind::Struct), Some(module));

        let results = fx.lookup("Point");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_type());
        assert_eq!(fx.decls.host_decl_for(tag), Some(results[0]));
    }

    #[test]
    fn typedef_hides_like_named_tag() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Geometry", None);
        let typedef = fx.foreign.add_decl("Point", ForeignDeclKind::Typedef, Some(module));
        let tag = fx
            .foreign
            .add_decl("Point", ForeignDeclKind::Tag(TagKind::Struct), Some(module));

        let results = fx.lookup("Point");
        assert_eq!(results.len(), 1);
        assert_eq!(fx.decls.host_decl_for(typedef), Some(results[0]));
        assert_eq!(fx.decls.host_decl_for(tag), None, "tag pass must not run");
    }

    #[test]
    fn ordinary_value_does_not_suppress_tag() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Signals", None);
        fx.foreign.add_decl("sigaction", ForeignDeclKind::Function, Some(module));
        fx.foreign
            .add_decl("sigaction", ForeignDeclKind::Tag(TagKind::Struct), Some(module));

        let results = fx.lookup("sigaction");
        let kinds: Vec<HostDeclKind> = results.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, [HostDeclKind::Value, HostDeclKind::Type]);
    }

    #[test]
    fn protocol_suffix_selects_protocol() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Widgets", None);
        fx.foreign.add_decl(
            "Widget",
            ForeignDeclKind::Interface { definition: None },
            Some(module),
        );
        let protocol = fx.foreign.add_decl("Widget", ForeignDeclKind::Protocol, Some(module));

        let results = fx.lookup("WidgetProto");
        assert_eq!(results.len(), 1);
        assert_eq!(fx.decls.host_decl_for(protocol), Some(results[0]));

        let class_results = fx.lookup("Widget");
        assert_eq!(class_results.len(), 1);
        assert_ne!(class_results[0], results[0]);
    }

    #[test]
    fn protocol_lookup_skips_tag_fallback() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Widgets", None);
        fx.foreign
            .add_decl("Widget", ForeignDeclKind::Tag(TagKind::Struct), Some(module));

        assert!(fx.lookup("WidgetProto").is_empty());
    }

    #[test]
    fn macros_are_imported() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Limits", None);
        fx.foreign.add_decl("other", ForeignDeclKind::Function, Some(module));
        fx.foreign
            .add_macro("INT_MAX", MacroKind::ObjectLike, &["2147483647"]);

        let results = fx.lookup("INT_MAX");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, HostDeclKind::Value);
        assert_eq!(fx.decls.macros_imported(), 1);
    }

    #[test]
    fn builtin_declarations_are_filtered() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Darwin", None);
        let leaked = fx.foreign.add_decl("Int", ForeignDeclKind::Typedef, Some(module));
        fx.decls.mark_builtin(leaked);

        assert!(fx.lookup("Int").is_empty());
    }

    #[test]
    fn non_values_are_dropped() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Darwin", None);
        fx.foreign.add_decl("__opaque", ForeignDeclKind::Other, Some(module));

        assert!(fx.lookup("__opaque").is_empty());
    }

    #[test]
    fn underlying_declaration_is_imported() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Darwin", None);
        let target = fx.foreign.add_decl("fopen", ForeignDeclKind::Function, Some(module));
        let shadow = fx.foreign.add_decl("fopen", ForeignDeclKind::Function, Some(module));
        fx.foreign.set_underlying(shadow, target);

        let results = fx.lookup("fopen");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], results[1]);
        assert_eq!(fx.decls.host_decl_for(shadow), None);
    }

    #[test]
    fn access_path_must_match_name() {
        let mut fx = Fixture::new();
        let module = fx.foreign.add_module("Darwin", None);
        fx.foreign.add_decl("printf", ForeignDeclKind::Function, Some(module));

        assert!(fx.lookup_with_path("printf", &["puts"]).is_empty());
        assert_eq!(fx.lookup_with_path("printf", &["printf"]).len(), 1);
    }

    #[test]
    fn lookups_are_counted() {
        let mut fx = Fixture::new();
        fx.lookup("a");
        fx.lookup("b");
        assert_eq!(fx.session.stats().lookups, 2);
    }
}
