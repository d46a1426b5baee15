//! The importer facade: one foreign compiler instance, one session.
//!
//! [`ForeignImporter`] owns everything the broker mutates and hands out
//! short-lived [`ImportEnv`] views to the individual components. Hosts talk
//! to it through host identifiers ([`Symbol`]) and get wrapper ids or host
//! declarations back.

use ferry_identity::{ForeignDeclId, ForeignIdent, ModuleRef, Symbol, WrapperId};
use smallvec::SmallVec;

use crate::env::ImportEnv;
use crate::errors::{CreateError, ImportError};
use crate::extensions::ExtensionLoader;
use crate::foreign::{ForeignCompiler, ForeignCompilerFactory};
use crate::generation::Generation;
use crate::host::{DeclImporter, HostContext, HostDecl, LookupKind, NominalTypeRef};
use crate::invocation::ImporterOptions;
use crate::lookup::{HostDeclVec, LookupBroker};
use crate::names::NameTranslator;
use crate::reexport::ModuleRefVec;
use crate::selectors::SubscriptSelectors;
use crate::session::ImportSession;
use crate::visible::VisibleNameEnumerator;

impl ImportEnv<'_> {
    /// Import a top-level module by its dotted host path.
    ///
    /// The first load of a module makes everything it re-exports visible and
    /// advances the generation. Later loads of the same module return the
    /// cached wrapper without doing either.
    ///
    /// A hard error while forcing leaves the module unloaded, so a retry
    /// forces again and reports the same error.
    #[tracing::instrument(level = "debug", skip(self, path), fields(dotted = tracing::field::Empty))]
    pub fn load_module(&mut self, path: &[Symbol]) -> Result<WrapperId, ImportError> {
        let path_text = path
            .iter()
            .map(|segment| self.host.resolve(*segment))
            .collect::<Vec<_>>()
            .join(".");
        tracing::Span::current().record("dotted", path_text.as_str());

        let names = NameTranslator::new();
        let mut foreign_path: SmallVec<[ForeignIdent; 4]> = SmallVec::new();
        for segment in path {
            let Some(ident) = names.host_to_foreign(&mut *self.foreign, &*self.host, *segment)
            else {
                return Err(ImportError::NameUnrepresentable {
                    name: self.host.resolve(*segment).to_string(),
                });
            };
            foreign_path.push(ident);
        }

        let location = self.session.next_import_location();
        let Some(handle) =
            self.foreign
                .load_module(location, &foreign_path)
        else {
            tracing::debug!(?location, "foreign loader found no module");
            return Err(ImportError::ModuleNotFound { path: path_text });
        };

        let wrapper = self.wrapper_module(handle, None);
        if self.session.cache.is_forced(handle) {
            tracing::trace!(?wrapper, "module already loaded");
            return Ok(wrapper);
        }

        // Flag first: the forcing walk may reach this module again through a
        // re-export cycle.
        self.session.cache.mark_forced(handle);
        self.session.stats.forcing_runs += 1;
        let name = self.wrapper(wrapper).name();
        if self.is_top_level(wrapper) {
            self.session.bind_wrapper_name(name, wrapper);
        }
        let reached = match self.force_visible_modules(wrapper) {
            Ok(reached) => reached,
            Err(err) => {
                self.session.cache.clear_forced(handle);
                self.session.unbind_wrapper_name(name, wrapper);
                tracing::debug!(?wrapper, error = %err, "forcing failed, module left unloaded");
                return Err(err);
            }
        };

        let generation = self.session.bump_generation();
        self.host.bump_generation();
        self.session.note_loaded(wrapper);
        tracing::debug!(?wrapper, reached, %generation, "loaded module");
        Ok(wrapper)
    }
}

/// Host-facing entry point of the import broker.
pub struct ForeignImporter<H, D> {
    session: ImportSession,
    foreign: Box<dyn ForeignCompiler>,
    host: H,
    decls: D,
    names: NameTranslator,
    selectors: SubscriptSelectors,
}

impl<H: HostContext, D: DeclImporter> ForeignImporter<H, D> {
    /// Build the foreign invocation from `options`, instantiate the compiler
    /// through `factory` and wrap it in a fresh session.
    pub fn create(
        options: &ImporterOptions,
        factory: &mut dyn ForeignCompilerFactory,
        host: H,
        decls: D,
    ) -> Result<Self, CreateError> {
        let invocation = options.build_invocation()?;
        let foreign = factory.instantiate(&invocation).inspect_err(|e| {
            tracing::warn!(error = %e, triple = options.target_triple(), "foreign compiler unavailable");
        })?;
        Ok(Self::new(foreign, host, decls))
    }

    /// Wrap an already constructed foreign compiler.
    pub fn new(mut foreign: Box<dyn ForeignCompiler>, host: H, decls: D) -> Self {
        let selectors = SubscriptSelectors::new(foreign.as_mut());
        tracing::debug!(triple = foreign.target_triple(), "foreign importer ready");
        Self {
            session: ImportSession::new(),
            foreign,
            host,
            decls,
            names: NameTranslator::new(),
            selectors,
        }
    }

    fn env(&mut self) -> ImportEnv<'_> {
        ImportEnv::new(&mut self.session, self.foreign.as_mut(), &mut self.host)
    }

    fn env_and_decls(&mut self) -> (ImportEnv<'_>, &mut D) {
        (
            ImportEnv::new(&mut self.session, self.foreign.as_mut(), &mut self.host),
            &mut self.decls,
        )
    }

    /// Import the module named by the dotted host path `path`.
    pub fn load_module(&mut self, path: &[Symbol]) -> Result<WrapperId, ImportError> {
        self.env().load_module(path)
    }

    /// Foreign global-scope lookup of `name` on behalf of `scope`.
    pub fn lookup_value(
        &mut self,
        scope: Option<ModuleRef>,
        access_path: &[Symbol],
        name: Symbol,
        kind: LookupKind,
    ) -> HostDeclVec {
        let names = self.names;
        let (mut env, decls) = self.env_and_decls();
        LookupBroker::new(&mut env, decls, names).lookup_value(scope, access_path, name, kind)
    }

    pub fn lookup_visible_decls(&mut self, consumer: &mut dyn FnMut(HostDecl)) {
        let names = self.names;
        let (mut env, decls) = self.env_and_decls();
        VisibleNameEnumerator::new(&mut env, decls, names).lookup_visible_decls(consumer);
    }

    pub fn lookup_visible_decls_in(
        &mut self,
        module: ModuleRef,
        consumer: &mut dyn FnMut(HostDecl),
    ) {
        let names = self.names;
        let (mut env, decls) = self.env_and_decls();
        VisibleNameEnumerator::new(&mut env, decls, names).lookup_visible_decls_in(module, consumer);
    }

    pub fn lookup_visible_foreign_decls(&mut self, visitor: &mut dyn FnMut(ForeignDeclId)) {
        self.env().lookup_visible_foreign_decls(visitor);
    }

    pub fn load_extensions(
        &mut self,
        nominal: NominalTypeRef,
        previous_generation: Generation,
    ) -> usize {
        let (mut env, decls) = self.env_and_decls();
        ExtensionLoader::new(&mut env, decls).load_extensions(nominal, previous_generation)
    }

    pub fn reexported_modules(&mut self, module: WrapperId) -> Result<ModuleRefVec, ImportError> {
        self.env().reexported_modules(module)
    }

    pub fn adapter_module(&mut self, wrapper: WrapperId) -> Result<Option<ModuleRef>, ImportError> {
        self.env().adapter_module(wrapper)
    }

    pub fn module_for_decl(&mut self, decl: ForeignDeclId) -> Option<WrapperId> {
        self.env().module_for_decl(decl)
    }

    pub fn generation(&self) -> Generation {
        self.session.generation()
    }

    pub fn first_module(&self) -> Option<WrapperId> {
        self.session.first_module()
    }

    pub fn target_triple(&self) -> &str {
        self.foreign.target_triple()
    }

    pub fn subscript_selectors(&self) -> &SubscriptSelectors {
        &self.selectors
    }

    pub fn session(&self) -> &ImportSession {
        &self.session
    }

    pub fn foreign(&self) -> &dyn ForeignCompiler {
        self.foreign.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn decls(&self) -> &D {
        &self.decls
    }
}
