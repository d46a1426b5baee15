//! In-memory stand-ins for the foreign compiler, the host and the decl
//! importer.
//!
//! The mocks model just enough of each collaborator for the broker's
//! behaviour to be observable: a module tree with exports, a flat list of
//! declarations sorted into namespaces, a macro table and a keyword list.

use std::collections::VecDeque;

use ferry_identity::{
    ForeignDeclId, ForeignIdent, ForeignModuleId, HostDeclId, HostModuleId, Interner, ModuleRef,
    Symbol,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::env::ImportEnv;
use crate::errors::CreateError;
use crate::foreign::{
    ForeignCompiler, ForeignCompilerFactory, ForeignDecl, ForeignDeclKind, ForeignDeclName,
    ForeignMacro, ForeignToken, ImportLocation, LookupMode, MacroKind,
};
use crate::host::{DeclImporter, HostContext, HostDecl, HostDeclKind};
use crate::invocation::ForeignInvocation;

pub const MOCK_TRIPLE: &str = "x86_64-apple-macosx10.9";

const MOCK_KEYWORDS: &[&str] = &[
    "struct", "union", "enum", "typedef", "int", "void", "char", "while", "for", "if", "else",
    "return", "static", "const", "extern", "sizeof",
];

#[derive(Debug)]
struct MockModule {
    name: String,
    parent: Option<ForeignModuleId>,
    exports: Vec<ForeignModuleId>,
}

/// A foreign compiler backed by plain vectors.
#[derive(Debug)]
pub struct MockForeign {
    triple: String,
    idents: Vec<String>,
    ident_map: FxHashMap<String, ForeignIdent>,
    keywords: FxHashSet<String>,
    modules: Vec<MockModule>,
    decls: Vec<ForeignDecl>,
    macros: FxHashMap<ForeignIdent, ForeignMacro>,
    /// Every `load_module` call, in order.
    pub loads: Vec<(ImportLocation, String)>,
}

impl Default for MockForeign {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForeign {
    pub fn new() -> Self {
        Self {
            triple: MOCK_TRIPLE.to_string(),
            idents: Vec::new(),
            ident_map: FxHashMap::default(),
            keywords: MOCK_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            modules: Vec::new(),
            decls: Vec::new(),
            macros: FxHashMap::default(),
            loads: Vec::new(),
        }
    }

    pub fn add_module(&mut self, name: &str, parent: Option<ForeignModuleId>) -> ForeignModuleId {
        let id = ForeignModuleId::new(self.modules.len() as u32);
        self.modules.push(MockModule {
            name: name.to_string(),
            parent,
            exports: Vec::new(),
        });
        id
    }

    pub fn add_export(&mut self, module: ForeignModuleId, exported: ForeignModuleId) {
        self.modules[module.index() as usize].exports.push(exported);
    }

    pub fn add_decl(
        &mut self,
        name: &str,
        kind: ForeignDeclKind,
        module: Option<ForeignModuleId>,
    ) -> ForeignDeclId {
        let ident = self.intern_identifier(name);
        self.push_decl(ForeignDeclName::Identifier(ident), kind, module)
    }

    pub fn add_anonymous_decl(
        &mut self,
        kind: ForeignDeclKind,
        module: Option<ForeignModuleId>,
    ) -> ForeignDeclId {
        self.push_decl(ForeignDeclName::Anonymous, kind, module)
    }

    pub fn add_category(
        &mut self,
        class: ForeignDeclId,
        name: &str,
        module: Option<ForeignModuleId>,
    ) -> ForeignDeclId {
        self.add_decl(name, ForeignDeclKind::Category { class }, module)
    }

    pub fn add_macro(&mut self, name: &str, kind: MacroKind, tokens: &[&str]) {
        let ident = self.intern_identifier(name);
        self.macros.insert(
            ident,
            ForeignMacro {
                name: ident,
                kind,
                tokens: tokens.iter().map(|t| t.to_string()).collect(),
            },
        );
    }

    pub fn set_module_private(&mut self, decl: ForeignDeclId) {
        self.decl_mut(decl).module_private = true;
    }

    pub fn set_canonical(&mut self, decl: ForeignDeclId, canonical: ForeignDeclId) {
        self.decl_mut(decl).canonical = Some(canonical);
    }

    pub fn set_underlying(&mut self, decl: ForeignDeclId, target: ForeignDeclId) {
        self.decl_mut(decl).underlying = Some(target);
    }

    fn push_decl(
        &mut self,
        name: ForeignDeclName,
        kind: ForeignDeclKind,
        module: Option<ForeignModuleId>,
    ) -> ForeignDeclId {
        let id = ForeignDeclId::new(self.decls.len() as u32);
        self.decls.push(ForeignDecl {
            id,
            name,
            kind,
            owning_module: module,
            module_private: false,
            canonical: None,
            underlying: None,
        });
        id
    }

    fn decl_mut(&mut self, decl: ForeignDeclId) -> &mut ForeignDecl {
        &mut self.decls[decl.index() as usize]
    }

    fn namespace(kind: &ForeignDeclKind) -> Option<LookupMode> {
        match kind {
            ForeignDeclKind::Tag(_) => Some(LookupMode::Tag),
            ForeignDeclKind::Protocol => Some(LookupMode::Protocol),
            ForeignDeclKind::Category { .. } => None,
            _ => Some(LookupMode::Ordinary),
        }
    }

    fn in_namespace(kind: &ForeignDeclKind, mode: LookupMode) -> bool {
        mode == LookupMode::Any || Self::namespace(kind) == Some(mode)
    }
}

impl ForeignCompiler for MockForeign {
    fn target_triple(&self) -> &str {
        &self.triple
    }

    fn intern_identifier(&mut self, text: &str) -> ForeignIdent {
        if let Some(ident) = self.ident_map.get(text) {
            return *ident;
        }
        let ident = ForeignIdent::new(self.idents.len() as u32);
        self.idents.push(text.to_string());
        self.ident_map.insert(text.to_string(), ident);
        ident
    }

    fn identifier_text(&self, ident: ForeignIdent) -> &str {
        &self.idents[ident.index() as usize]
    }

    fn identifier_token(&self, ident: ForeignIdent) -> ForeignToken {
        if self.keywords.contains(self.identifier_text(ident)) {
            ForeignToken::Keyword
        } else {
            ForeignToken::Identifier
        }
    }

    fn load_module(
        &mut self,
        location: ImportLocation,
        path: &[ForeignIdent],
    ) -> Option<ForeignModuleId> {
        let joined = path
            .iter()
            .map(|ident| self.identifier_text(*ident))
            .collect::<Vec<_>>()
            .join(".");
        let found = (0..self.modules.len() as u32)
            .map(ForeignModuleId::new)
            .find(|module| self.full_module_name(*module) == joined);
        self.loads.push((location, joined));
        found
    }

    fn module_name(&self, module: ForeignModuleId) -> &str {
        &self.modules[module.index() as usize].name
    }

    fn parent_module(&self, module: ForeignModuleId) -> Option<ForeignModuleId> {
        self.modules[module.index() as usize].parent
    }

    fn exported_modules(&self, module: ForeignModuleId) -> Vec<ForeignModuleId> {
        self.modules[module.index() as usize].exports.clone()
    }

    fn decl(&self, decl: ForeignDeclId) -> ForeignDecl {
        self.decls[decl.index() as usize].clone()
    }

    fn lookup_name(&self, name: ForeignIdent, mode: LookupMode) -> Vec<ForeignDeclId> {
        self.decls
            .iter()
            .filter(|d| d.name == ForeignDeclName::Identifier(name))
            .filter(|d| Self::in_namespace(&d.kind, mode))
            .map(|d| d.id)
            .collect()
    }

    fn visit_visible_decls(&self, mode: LookupMode, visitor: &mut dyn FnMut(ForeignDeclId)) {
        for decl in &self.decls {
            if Self::in_namespace(&decl.kind, mode) {
                visitor(decl.id);
            }
        }
    }

    fn macro_definition(&self, name: ForeignIdent) -> Option<ForeignMacro> {
        self.macros.get(&name).cloned()
    }

    fn visible_categories(&self, class: ForeignDeclId) -> Vec<ForeignDeclId> {
        self.decls
            .iter()
            .filter(|d| matches!(d.kind, ForeignDeclKind::Category { class: c } if c == class))
            .map(|d| d.id)
            .collect()
    }
}

/// Factory handing out one prepared [`MockForeign`].
#[derive(Debug, Default)]
pub struct MockFactory {
    compiler: Option<MockForeign>,
    failure: Option<CreateError>,
    /// The last invocation passed to `instantiate`.
    pub invocation: Option<ForeignInvocation>,
}

impl MockFactory {
    pub fn new(compiler: MockForeign) -> Self {
        Self {
            compiler: Some(compiler),
            failure: None,
            invocation: None,
        }
    }

    pub fn failing(error: CreateError) -> Self {
        Self {
            compiler: None,
            failure: Some(error),
            invocation: None,
        }
    }
}

impl ForeignCompilerFactory for MockFactory {
    fn instantiate(
        &mut self,
        invocation: &ForeignInvocation,
    ) -> Result<Box<dyn ForeignCompiler>, CreateError> {
        self.invocation = Some(invocation.clone());
        if let Some(error) = self.failure.take() {
            return Err(error);
        }
        match self.compiler.take() {
            Some(compiler) => Ok(Box::new(compiler)),
            None => Err(CreateError::TargetUnavailable {
                triple: invocation.target_triple().to_string(),
            }),
        }
    }
}

/// Host context with a name→module table of queued answers.
#[derive(Debug)]
pub struct MockHost {
    interner: Interner,
    modules: FxHashMap<Symbol, VecDeque<ModuleRef>>,
    next_module: u32,
    /// Number of `resolve_module` calls.
    pub resolve_calls: usize,
    /// Number of generation notifications received.
    pub generation_bumps: usize,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub const BUILTIN: ModuleRef = ModuleRef::Host(HostModuleId::new(0));

    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
            modules: FxHashMap::default(),
            next_module: 1,
            resolve_calls: 0,
            generation_bumps: 0,
        }
    }

    /// Register a hand-written host module answering to `name`.
    ///
    /// Registering several under one name queues them: each resolution
    /// consumes one until the last, which then keeps answering.
    pub fn add_adapter(&mut self, name: &str) -> HostModuleId {
        let id = HostModuleId::new(self.next_module);
        self.next_module += 1;
        self.add_module(name, ModuleRef::Host(id));
        id
    }

    pub fn add_module(&mut self, name: &str, module: ModuleRef) {
        let name = self.interner.intern(name);
        self.modules.entry(name).or_default().push_back(module);
    }
}

impl HostContext for MockHost {
    fn intern(&mut self, text: &str) -> Symbol {
        self.interner.intern(text)
    }

    fn resolve(&self, name: Symbol) -> &str {
        self.interner.resolve(name)
    }

    fn is_operator(&self, name: Symbol) -> bool {
        self.interner.is_operator(name)
    }

    fn builtin_module(&self) -> ModuleRef {
        Self::BUILTIN
    }

    fn resolve_module(&mut self, name: Symbol) -> Option<ModuleRef> {
        self.resolve_calls += 1;
        let queue = self.modules.get_mut(&name)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().copied()
        }
    }

    fn bump_generation(&mut self) {
        self.generation_bumps += 1;
    }
}

/// Decl importer that memoizes one host declaration per foreign declaration.
#[derive(Debug, Default)]
pub struct MockDeclImporter {
    imported: FxHashMap<ForeignDeclId, HostDecl>,
    import_order: Vec<ForeignDeclId>,
    macros: FxHashMap<Symbol, HostDecl>,
    builtin: FxHashSet<ForeignDeclId>,
    next_decl: u32,
}

impl MockDeclImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `decl` is one of the host's own built-in declarations.
    pub fn mark_builtin(&mut self, decl: ForeignDeclId) {
        self.builtin.insert(decl);
    }

    pub fn host_decl_for(&self, decl: ForeignDeclId) -> Option<HostDecl> {
        self.imported.get(&decl).copied()
    }

    /// Foreign declarations imported so far, in first-import order.
    pub fn imported_decls(&self) -> &[ForeignDeclId] {
        &self.import_order
    }

    pub fn macros_imported(&self) -> usize {
        self.macros.len()
    }

    fn fresh(&mut self, kind: HostDeclKind, module: ModuleRef) -> HostDecl {
        let id = HostDeclId::new(self.next_decl);
        self.next_decl += 1;
        HostDecl { id, kind, module }
    }
}

impl DeclImporter for MockDeclImporter {
    fn import_decl(&mut self, env: &mut ImportEnv<'_>, decl: ForeignDeclId) -> Option<HostDecl> {
        if let Some(existing) = self.imported.get(&decl) {
            return Some(*existing);
        }
        let kind = match env.foreign.decl(decl).kind {
            ForeignDeclKind::Function
            | ForeignDeclKind::Variable
            | ForeignDeclKind::EnumConstant => HostDeclKind::Value,
            ForeignDeclKind::Typedef
            | ForeignDeclKind::Tag(_)
            | ForeignDeclKind::Interface { .. }
            | ForeignDeclKind::Protocol => HostDeclKind::Type,
            ForeignDeclKind::Category { .. } => HostDeclKind::Extension,
            ForeignDeclKind::Other => return None,
        };
        let module = if self.builtin.contains(&decl) {
            env.host.builtin_module()
        } else {
            ModuleRef::Wrapper(env.module_for_decl(decl)?)
        };
        let imported = self.fresh(kind, module);
        self.imported.insert(decl, imported);
        self.import_order.push(decl);
        Some(imported)
    }

    fn import_macro(
        &mut self,
        env: &mut ImportEnv<'_>,
        name: Symbol,
        definition: &ForeignMacro,
    ) -> Option<HostDecl> {
        if definition.kind != MacroKind::ObjectLike || definition.tokens.is_empty() {
            return None;
        }
        if let Some(existing) = self.macros.get(&name) {
            return Some(*existing);
        }
        let module = env
            .session
            .first_module()
            .map(ModuleRef::Wrapper)
            .unwrap_or_else(|| env.host.builtin_module());
        let imported = self.fresh(HostDeclKind::Value, module);
        self.macros.insert(name, imported);
        Some(imported)
    }
}
