//! The host compiler as seen by the import broker.

use ferry_identity::{ForeignDeclId, HostDeclId, ModuleRef, Symbol};

use crate::env::ImportEnv;
use crate::foreign::ForeignMacro;

/// Host compiler services the broker depends on.
pub trait HostContext {
    /// Intern text in the host identifier table.
    fn intern(&mut self, text: &str) -> Symbol;

    fn resolve(&self, name: Symbol) -> &str;

    fn is_operator(&self, name: Symbol) -> bool {
        ferry_identity::is_operator_text(self.resolve(name))
    }

    /// The host's own built-in module. Declarations living there are never
    /// re-exported through the bridge.
    fn builtin_module(&self) -> ModuleRef;

    /// Resolve a module by name the way an `import` of that name would.
    fn resolve_module(&mut self, name: Symbol) -> Option<ModuleRef>;

    /// Called whenever the broker's generation advances.
    fn bump_generation(&mut self) {}
}

/// Name lookup flavour requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Unqualified,
    Qualified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostDeclKind {
    /// Functions, variables, constants.
    Value,
    /// Nominal types and typealiases (also values in the host).
    Type,
    Extension,
    Other,
}

/// A host declaration produced by the decl importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostDecl {
    pub id: HostDeclId,
    pub kind: HostDeclKind,
    /// Module context the declaration lives in.
    pub module: ModuleRef,
}

impl HostDecl {
    pub fn is_value(&self) -> bool {
        matches!(self.kind, HostDeclKind::Value | HostDeclKind::Type)
    }

    pub fn is_type(&self) -> bool {
        self.kind == HostDeclKind::Type
    }
}

/// A host nominal type, possibly backed by a foreign declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NominalTypeRef {
    pub decl: HostDeclId,
    pub foreign_decl: Option<ForeignDeclId>,
}

/// Translates single foreign declarations into host declarations.
///
/// Importing may itself create wrappers (through
/// [`ImportEnv::module_for_decl`]) and register extensions with the host;
/// the broker treats all of that as opaque.
pub trait DeclImporter {
    fn import_decl(&mut self, env: &mut ImportEnv<'_>, decl: ForeignDeclId) -> Option<HostDecl>;

    fn import_macro(
        &mut self,
        env: &mut ImportEnv<'_>,
        name: Symbol,
        definition: &ForeignMacro,
    ) -> Option<HostDecl>;
}
