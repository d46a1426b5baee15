//! The foreign compiler as seen by the import broker.
//!
//! Everything here is consumed, not implemented: a real embedding wraps the
//! foreign compiler instance behind [`ForeignCompiler`] and hands the importer
//! a [`ForeignCompilerFactory`] that knows how to build one from a
//! [`ForeignInvocation`](crate::invocation::ForeignInvocation).

use ferry_identity::{ForeignDeclId, ForeignIdent, ForeignModuleId};

use crate::errors::CreateError;
use crate::invocation::ForeignInvocation;

/// Placeholder source position passed to the foreign module loader.
///
/// The loader insists on a position and deduplicates imports that share one,
/// so every load gets a fresh counter value. The value carries no location
/// meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportLocation(u32);

impl ImportLocation {
    pub fn new(offset: u32) -> Self {
        Self(offset)
    }

    pub fn offset(self) -> u32 {
        self.0
    }
}

/// Which foreign namespace a name lookup searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupMode {
    /// Typedefs, functions, variables, enumerators, classes.
    Ordinary,
    /// struct/union/enum tags.
    Tag,
    /// Protocols, which live apart from classes.
    Protocol,
    /// Everything, used by visible-decl enumeration.
    Any,
}

/// How the foreign lexer classifies an identifier-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignToken {
    Identifier,
    Keyword,
}

/// The name of a foreign declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForeignDeclName {
    Identifier(ForeignIdent),
    /// Multi-piece method selector, e.g. `setObject:forKeyedSubscript:`.
    Selector(ForeignSelector),
    Operator(String),
    Anonymous,
}

impl ForeignDeclName {
    pub fn as_identifier(&self) -> Option<ForeignIdent> {
        match self {
            ForeignDeclName::Identifier(ident) => Some(*ident),
            _ => None,
        }
    }
}

/// A method selector: identifier pieces plus arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignSelector {
    pieces: Vec<ForeignIdent>,
    num_args: usize,
}

impl ForeignSelector {
    /// A selector taking no arguments.
    pub fn nullary(piece: ForeignIdent) -> Self {
        Self {
            pieces: vec![piece],
            num_args: 0,
        }
    }

    /// A selector taking one argument per piece.
    pub fn keyword(pieces: Vec<ForeignIdent>) -> Self {
        let num_args = pieces.len();
        Self { pieces, num_args }
    }

    pub fn pieces(&self) -> &[ForeignIdent] {
        &self.pieces
    }

    pub fn num_args(&self) -> usize {
        self.num_args
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Struct,
    Union,
    Enum,
}

/// Tagged view of a foreign declaration's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignDeclKind {
    Function,
    Variable,
    EnumConstant,
    Typedef,
    Tag(TagKind),
    /// A class. `definition` is the full `@interface` when this declaration is
    /// only a forward declaration (or the definition itself).
    Interface { definition: Option<ForeignDeclId> },
    Protocol,
    /// A category (extension) attached to `class`.
    Category { class: ForeignDeclId },
    Other,
}

impl ForeignDeclKind {
    pub fn is_class_like(&self) -> bool {
        matches!(self, ForeignDeclKind::Interface { .. })
    }
}

/// Snapshot of what the broker needs to know about one foreign declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignDecl {
    pub id: ForeignDeclId,
    pub name: ForeignDeclName,
    pub kind: ForeignDeclKind,
    /// Module whose headers declare this entity, if any.
    pub owning_module: Option<ForeignModuleId>,
    pub module_private: bool,
    /// First declaration of the entity; `None` means this one is canonical.
    pub canonical: Option<ForeignDeclId>,
    /// Target of a using-shadow style alias; `None` means this declaration.
    pub underlying: Option<ForeignDeclId>,
}

impl ForeignDecl {
    /// The declaration to import: prefer the full definition of a class over
    /// a forward declaration, otherwise use the canonical declaration.
    pub fn resolved_definition(&self) -> ForeignDeclId {
        match self.kind {
            ForeignDeclKind::Interface {
                definition: Some(definition),
            } => definition,
            _ => self.canonical.unwrap_or(self.id),
        }
    }

    pub fn underlying_decl(&self) -> ForeignDeclId {
        self.underlying.unwrap_or(self.id)
    }

    pub fn is_named(&self) -> bool {
        !matches!(self.name, ForeignDeclName::Anonymous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    ObjectLike,
    FunctionLike,
}

/// A preprocessor macro definition. Passed through to the decl importer
/// unexamined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignMacro {
    pub name: ForeignIdent,
    pub kind: MacroKind,
    pub tokens: Vec<String>,
}

/// The capabilities of a live foreign compiler instance.
pub trait ForeignCompiler {
    /// Target triple the instance was configured for.
    fn target_triple(&self) -> &str;

    // ===== Identifier table =====

    /// Intern `text` in the foreign identifier table.
    fn intern_identifier(&mut self, text: &str) -> ForeignIdent;

    fn identifier_text(&self, ident: ForeignIdent) -> &str;

    fn identifier_token(&self, ident: ForeignIdent) -> ForeignToken;

    /// Build a keyword selector, one argument per piece: `["setObject",
    /// "forKeyedSubscript"]` is `setObject:forKeyedSubscript:`. Nullary
    /// selectors go through [`ForeignSelector::nullary`].
    fn keyword_selector(&mut self, pieces: &[&str]) -> ForeignSelector {
        ForeignSelector::keyword(pieces.iter().map(|p| self.intern_identifier(p)).collect())
    }

    // ===== Modules =====

    /// Resolve a dotted module path with all of its submodules made visible.
    /// `None` means the module was not found.
    fn load_module(
        &mut self,
        location: ImportLocation,
        path: &[ForeignIdent],
    ) -> Option<ForeignModuleId>;

    /// Short (last-segment) module name.
    fn module_name(&self, module: ForeignModuleId) -> &str;

    fn parent_module(&self, module: ForeignModuleId) -> Option<ForeignModuleId>;

    /// Modules re-exported by `module`, in declaration order.
    fn exported_modules(&self, module: ForeignModuleId) -> Vec<ForeignModuleId>;

    fn top_level_module(&self, module: ForeignModuleId) -> ForeignModuleId {
        let mut current = module;
        while let Some(parent) = self.parent_module(current) {
            current = parent;
        }
        current
    }

    /// Dotted name from the top-level module down, e.g. `Darwin.C.stdio`.
    fn full_module_name(&self, module: ForeignModuleId) -> String {
        let mut segments = vec![self.module_name(module)];
        let mut current = module;
        while let Some(parent) = self.parent_module(current) {
            segments.push(self.module_name(parent));
            current = parent;
        }
        segments.reverse();
        segments.join(".")
    }

    fn is_submodule(&self, module: ForeignModuleId) -> bool {
        self.parent_module(module).is_some()
    }

    // ===== Semantic analysis =====

    fn decl(&self, decl: ForeignDeclId) -> ForeignDecl;

    /// Global-scope name lookup in the given namespace.
    fn lookup_name(&self, name: ForeignIdent, mode: LookupMode) -> Vec<ForeignDeclId>;

    /// Visit every declaration visible at translation-unit scope.
    fn visit_visible_decls(&self, mode: LookupMode, visitor: &mut dyn FnMut(ForeignDeclId));

    fn macro_definition(&self, name: ForeignIdent) -> Option<ForeignMacro>;

    /// Categories of `class` that are currently visible.
    fn visible_categories(&self, class: ForeignDeclId) -> Vec<ForeignDeclId>;
}

/// Builds a configured [`ForeignCompiler`] from an invocation.
pub trait ForeignCompilerFactory {
    fn instantiate(
        &mut self,
        invocation: &ForeignInvocation,
    ) -> Result<Box<dyn ForeignCompiler>, CreateError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(kind: ForeignDeclKind) -> ForeignDecl {
        ForeignDecl {
            id: ForeignDeclId::new(1),
            name: ForeignDeclName::Anonymous,
            kind,
            owning_module: None,
            module_private: false,
            canonical: None,
            underlying: None,
        }
    }

    #[test]
    fn resolved_definition_prefers_interface_definition() {
        let forward = decl(ForeignDeclKind::Interface {
            definition: Some(ForeignDeclId::new(7)),
        });
        assert_eq!(forward.resolved_definition(), ForeignDeclId::new(7));

        let undefined = decl(ForeignDeclKind::Interface { definition: None });
        assert_eq!(undefined.resolved_definition(), ForeignDeclId::new(1));
    }

    #[test]
    fn resolved_definition_uses_canonical_for_other_kinds() {
        let mut redecl = decl(ForeignDeclKind::Function);
        redecl.canonical = Some(ForeignDeclId::new(4));
        assert_eq!(redecl.resolved_definition(), ForeignDeclId::new(4));
        assert_eq!(redecl.underlying_decl(), ForeignDeclId::new(1));
        assert!(!redecl.is_named());
    }
}
