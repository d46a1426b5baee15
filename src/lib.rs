// src/lib.rs
//
// Host-side facade over the import broker crates.

pub mod logging;

pub use ferry_identity::{
    ComponentId, ForeignDeclId, ForeignIdent, ForeignModuleId, HostDeclId, HostModuleId,
    Interner, ModuleRef, Symbol, WrapperId,
};
pub use ferry_import::{
    CreateError, DeclImporter, ForeignCompiler, ForeignCompilerFactory, ForeignImporter,
    Generation, HostContext, HostDecl, HostDeclKind, ImportEnv, ImportError, ImportStats,
    ImporterOptions, LookupKind, NominalTypeRef, SubscriptSelectors,
};
