// lib.rs
//
// Import broker between the host compiler and an embedded foreign (C-family)
// compiler: wrapper modules, adapter resolution, name translation and
// cross-namespace lookup.

pub mod adapter;
pub mod cache;
pub mod env;
pub mod errors;
pub mod extensions;
pub mod foreign;
pub mod generation;
pub mod host;
pub mod importer;
pub mod invocation;
pub mod lookup;
pub mod names;
pub mod reexport;
pub mod selectors;
pub mod session;
pub mod visible;
pub mod wrapper;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::{CacheLookup, WrapperCache};
pub use env::ImportEnv;
pub use errors::{CreateError, ImportError};
pub use extensions::ExtensionLoader;
pub use foreign::{
    ForeignCompiler, ForeignCompilerFactory, ForeignDecl, ForeignDeclKind, ForeignDeclName,
    ForeignMacro, ForeignSelector, ForeignToken, ImportLocation, LookupMode, MacroKind, TagKind,
};
pub use generation::Generation;
pub use host::{DeclImporter, HostContext, HostDecl, HostDeclKind, LookupKind, NominalTypeRef};
pub use importer::ForeignImporter;
pub use invocation::{ForeignInvocation, ImporterOptions, RemappedFile, ResourceDirLocator};
pub use lookup::{HostDeclVec, LookupBroker, PROTOCOL_SUFFIX};
pub use names::{HOST_RESERVED_NAMES, NameTranslator};
pub use reexport::ModuleRefVec;
pub use selectors::SubscriptSelectors;
pub use session::{ImportSession, ImportStats};
pub use visible::VisibleNameEnumerator;
pub use wrapper::{AdapterLink, WrapperModule};
