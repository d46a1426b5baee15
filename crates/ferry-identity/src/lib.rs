// lib.rs
//
// Shared identity primitives for the import broker: host identifiers,
// entity ids for both sides of the bridge, and module references.

mod entities;
mod intern;
mod symbol;

pub use entities::{
    ComponentId, ForeignDeclId, ForeignIdent, ForeignModuleId, HostDeclId, HostModuleId,
    WrapperId,
};
pub use intern::Interner;
pub use symbol::Symbol;

/// Characters that start a host operator name.
const OPERATOR_START_CHARS: &[char] = &[
    '/', '=', '-', '+', '!', '*', '%', '<', '>', '&', '|', '^', '~', '?', '.',
];

/// Whether `text` is spelled as a host operator rather than an identifier.
pub fn is_operator_text(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| OPERATOR_START_CHARS.contains(&c))
}

/// Any module visible to the host: either a wrapper standing in for a
/// foreign module, or a hand-written host module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleRef {
    Wrapper(WrapperId),
    Host(HostModuleId),
}

impl ModuleRef {
    pub fn as_wrapper(self) -> Option<WrapperId> {
        match self {
            ModuleRef::Wrapper(id) => Some(id),
            ModuleRef::Host(_) => None,
        }
    }
}

impl std::fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleRef::Wrapper(id) => write!(f, "wrapper module #{}", id.index()),
            ModuleRef::Host(id) => write!(f, "host module #{}", id.index()),
        }
    }
}

impl From<WrapperId> for ModuleRef {
    fn from(id: WrapperId) -> Self {
        ModuleRef::Wrapper(id)
    }
}

impl From<HostModuleId> for ModuleRef {
    fn from(id: HostModuleId) -> Self {
        ModuleRef::Host(id)
    }
}
