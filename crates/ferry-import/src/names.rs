//! Translation between host identifiers and foreign declaration names.

use ferry_identity::{ForeignIdent, Symbol};

use crate::foreign::{ForeignCompiler, ForeignDeclName, ForeignToken};
use crate::host::HostContext;

/// Names the host reserves for itself. Foreign entities spelled this way
/// cannot be surfaced, and these names never reach the foreign compiler.
pub const HOST_RESERVED_NAMES: &[&str] = &["true", "false"];

pub fn is_host_reserved(text: &str) -> bool {
    HOST_RESERVED_NAMES.contains(&text)
}

/// Bidirectional name mapping with reserved-word and operator filtering.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameTranslator;

impl NameTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Foreign spelling of a host identifier, or `None` when the foreign
    /// language cannot name it (operator, host-reserved, or foreign keyword).
    pub fn host_to_foreign(
        &self,
        foreign: &mut dyn ForeignCompiler,
        host: &dyn HostContext,
        name: Symbol,
    ) -> Option<ForeignIdent> {
        // TODO: operators could map onto foreign operator functions once the
        // foreign side exposes operator lookup.
        if host.is_operator(name) {
            return None;
        }

        let text = host.resolve(name);
        if text.is_empty() || is_host_reserved(text) {
            return None;
        }

        let ident = foreign.intern_identifier(text);
        if foreign.identifier_token(ident) != ForeignToken::Identifier {
            return None;
        }
        Some(ident)
    }

    /// Host identifier for a foreign declaration name, with `suffix`
    /// appended when non-empty.
    pub fn foreign_to_host(
        &self,
        foreign: &dyn ForeignCompiler,
        host: &mut dyn HostContext,
        name: &ForeignDeclName,
        suffix: &str,
    ) -> Option<Symbol> {
        // Selectors and operators have no host spelling yet.
        let ident = name.as_identifier()?;
        let text = foreign.identifier_text(ident);

        // A reserved foreign spelling stays rejected even when suffixed.
        if is_host_reserved(text) {
            return None;
        }
        if suffix.is_empty() {
            return Some(host.intern(text));
        }

        let suffixed = format!("{text}{suffix}");
        if is_host_reserved(&suffixed) {
            return None;
        }
        Some(host.intern(&suffixed))
    }
}
