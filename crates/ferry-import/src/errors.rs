// errors.rs
//! Import broker errors (F1xxx).
//!
//! `NameUnrepresentable` and `ModuleNotFound` are soft: the host reports them
//! as "no such module" and may try another loader. `AdapterNameCollision` is
//! an invariant violation and must not be swallowed. Lookup paths never
//! produce errors at all; a missing foreign symbol is an empty result.

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("'{name}' has no foreign spelling")]
    #[diagnostic(
        code(F1001),
        help("operators, reserved host names and foreign keywords cannot name foreign modules")
    )]
    NameUnrepresentable { name: String },

    #[error("no such module '{path}'")]
    #[diagnostic(code(F1002))]
    ModuleNotFound { path: String },

    #[error("module name '{name}' is claimed by both {existing} and {adapter}")]
    #[diagnostic(
        code(F1003),
        help("two foreign modules or adapters resolve to the same host module name")
    )]
    AdapterNameCollision {
        name: String,
        existing: String,
        adapter: String,
    },
}

impl ImportError {
    /// Soft errors mean "this loader has no such module"; callers may move on
    /// to the next loader without emitting an internal error.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            ImportError::NameUnrepresentable { .. } | ImportError::ModuleNotFound { .. }
        )
    }
}

/// Failures while constructing the foreign compiler instance.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum CreateError {
    #[error("failed to construct foreign compiler invocation: {reason}")]
    #[diagnostic(code(F1101))]
    InvocationConstructionFailed { reason: String },

    #[error("foreign compiler has no target for triple '{triple}'")]
    #[diagnostic(code(F1102))]
    TargetUnavailable { triple: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_errors() {
        assert!(
            ImportError::ModuleNotFound {
                path: "Foundation".to_string()
            }
            .is_soft()
        );
        assert!(
            ImportError::NameUnrepresentable {
                name: "true".to_string()
            }
            .is_soft()
        );
        assert!(
            !ImportError::AdapterNameCollision {
                name: "Foundation".to_string(),
                existing: "host module #1".to_string(),
                adapter: "host module #2".to_string(),
            }
            .is_soft()
        );
    }

    #[test]
    fn messages() {
        let err = ImportError::ModuleNotFound {
            path: "UIKit.UIView".to_string(),
        };
        assert_eq!(err.to_string(), "no such module 'UIKit.UIView'");
    }
}
