// selectors.rs
//
// Selectors the host uses to map subscripting onto foreign methods.

use crate::foreign::{ForeignCompiler, ForeignSelector};

/// The four subscript accessor selectors, built once per importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptSelectors {
    /// `objectAtIndexedSubscript:`
    pub object_at_indexed: ForeignSelector,
    /// `setObject:atIndexedSubscript:`
    pub set_object_at_indexed: ForeignSelector,
    /// `objectForKeyedSubscript:`
    pub object_for_keyed: ForeignSelector,
    /// `setObject:forKeyedSubscript:`
    pub set_object_for_keyed: ForeignSelector,
}

impl SubscriptSelectors {
    pub fn new(foreign: &mut dyn ForeignCompiler) -> Self {
        Self {
            object_at_indexed: foreign.keyword_selector(&["objectAtIndexedSubscript"]),
            set_object_at_indexed: foreign.keyword_selector(&["setObject", "atIndexedSubscript"]),
            object_for_keyed: foreign.keyword_selector(&["objectForKeyedSubscript"]),
            set_object_for_keyed: foreign.keyword_selector(&["setObject", "forKeyedSubscript"]),
        }
    }
}
