// intern.rs
//
// Host identifier table.

use std::hash::BuildHasher;

use crate::Symbol;
use hashbrown::hash_map::RawEntryMut;
use rustc_hash::FxBuildHasher;

/// Interns host identifier text to unique [`Symbol`]s. Symbols index into
/// `names` in creation order.
#[derive(Debug, Clone, Default)]
pub struct Interner {
    symbols: hashbrown::HashMap<Box<str>, Symbol, FxBuildHasher>,
    names: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> Symbol {
        let hash = self.symbols.hasher().hash_one(text);
        match self
            .symbols
            .raw_entry_mut()
            .from_hash(hash, |existing| &**existing == text)
        {
            RawEntryMut::Occupied(entry) => *entry.get(),
            RawEntryMut::Vacant(entry) => {
                let symbol = Symbol::new(self.names.len() as u32);
                self.names.push(text.into());
                entry.insert_hashed_nocheck(hash, text.into(), symbol);
                symbol
            }
        }
    }

    pub fn resolve(&self, symbol: Symbol) -> &str {
        &self.names[symbol.index() as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `symbol` is spelled as a host operator.
    pub fn is_operator(&self, symbol: Symbol) -> bool {
        crate::is_operator_text(self.resolve(symbol))
    }
}
