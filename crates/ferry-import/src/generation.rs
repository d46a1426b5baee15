// generation.rs
//
// Session epoch advanced whenever new foreign symbols may have become visible.

use std::fmt;

/// Snapshot of the import generation. Compare a snapshot taken before a
/// query with one taken after to decide whether negative lookups are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u32);

impl Generation {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Whether anything was imported since `earlier` was taken.
    pub fn is_newer_than(self, earlier: Generation) -> bool {
        self.0 > earlier.0
    }

    pub(crate) fn bump(&mut self) -> Generation {
        self.0 += 1;
        *self
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen {}", self.0)
    }
}
