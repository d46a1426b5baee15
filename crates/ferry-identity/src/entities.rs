//! First-class identity types for entities on both sides of the bridge.
//!
//! Host-side ids are allocated by the import session (wrappers, components)
//! or by the host compiler (host modules, host declarations). Foreign-side ids
//! are opaque handles handed out by the foreign compiler and are only ever
//! compared, never dereferenced.

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis struct $name(u32);

        impl $name {
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            pub const fn index(self) -> u32 {
                self.0
            }
        }
    };
}

define_entity_id! {
    /// Identity for a wrapper module (host-side stand-in for one foreign module)
    pub struct WrapperId;
}

define_entity_id! {
    /// Identity for a component (ownership cluster of related wrappers)
    pub struct ComponentId;
}

define_entity_id! {
    /// Identity for a hand-written host module
    pub struct HostModuleId;
}

define_entity_id! {
    /// Identity for a host declaration produced by the decl importer
    pub struct HostDeclId;
}

define_entity_id! {
    /// Opaque foreign module handle
    pub struct ForeignModuleId;
}

define_entity_id! {
    /// Opaque foreign declaration handle
    pub struct ForeignDeclId;
}

define_entity_id! {
    /// Entry in the foreign compiler's identifier table
    pub struct ForeignIdent;
}
