//! Property state flags.

use bitflags::bitflags;

bitflags! {
    /// State and role flags carried by every property node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u32 {
        /// `initialize` has run.
        const INITIALIZED = 0x1;
        /// Synthesized by the parent type rather than read from a template.
        const INTRINSIC = 0x2;
        /// Children are named inline instead of through the name map.
        const ATOMIC = 0x4;
        /// Part of a property archetype tree.
        const ARCHETYPE = 0x8;
        /// Part of an array's item archetype.
        const ARRAY_ARCHETYPE = 0x10;
        /// Modified since the template was loaded.
        const DIRTY = 0x20;
        /// `HAS_CORRECT_PROPERTY_NAME` holds a computed result.
        const HAS_CACHED_NAME_CHECK = 0x40;
        /// The name hashes to the property ID.
        const HAS_CORRECT_PROPERTY_NAME = 0x80;

        /// Flags copied from an archetype onto its clones.
        const ARCHETYPE_COPY = Self::ATOMIC.bits();
        /// Flags a child inherits from its parent.
        const INHERITABLE = Self::ARCHETYPE.bits() | Self::ARRAY_ARCHETYPE.bits();
    }
}
