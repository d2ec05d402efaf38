//! Error types for property templates and the name map.

use thiserror::Error;

use crate::PropertyType;

/// Errors that can occur when building, loading or cooking property trees.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] reliquary_common::Error),

    /// Archive reading or writing error.
    #[error("{0}")]
    Archive(#[from] reliquary_archive::Error),

    /// JSON serialization error.
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A property was initialized a second time.
    #[error("property 0x{id:08X} ({name}) is already initialized")]
    AlreadyInitialized { id: u32, name: String },

    /// An archetype was destroyed while clones of it were still alive.
    #[error("archetype '{name}' still has {instances} live sub-instance(s)")]
    ArchetypeInUse { name: String, instances: usize },

    /// A template referenced a property archetype that does not exist.
    #[error("unresolved property archetype '{0}'")]
    UnresolvedArchetype(String),

    /// A property archetype references itself through its own children.
    #[error("property archetype '{0}' references itself")]
    ArchetypeCycle(String),

    /// An ID string did not match `Segment (':' Segment)*`.
    #[error("malformed ID string: {0:?}")]
    MalformedIdString(String),

    /// The legacy name map has no name for a property that must exist.
    #[error("property 0x{0:08X} is missing from the legacy name map")]
    LegacyNameMissing(u32),

    /// Template data named a property type that does not exist.
    #[error("unknown property type: {0:?}")]
    UnknownPropertyType(String),

    /// The name map only accepts properties with a real ID.
    #[error("property 0x{0:08X} cannot be registered in the name map")]
    UnregistrableProperty(u32),

    /// A value of the wrong kind was written to a property.
    #[error("cannot store a {found} value in a {expected} property")]
    ValueTypeMismatch {
        expected: PropertyType,
        found: &'static str,
    },

    /// The property data has no storage for the requested property.
    #[error("property data has no storage for property 0x{0:08X}")]
    MissingStorage(u32),

    /// The requested game is not listed in the game list.
    #[error("game not listed in the game list: {0}")]
    GameNotListed(reliquary_common::Game),

    /// Cooked data could not be written or read.
    #[error("cook error: {0}")]
    Cook(String),
}

/// Result type for property template operations.
pub type Result<T> = std::result::Result<T, Error>;
