//! Reliquary - script object template toolkit for the Metroid Prime engine
//! family.
//!
//! This crate provides a unified interface to the Reliquary crates.
//!
//! # Crates
//!
//! - [`reliquary_common`] - Common utilities (CRC32C, four-character codes, game versions, binary reading)
//! - [`reliquary_archive`] - Named-parameter archives and their XML reader and writer
//! - [`reliquary_script`] - Property templates, the property name map and cooked data
//!
//! # Example
//!
//! ```no_run
//! use reliquary::prelude::*;
//!
//! let mut db = TemplateDatabase::open(DatabaseConfig::new("resources"))?;
//! let master = db.master(Game::Echoes)?;
//! println!("{} templates", master.num_script_templates());
//!
//! for entry in db.names().iter().filter(|e| !e.is_valid) {
//!     println!("0x{:08X} {} {}", entry.id, entry.type_name, entry.name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use reliquary_archive as archive;
pub use reliquary_common as common;
pub use reliquary_script as script;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use reliquary_archive::{Archive, SerialFlags, XmlReader, XmlWriter};
    pub use reliquary_common::{crc, BinaryReader, FourCC, Game, INVALID_ID};
    pub use reliquary_script::{
        cook_object, read_cooked, DatabaseConfig, EditorProperty, MasterTemplate, NameMapConfig, PropertyArena,
        PropertyData, PropertyId, PropertyNameMap, PropertyType, PropertyValue, ScriptTemplate, TemplateDatabase,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
