//! Script object templates for the Metroid Prime engine family.
//!
//! Every script object type of a game is described by a template: a tree of
//! typed, versioned properties loaded from XML. This crate builds those
//! trees, lays them out into byte offsets, names ID-only properties through
//! the property name map and reads and writes cooked property data.
//!
//! # Quick Start
//!
//! ```no_run
//! use reliquary_common::Game;
//! use reliquary_script::{DatabaseConfig, TemplateDatabase};
//!
//! let mut db = TemplateDatabase::open(DatabaseConfig::new("resources"))?;
//! let master = db.master(Game::Echoes)?;
//!
//! for template in master.templates() {
//!     println!("{} ({})", template.name(), template.object_fourcc());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - **Properties** ([`PropertyArena`]): owner of every property node. Nodes
//!   are addressed by [`PropertyId`]; clones keep a link to their archetype.
//! - **Name map** ([`PropertyNameMap`]): `(type, ID) -> name` for games that
//!   identify properties by hash.
//! - **Templates** ([`ScriptTemplate`], [`MasterTemplate`]): per-object and
//!   per-game registries.
//! - **Database** ([`TemplateDatabase`]): loads games on demand and owns the
//!   arena and the name map.
//! - **Cooking** ([`cook_object`], [`read_cooked`]): big-endian game format.
//!
//! # Property Values
//!
//! ```no_run
//! use reliquary_common::Game;
//! use reliquary_script::{DatabaseConfig, PropertyValue, TemplateDatabase};
//!
//! let mut db = TemplateDatabase::open(DatabaseConfig::new("resources"))?;
//! let door = db.master(Game::Echoes)?.template_by_fourcc("DOOR".parse()?).unwrap();
//! let root = door.properties().unwrap();
//!
//! let arena = db.arena();
//! let mut data = arena.initialize_data(root)?;
//! if let Some(health) = arena.child_by_id_string(root, "0xCF90D15E:0xF0668919")? {
//!     arena.set_value(health, &mut data, PropertyValue::Float(20.0))?;
//! }
//! let cooked = reliquary_script::cook_object(arena, root, &data)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod cook;
mod data;
mod database;
mod error;
mod flags;
mod loader;
mod master;
mod name_map;
mod template;
mod types;
mod value;

pub mod property;

#[cfg(feature = "parallel")]
mod sync;

// Primary API
pub use database::{DatabaseConfig, TemplateDatabase};
pub use error::{Error, Result};
pub use master::MasterTemplate;
pub use name_map::{NameKey, NameMapConfig, NameMapEntry, PropertyNameMap, UNKNOWN_NAME};
pub use template::{EditorProperty, RotationType, ScaleType, ScriptTemplate};

// Properties
pub use data::PropertyData;
pub use flags::PropertyFlags;
pub use property::{
    format_id_string, parse_id_string, EnumNaming, EnumProperty, EnumValue, PropertyArena, PropertyId, PropertyKind,
    PropertyNode, PropertySummary, TemplateRef,
};
pub use types::{CookPreference, PropertyType};
pub use value::PropertyValue;

// Loading and cooking
pub use cook::{cook_object, read_cooked};
pub use loader::{load_master, read_game_list, GameListEntry};

#[cfg(feature = "parallel")]
pub use sync::SharedDatabase;
