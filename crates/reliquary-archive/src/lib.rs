//! Named-parameter serialization archives.
//!
//! Template files, master files and the property name map are all read and
//! written through the [`Archive`] contract: an ordered stream of named
//! parameters with a read/write mode, a target [`Game`], and a capability flag
//! that allows parameters equal to their default to be omitted.
//!
//! The same serialization routine handles both directions:
//!
//! ```
//! use reliquary_archive::{Archive, SerialFlags, XmlReader, XmlWriter};
//! use reliquary_common::Game;
//!
//! fn serialize<A: Archive>(arc: &mut A, id: &mut u32, name: &mut String) -> reliquary_archive::Result<()> {
//!     arc.param("ID", id, SerialFlags::ATTRIBUTE | SerialFlags::HEX_DISPLAY, None)?;
//!     arc.param("Name", name, SerialFlags::OPTIONAL, Some(String::new()))?;
//!     Ok(())
//! }
//!
//! let mut writer = XmlWriter::new("Property", Game::Echoes);
//! serialize(&mut writer, &mut 0x41, &mut "Health".to_string())?;
//! let xml = writer.to_xml_string()?;
//!
//! let mut reader = XmlReader::parse(&xml)?;
//! let (mut id, mut name) = (0, String::new());
//! serialize(&mut reader, &mut id, &mut name)?;
//! assert_eq!((id, name.as_str()), (0x41, "Health"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod archive;
mod element;
mod error;
mod reader;
mod value;
mod writer;

pub use archive::{Archive, SerialFlags, CURRENT_ARCHIVE_VERSION};
pub use element::XmlElement;
pub use error::{Error, Result};
pub use reader::XmlReader;
pub use value::ArchiveValue;
pub use writer::XmlWriter;

pub use reliquary_common::Game;
