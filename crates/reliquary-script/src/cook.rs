//! Cooked property data.
//!
//! Game files store property values big-endian. From Echoes on, each struct
//! is a `u16` property count followed by `(u32 id, u16 size, payload)`
//! entries, so readers can skip properties they do not know. Prime structs
//! are a `u32` count followed by bare payloads in template order. Atomic
//! structs are always bare payloads.

use byteorder::{BigEndian, WriteBytesExt};
use reliquary_common::{BinaryReader, Game};
use tracing::debug;

use crate::{CookPreference, Error, PropertyArena, PropertyData, PropertyId, PropertyType, PropertyValue, Result};

const GUID_SIZE: usize = 16;

/// Cook the object rooted at `root` from its property data.
pub fn cook_object(arena: &PropertyArena, root: PropertyId, data: &PropertyData) -> Result<Vec<u8>> {
    let cooker = Cooker {
        arena,
        game: arena.node(root).game(),
    };
    let mut out = Vec::new();
    cooker.write_struct(root, data, &mut out)?;
    Ok(out)
}

/// Read cooked bytes back into a fresh record for `root`.
///
/// Properties missing from the bytes keep their defaults. Echoes-style
/// entries with IDs the template does not know are skipped.
pub fn read_cooked(arena: &PropertyArena, root: PropertyId, bytes: &[u8]) -> Result<PropertyData> {
    let cooker = Cooker {
        arena,
        game: arena.node(root).game(),
    };
    let mut data = arena.initialize_data(root)?;
    let mut reader = BinaryReader::new(bytes);
    cooker.read_struct(root, &mut reader, &mut data)?;
    Ok(data)
}

struct Cooker<'a> {
    arena: &'a PropertyArena,
    game: Game,
}

impl Cooker<'_> {
    fn members(&self, id: PropertyId) -> impl Iterator<Item = PropertyId> + '_ {
        self.arena
            .children(id)
            .filter(|&c| !self.arena.node(c).is_intrinsic())
    }

    fn has_property_ids(&self) -> bool {
        self.game > Game::Prime
    }

    fn write_struct(&self, id: PropertyId, record: &PropertyData, out: &mut Vec<u8>) -> Result<()> {
        let node = self.arena.node(id);

        if node.is_atomic() {
            for child in self.members(id) {
                self.write_payload(child, record, out)?;
            }
            return Ok(());
        }

        let children: Vec<PropertyId> = self
            .members(id)
            .filter(|&c| self.arena.should_cook(c, record))
            .collect();

        if !self.has_property_ids() {
            out.write_u32::<BigEndian>(children.len() as u32)?;
            for child in children {
                self.write_payload(child, record, out)?;
            }
            return Ok(());
        }

        let count = u16::try_from(children.len())
            .map_err(|_| Error::Cook(format!("struct 0x{:08X} has too many properties", node.id())))?;
        out.write_u16::<BigEndian>(count)?;

        for child in children {
            let mut payload = Vec::new();
            self.write_payload(child, record, &mut payload)?;

            let child_id = self.arena.node(child).id();
            let size = u16::try_from(payload.len())
                .map_err(|_| Error::Cook(format!("property 0x{child_id:08X} is too large")))?;

            out.write_u32::<BigEndian>(child_id)?;
            out.write_u16::<BigEndian>(size)?;
            out.extend_from_slice(&payload);
        }
        Ok(())
    }

    fn write_payload(&self, id: PropertyId, record: &PropertyData, out: &mut Vec<u8>) -> Result<()> {
        let node = self.arena.node(id);

        match node.property_type() {
            PropertyType::Struct | PropertyType::Pointer => return self.write_struct(id, record, out),
            PropertyType::Array => {
                let item = self
                    .arena
                    .item_archetype(id)
                    .ok_or(Error::MissingStorage(node.id()))?;
                let len = self.arena.array_len(id, record);

                out.write_u32::<BigEndian>(len as u32)?;
                for index in 0..len {
                    if let Some(element) = self.arena.array_element(id, record, index) {
                        self.write_payload(item, element, out)?;
                    }
                }
                return Ok(());
            }
            _ => {}
        }

        // A null pointer on the way cooks the defaults.
        let value = self
            .arena
            .value(id, record)
            .or_else(|| node.default_value().cloned())
            .ok_or(Error::MissingStorage(node.id()))?;

        match value {
            PropertyValue::Bool(v) => out.write_u8(v as u8)?,
            PropertyValue::Byte(v) => out.write_i8(v)?,
            PropertyValue::Short(v) => out.write_i16::<BigEndian>(v)?,
            PropertyValue::Int(v) => out.write_i32::<BigEndian>(v)?,
            PropertyValue::Float(v) => out.write_f32::<BigEndian>(v)?,
            PropertyValue::Vector(v) => {
                for c in v.to_array() {
                    out.write_f32::<BigEndian>(c)?;
                }
            }
            PropertyValue::Color(v) => {
                for c in v.to_array() {
                    out.write_f32::<BigEndian>(c)?;
                }
            }
            PropertyValue::Enum(v)
            | PropertyValue::Flags(v)
            | PropertyValue::Sound(v)
            | PropertyValue::Animation(v) => out.write_u32::<BigEndian>(v)?,
            PropertyValue::Asset(v) if self.game < Game::WIDE_ASSET_IDS => out.write_u32::<BigEndian>(v as u32)?,
            PropertyValue::Asset(v) => out.write_u64::<BigEndian>(v)?,
            PropertyValue::String(v) => {
                out.extend_from_slice(v.as_bytes());
                out.push(0);
            }
            PropertyValue::Bytes(v) => out.extend_from_slice(&v),
        }
        Ok(())
    }

    fn read_struct(&self, id: PropertyId, reader: &mut BinaryReader<'_>, record: &mut PropertyData) -> Result<()> {
        if self.arena.node(id).is_atomic() {
            let members: Vec<PropertyId> = self.members(id).collect();
            for child in members {
                self.read_payload(child, reader, record, None)?;
            }
            return Ok(());
        }

        if !self.has_property_ids() {
            let count = reader.read_u32()? as usize;
            let members: Vec<PropertyId> = self
                .members(id)
                .filter(|&c| self.arena.node(c).cook_preference() != CookPreference::Never)
                .take(count)
                .collect();
            for child in members {
                self.read_payload(child, reader, record, None)?;
            }
            return Ok(());
        }

        let count = reader.read_u16()?;
        for _ in 0..count {
            let child_id = reader.read_u32()?;
            let size = reader.read_u16()? as usize;
            let payload = reader.read_bytes(size)?;

            let child = self
                .members(id)
                .find(|&c| self.arena.node(c).id() == child_id);
            match child {
                Some(child) => {
                    let mut sub = BinaryReader::new(payload);
                    self.read_payload(child, &mut sub, record, Some(size))?;
                }
                None => debug!(id = format_args!("0x{child_id:08X}"), size, "skipping unknown cooked property"),
            }
        }
        Ok(())
    }

    fn read_payload(
        &self,
        id: PropertyId,
        reader: &mut BinaryReader<'_>,
        record: &mut PropertyData,
        size: Option<usize>,
    ) -> Result<()> {
        let node = self.arena.node(id);

        let value = match node.property_type() {
            PropertyType::Struct | PropertyType::Pointer => return self.read_struct(id, reader, record),
            PropertyType::Array => {
                let item = self
                    .arena
                    .item_archetype(id)
                    .ok_or(Error::MissingStorage(node.id()))?;
                let len = reader.read_u32()? as usize;
                self.arena.resize_array(id, record, len)?;

                let elements = self.arena.value_location_mut(id, record).array_mut(node.offset());
                for element in elements.iter_mut() {
                    self.read_payload(item, reader, element, None)?;
                }
                return Ok(());
            }
            PropertyType::Bool => PropertyValue::Bool(reader.read_bool()?),
            PropertyType::Byte => PropertyValue::Byte(reader.read_i8()?),
            PropertyType::Short => PropertyValue::Short(reader.read_i16()?),
            PropertyType::Int => PropertyValue::Int(reader.read_i32()?),
            PropertyType::Float => PropertyValue::Float(reader.read_f32()?),
            PropertyType::String => PropertyValue::String(reader.read_cstring()?.to_string()),
            PropertyType::Vector => PropertyValue::Vector(glam::Vec3::new(
                reader.read_f32()?,
                reader.read_f32()?,
                reader.read_f32()?,
            )),
            PropertyType::Color => PropertyValue::Color(glam::Vec4::new(
                reader.read_f32()?,
                reader.read_f32()?,
                reader.read_f32()?,
                reader.read_f32()?,
            )),
            PropertyType::Enum | PropertyType::Choice => PropertyValue::Enum(reader.read_u32()?),
            PropertyType::Flags => PropertyValue::Flags(reader.read_u32()?),
            PropertyType::Sound => PropertyValue::Sound(reader.read_u32()?),
            PropertyType::Animation => PropertyValue::Animation(reader.read_u32()?),
            PropertyType::Asset if self.game < Game::WIDE_ASSET_IDS => match reader.read_u32()? {
                u32::MAX => PropertyValue::Asset(u64::MAX),
                v => PropertyValue::Asset(v as u64),
            },
            PropertyType::Asset => PropertyValue::Asset(reader.read_u64()?),
            PropertyType::Guid => PropertyValue::Bytes(reader.read_bytes(size.unwrap_or(GUID_SIZE))?.to_vec()),
            PropertyType::Spline => {
                let size = size.ok_or_else(|| {
                    Error::Cook(format!("spline 0x{:08X} has no size to read", node.id()))
                })?;
                PropertyValue::Bytes(reader.read_bytes(size)?.to_vec())
            }
        };

        self.arena.set_value(id, record, value)
    }
}
