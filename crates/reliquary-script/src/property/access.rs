//! Reading and writing property values in [`PropertyData`] records.

use glam::{Vec3, Vec4};
use reliquary_common::Game;

use super::{PropertyArena, PropertyId, PropertyKind};
use crate::{CookPreference, Error, PropertyData, PropertyType, PropertyValue, Result};

impl PropertyArena {
    /// Pointer-typed ancestors whose records must be entered to reach the
    /// node's value, outermost first.
    ///
    /// The walk stops at an array: elements do not know their own index, so
    /// callers pass the element record directly.
    fn indirections(&self, id: PropertyId) -> Vec<PropertyId> {
        let mut chain = Vec::new();
        let mut current = self.node(id).pointer_parent;

        while let Some(pointer) = current {
            if matches!(self.node(pointer).kind, PropertyKind::Array) {
                break;
            }
            chain.push(pointer);
            current = self.node(pointer).pointer_parent;
        }

        chain.reverse();
        chain
    }

    /// The record holding the node's value, following pointer indirections
    /// from `data`. `None` when a pointer on the way is null.
    pub fn value_location<'a>(&self, id: PropertyId, data: &'a PropertyData) -> Option<&'a PropertyData> {
        self.indirections(id)
            .into_iter()
            .try_fold(data, |record, pointer| record.object(self.node(pointer).offset))
    }

    /// Mutable variant of [`Self::value_location`]. Null pointers on the
    /// way are allocated.
    pub fn value_location_mut<'a>(&self, id: PropertyId, data: &'a mut PropertyData) -> &'a mut PropertyData {
        self.indirections(id).into_iter().fold(data, |record, pointer| {
            record.object_or_insert(self.node(pointer).offset, self.record_size(pointer))
        })
    }

    /// Read the node's value from `data`.
    ///
    /// Returns `None` for aggregates and when the value is out of range.
    pub fn value(&self, id: PropertyId, data: &PropertyData) -> Option<PropertyValue> {
        let record = self.value_location(id, data)?;
        let offset = self.node(id).offset;

        let value = match self.node(id).property_type() {
            PropertyType::Bool => PropertyValue::Bool(record.read_u8(offset)? != 0),
            PropertyType::Byte => PropertyValue::Byte(record.read_u8(offset)? as i8),
            PropertyType::Short => PropertyValue::Short(record.read_u16(offset)? as i16),
            PropertyType::Int => PropertyValue::Int(record.read_u32(offset)? as i32),
            PropertyType::Float => PropertyValue::Float(record.read_f32(offset)?),
            PropertyType::String => {
                PropertyValue::String(record.string(offset).unwrap_or_default().to_string())
            }
            PropertyType::Vector => PropertyValue::Vector(Vec3::new(
                record.read_f32(offset)?,
                record.read_f32(offset + 4)?,
                record.read_f32(offset + 8)?,
            )),
            PropertyType::Color => PropertyValue::Color(Vec4::new(
                record.read_f32(offset)?,
                record.read_f32(offset + 4)?,
                record.read_f32(offset + 8)?,
                record.read_f32(offset + 12)?,
            )),
            PropertyType::Enum | PropertyType::Choice => PropertyValue::Enum(record.read_u32(offset)?),
            PropertyType::Flags => PropertyValue::Flags(record.read_u32(offset)?),
            PropertyType::Asset => PropertyValue::Asset(record.read_u64(offset)?),
            PropertyType::Sound => PropertyValue::Sound(record.read_u32(offset)?),
            PropertyType::Animation => PropertyValue::Animation(record.read_u32(offset)?),
            PropertyType::Spline | PropertyType::Guid => {
                PropertyValue::Bytes(record.blob(offset).unwrap_or_default().to_vec())
            }
            PropertyType::Pointer | PropertyType::Struct | PropertyType::Array => return None,
        };

        Some(value)
    }

    /// Write a value for the node into `data`.
    pub fn set_value(&self, id: PropertyId, data: &mut PropertyData, value: PropertyValue) -> Result<()> {
        let node = self.node(id);
        let ty = node.property_type();
        if !value.fits(ty) {
            return Err(Error::ValueTypeMismatch {
                expected: ty,
                found: value.kind_name(),
            });
        }

        let offset = node.offset;
        let record = self.value_location_mut(id, data);

        let written = match value {
            PropertyValue::Bool(v) => record.write_u8(offset, v as u8),
            PropertyValue::Byte(v) => record.write_u8(offset, v as u8),
            PropertyValue::Short(v) => record.write_u16(offset, v as u16),
            PropertyValue::Int(v) => record.write_u32(offset, v as u32),
            PropertyValue::Float(v) => record.write_f32(offset, v),
            PropertyValue::Vector(v) => v
                .to_array()
                .iter()
                .enumerate()
                .all(|(i, c)| record.write_f32(offset + 4 * i as u32, *c)),
            PropertyValue::Color(v) => v
                .to_array()
                .iter()
                .enumerate()
                .all(|(i, c)| record.write_f32(offset + 4 * i as u32, *c)),
            PropertyValue::Enum(v)
            | PropertyValue::Flags(v)
            | PropertyValue::Sound(v)
            | PropertyValue::Animation(v) => record.write_u32(offset, v),
            PropertyValue::Asset(v) => record.write_u64(offset, v),
            PropertyValue::String(v) => {
                record.set_string(offset, v);
                true
            }
            PropertyValue::Bytes(v) => {
                record.set_blob(offset, v);
                true
            }
        };

        if written {
            Ok(())
        } else {
            Err(Error::MissingStorage(node.id))
        }
    }

    /// Build a record for an initialized root with every default written.
    ///
    /// Pointers start out null and arrays empty.
    pub fn initialize_data(&self, root: PropertyId) -> Result<PropertyData> {
        let size = self.node(root).offset + self.data_size(root);
        let mut data = PropertyData::new(size);
        self.write_defaults_into(root, &mut data)?;
        Ok(data)
    }

    fn write_defaults_into(&self, id: PropertyId, record: &mut PropertyData) -> Result<()> {
        let node = self.node(id);

        match node.kind {
            PropertyKind::Struct => {
                for child in self.children(id) {
                    if !self.node(child).is_intrinsic() {
                        self.write_defaults_into(child, record)?;
                    }
                }
            }
            PropertyKind::Array => {
                record.array_mut(node.offset).clear();
            }
            PropertyKind::Pointer => {
                record.take_object(node.offset);
            }
            _ => {
                if let Some(value) = node.default_value.clone() {
                    self.set_value(id, record, value)?;
                }
            }
        }

        Ok(())
    }

    /// Number of elements in the array at `array`.
    pub fn array_len(&self, array: PropertyId, data: &PropertyData) -> usize {
        self.value_location(array, data)
            .and_then(|record| record.array(self.node(array).offset))
            .map_or(0, <[PropertyData]>::len)
    }

    /// Element record `index` of the array at `array`.
    pub fn array_element<'a>(
        &self,
        array: PropertyId,
        data: &'a PropertyData,
        index: usize,
    ) -> Option<&'a PropertyData> {
        self.value_location(array, data)?
            .array(self.node(array).offset)?
            .get(index)
    }

    /// Resize the array at `array`. New elements hold the item archetype's
    /// defaults.
    pub fn resize_array(&self, array: PropertyId, data: &mut PropertyData, len: usize) -> Result<()> {
        let Some(item) = self.item_archetype(array) else {
            return Err(Error::MissingStorage(self.node(array).id));
        };

        let mut template = PropertyData::new(self.data_size(item));
        self.write_defaults_into(item, &mut template)?;

        let offset = self.node(array).offset;
        let elements = self.value_location_mut(array, data).array_mut(offset);
        elements.resize(len, template);
        Ok(())
    }

    /// Whether the value in `data` equals the node's default.
    ///
    /// Structs match when every child matches, pointers when null and
    /// arrays when empty.
    pub fn matches_default(&self, id: PropertyId, data: &PropertyData) -> bool {
        let node = self.node(id);

        match node.kind {
            PropertyKind::Struct => self
                .children(id)
                .filter(|&c| !self.node(c).is_intrinsic())
                .all(|c| self.matches_default(c, data)),
            PropertyKind::Pointer => self
                .value_location(id, data)
                .map_or(true, |record| record.object(node.offset).is_none()),
            PropertyKind::Array => self.array_len(id, data) == 0,
            _ => self.value(id, data).as_ref() == node.default_value.as_ref(),
        }
    }

    /// Whether the property is written to cooked data.
    ///
    /// Before DKC Returns every property with the default preference is
    /// cooked. From then on properties still holding their default are left
    /// out.
    pub fn should_cook(&self, id: PropertyId, data: &PropertyData) -> bool {
        let node = self.node(id);

        match node.cook_preference {
            CookPreference::Always => true,
            CookPreference::Never => false,
            CookPreference::Default if node.game < Game::DEFAULT_ELISION => true,
            CookPreference::Default => match node.kind {
                PropertyKind::Struct => self
                    .children(id)
                    .filter(|&c| !self.node(c).is_intrinsic())
                    .any(|c| self.should_cook(c, data)),
                _ => !self.matches_default(id, data),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyNameMap;

    fn build(game: Game) -> (PropertyArena, PropertyId, Vec<PropertyId>) {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = arena.create(PropertyType::Struct, game);

        let mut children = Vec::new();
        for (i, ty) in [
            PropertyType::Int,
            PropertyType::Float,
            PropertyType::String,
            PropertyType::Vector,
            PropertyType::Bool,
        ]
        .into_iter()
        .enumerate()
        {
            let child = arena.create_child(root, ty);
            arena.node_mut(child).set_id(0x10 + i as u32);
            children.push(child);
        }

        arena
            .node_mut(children[0])
            .set_default_value(PropertyValue::Int(100))
            .unwrap();
        arena.initialize(root, None, 0, &mut names).unwrap();
        (arena, root, children)
    }

    #[test]
    fn test_initialize_data_writes_defaults() {
        let (arena, root, children) = build(Game::Echoes);
        let data = arena.initialize_data(root).unwrap();

        assert_eq!(data.len(), arena.data_size(root) as usize);
        assert_eq!(arena.value(children[0], &data), Some(PropertyValue::Int(100)));
        assert_eq!(arena.value(children[1], &data), Some(PropertyValue::Float(0.0)));
        assert_eq!(arena.value(children[2], &data), Some(PropertyValue::String(String::new())));
        assert_eq!(arena.value(root, &data), None);
        assert!(arena.matches_default(root, &data));
    }

    #[test]
    fn test_set_and_get_values() {
        let (arena, root, children) = build(Game::Echoes);
        let mut data = arena.initialize_data(root).unwrap();

        let position = Vec3::new(1.0, -2.0, 3.5);
        arena.set_value(children[3], &mut data, PropertyValue::Vector(position)).unwrap();
        arena
            .set_value(children[2], &mut data, PropertyValue::String("Door".into()))
            .unwrap();

        assert_eq!(arena.value(children[3], &data), Some(PropertyValue::Vector(position)));
        assert_eq!(arena.value(children[2], &data), Some(PropertyValue::String("Door".into())));

        // Intrinsic components alias the vector's storage.
        let y = arena.children(children[3]).nth(1).unwrap();
        assert_eq!(arena.value(y, &data), Some(PropertyValue::Float(-2.0)));

        assert!(matches!(
            arena.set_value(children[0], &mut data, PropertyValue::Bool(true)),
            Err(Error::ValueTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_pointer_indirection() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = arena.create(PropertyType::Struct, Game::DkcReturns);
        let before = arena.create_child(root, PropertyType::Int);
        arena.node_mut(before).set_id(0x01);
        let pointer = arena.create_child(root, PropertyType::Pointer);
        arena.node_mut(pointer).set_id(0x02);
        let inner = arena.create_child(pointer, PropertyType::Float);
        arena.node_mut(inner).set_id(0x03);
        arena.initialize(root, None, 0, &mut names).unwrap();

        let mut data = arena.initialize_data(root).unwrap();
        assert_eq!(arena.value(inner, &data), None);
        assert!(!arena.should_cook(pointer, &data));

        arena.set_value(inner, &mut data, PropertyValue::Float(9.0)).unwrap();
        assert_eq!(arena.node(inner).offset(), 0);
        assert_eq!(arena.value(inner, &data), Some(PropertyValue::Float(9.0)));
        assert_eq!(data.object(4).map(PropertyData::len), Some(4));
        assert!(arena.should_cook(pointer, &data));
    }

    #[test]
    fn test_array_elements() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let root = arena.create(PropertyType::Struct, Game::Corruption);
        let array = arena.create_child(root, PropertyType::Array);
        arena.node_mut(array).set_id(0x20);
        let item = arena.create_child(array, PropertyType::Short);
        arena.node_mut(item).set_default_value(PropertyValue::Short(7)).unwrap();
        arena.initialize(root, None, 0, &mut names).unwrap();

        let mut data = arena.initialize_data(root).unwrap();
        assert_eq!(arena.array_len(array, &data), 0);

        arena.resize_array(array, &mut data, 3).unwrap();
        assert_eq!(arena.array_len(array, &data), 3);

        let element = arena.array_element(array, &data, 2).unwrap();
        assert_eq!(arena.value(item, element), Some(PropertyValue::Short(7)));
    }

    #[test]
    fn test_cook_preferences() {
        let (mut arena, root, children) = build(Game::DkcReturns);
        let mut data = arena.initialize_data(root).unwrap();

        assert!(!arena.should_cook(children[0], &data));
        assert!(!arena.should_cook(root, &data));

        arena.set_value(children[0], &mut data, PropertyValue::Int(5)).unwrap();
        assert!(arena.should_cook(children[0], &data));
        assert!(arena.should_cook(root, &data));

        arena.node_mut(children[1]).set_cook_preference(CookPreference::Always);
        assert!(arena.should_cook(children[1], &data));
        arena.node_mut(children[0]).set_cook_preference(CookPreference::Never);
        assert!(!arena.should_cook(children[0], &data));

        let (arena, root, children) = build(Game::Corruption);
        let data = arena.initialize_data(root).unwrap();
        assert!(arena.should_cook(children[0], &data));
    }
}
