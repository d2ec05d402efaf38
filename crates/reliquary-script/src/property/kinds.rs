//! Type-specific property payloads.

use reliquary_archive::{Archive, SerialFlags};

use super::{EnumNaming, EnumProperty};
use crate::{PropertyType, Result};

/// One named bit mask of a flags property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagDefinition {
    pub name: String,
    pub mask: u32,
}

impl FlagDefinition {
    pub fn new(name: impl Into<String>, mask: u32) -> Self {
        Self {
            name: name.into(),
            mask,
        }
    }

    pub(crate) fn serialize<A: Archive>(&mut self, arc: &mut A) -> Result<()> {
        arc.required("Name", &mut self.name, SerialFlags::ATTRIBUTE)?;
        arc.required("Mask", &mut self.mask, SerialFlags::ATTRIBUTE | SerialFlags::HEX_DISPLAY)?;
        Ok(())
    }
}

/// Payload of `Flags` properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagsProperty {
    pub flags: Vec<FlagDefinition>,
}

impl FlagsProperty {
    pub fn add_flag(&mut self, name: impl Into<String>, mask: u32) {
        self.flags.push(FlagDefinition::new(name, mask));
    }

    /// Union of every defined mask.
    pub fn all_flags(&self) -> u32 {
        self.flags.iter().fold(0, |acc, f| acc | f.mask)
    }

    /// Bits set in `value` that no flag defines.
    pub fn undefined_bits(&self, value: u32) -> u32 {
        value & !self.all_flags()
    }
}

/// Payload of `Asset` properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetProperty {
    /// Accepted resource extensions, e.g. `CMDL`.
    pub type_filter: Vec<String>,
}

impl AssetProperty {
    /// Whether a resource with this extension may be assigned.
    pub fn accepts(&self, extension: &str) -> bool {
        self.type_filter.is_empty()
            || self
                .type_filter
                .iter()
                .any(|t| t.eq_ignore_ascii_case(extension))
    }

    pub(crate) fn filter_text(&self) -> String {
        self.type_filter.join(",")
    }

    pub(crate) fn set_filter_text(&mut self, text: &str) {
        self.type_filter = text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }
}

/// Type tag plus type-specific payload of a property node.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Bool,
    Byte,
    Short,
    Int,
    Float,
    String,
    Vector,
    Color,
    /// `Enum` or `Choice`, depending on the naming scheme.
    Enum(EnumProperty),
    Flags(FlagsProperty),
    Asset(AssetProperty),
    Sound,
    Animation,
    Spline,
    Guid,
    Pointer,
    Struct,
    /// The single child is the item archetype.
    Array,
}

impl PropertyKind {
    /// Empty payload for a property type.
    pub fn new(ty: PropertyType) -> Self {
        match ty {
            PropertyType::Bool => Self::Bool,
            PropertyType::Byte => Self::Byte,
            PropertyType::Short => Self::Short,
            PropertyType::Int => Self::Int,
            PropertyType::Float => Self::Float,
            PropertyType::String => Self::String,
            PropertyType::Vector => Self::Vector,
            PropertyType::Color => Self::Color,
            PropertyType::Enum => Self::Enum(EnumProperty::new(EnumNaming::Hashed)),
            PropertyType::Choice => Self::Enum(EnumProperty::new(EnumNaming::Indexed)),
            PropertyType::Flags => Self::Flags(FlagsProperty::default()),
            PropertyType::Asset => Self::Asset(AssetProperty::default()),
            PropertyType::Sound => Self::Sound,
            PropertyType::Animation => Self::Animation,
            PropertyType::Spline => Self::Spline,
            PropertyType::Guid => Self::Guid,
            PropertyType::Pointer => Self::Pointer,
            PropertyType::Struct => Self::Struct,
            PropertyType::Array => Self::Array,
        }
    }

    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Bool => PropertyType::Bool,
            Self::Byte => PropertyType::Byte,
            Self::Short => PropertyType::Short,
            Self::Int => PropertyType::Int,
            Self::Float => PropertyType::Float,
            Self::String => PropertyType::String,
            Self::Vector => PropertyType::Vector,
            Self::Color => PropertyType::Color,
            Self::Enum(e) => e.naming().property_type(),
            Self::Flags(_) => PropertyType::Flags,
            Self::Asset(_) => PropertyType::Asset,
            Self::Sound => PropertyType::Sound,
            Self::Animation => PropertyType::Animation,
            Self::Spline => PropertyType::Spline,
            Self::Guid => PropertyType::Guid,
            Self::Pointer => PropertyType::Pointer,
            Self::Struct => PropertyType::Struct,
            Self::Array => PropertyType::Array,
        }
    }

    /// Whether the archetype-owned part of two payloads is equal.
    pub(crate) fn same_payload(&self, other: &PropertyKind) -> bool {
        match (self, other) {
            (Self::Enum(a), Self::Enum(b)) => a.values() == b.values(),
            (Self::Flags(a), Self::Flags(b)) => a.flags == b.flags,
            (Self::Asset(a), Self::Asset(b)) => a.type_filter == b.type_filter,
            (a, b) => a.property_type() == b.property_type(),
        }
    }

    /// Copy the archetype-owned part of another payload of the same type.
    pub(crate) fn copy_from(&mut self, other: &PropertyKind) {
        match (self, other) {
            (Self::Enum(mine), Self::Enum(theirs)) => mine.copy_from(theirs),
            (Self::Flags(mine), Self::Flags(theirs)) => mine.flags = theirs.flags.clone(),
            (Self::Asset(mine), Self::Asset(theirs)) => {
                mine.type_filter = theirs.type_filter.clone()
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_type() {
        for ty in PropertyType::ALL {
            assert_eq!(PropertyKind::new(ty).property_type(), ty);
        }
    }

    #[test]
    fn test_flags() {
        let mut flags = FlagsProperty::default();
        flags.add_flag("Solid", 0x1);
        flags.add_flag("Visible", 0x4);
        assert_eq!(flags.all_flags(), 0x5);
        assert_eq!(flags.undefined_bits(0xF), 0xA);
    }

    #[test]
    fn test_asset_filter() {
        let mut asset = AssetProperty::default();
        assert!(asset.accepts("TXTR"));

        asset.set_filter_text("CMDL, ANCS");
        assert_eq!(asset.type_filter, ["CMDL", "ANCS"]);
        assert!(asset.accepts("ancs"));
        assert!(!asset.accepts("TXTR"));
        assert_eq!(asset.filter_text(), "CMDL,ANCS");
    }
}
