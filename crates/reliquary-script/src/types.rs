//! Property type tags and cook preferences.

use std::fmt;
use std::str::FromStr;

use reliquary_archive::{ArchiveValue, SerialFlags};

use crate::Error;

/// The closed set of property types a template can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum PropertyType {
    Bool,
    /// Signed 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int,
    Float,
    String,
    /// Three floats.
    Vector,
    /// Four floats (RGBA).
    Color,
    /// Value stored as the hash of the enumerator name.
    Enum,
    /// Value stored as the enumerator index.
    Choice,
    /// Bit set with named masks.
    Flags,
    /// Asset ID of a resource file.
    Asset,
    Sound,
    Animation,
    Spline,
    Guid,
    /// Indirection to a separately stored record.
    Pointer,
    Struct,
    Array,
}

impl PropertyType {
    /// All property types in declaration order.
    pub const ALL: [PropertyType; 19] = [
        Self::Bool,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Float,
        Self::String,
        Self::Vector,
        Self::Color,
        Self::Enum,
        Self::Choice,
        Self::Flags,
        Self::Asset,
        Self::Sound,
        Self::Animation,
        Self::Spline,
        Self::Guid,
        Self::Pointer,
        Self::Struct,
        Self::Array,
    ];

    /// Name used for the `Type` attribute in template files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Vector => "Vector",
            Self::Color => "Color",
            Self::Enum => "Enum",
            Self::Choice => "Choice",
            Self::Flags => "Flags",
            Self::Asset => "Asset",
            Self::Sound => "Sound",
            Self::Animation => "Animation",
            Self::Spline => "Spline",
            Self::Guid => "Guid",
            Self::Pointer => "Pointer",
            Self::Struct => "Struct",
            Self::Array => "Array",
        }
    }

    /// Type name mixed into the property ID hash.
    ///
    /// Enums, choices and structs can replace this per property; see
    /// [`crate::PropertyArena::hashable_type_name`].
    pub fn hashable_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Vector => "Vector",
            Self::Color => "Color",
            Self::Enum => "enum",
            Self::Choice => "choice",
            Self::Flags => "Flags",
            Self::Asset => "asset",
            Self::Sound => "sound",
            Self::Animation => "animation",
            Self::Spline => "spline",
            Self::Guid => "guid",
            Self::Pointer => "pointer",
            Self::Struct => "struct",
            Self::Array => "array",
        }
    }

    /// Size of the value in a property record, or `None` for structs,
    /// whose size depends on their children.
    pub fn fixed_size(&self) -> Option<u32> {
        match self {
            Self::Bool | Self::Byte => Some(1),
            Self::Short => Some(2),
            Self::Int
            | Self::Float
            | Self::Enum
            | Self::Choice
            | Self::Flags
            | Self::Sound
            | Self::Animation => Some(4),
            // Slot holding a handle into the record's side table.
            Self::String | Self::Spline | Self::Guid | Self::Pointer | Self::Array => Some(4),
            Self::Vector => Some(12),
            Self::Color => Some(16),
            Self::Asset => Some(8),
            Self::Struct => None,
        }
    }

    /// Alignment of the value in a property record, or `None` for structs.
    pub fn fixed_alignment(&self) -> Option<u32> {
        match self {
            Self::Bool | Self::Byte => Some(1),
            Self::Short => Some(2),
            Self::Asset => Some(8),
            Self::Struct => None,
            _ => Some(4),
        }
    }

    /// Whether children of this type live in a separate record.
    #[inline]
    pub fn is_pointer_type(&self) -> bool {
        matches!(self, Self::Pointer | Self::Array)
    }

    /// Whether this is one of the two enumeration types.
    #[inline]
    pub fn is_enum_like(&self) -> bool {
        matches!(self, Self::Enum | Self::Choice)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownPropertyType(s.to_string()))
    }
}

impl ArchiveValue for PropertyType {
    fn to_archive_string(&self, _flags: SerialFlags) -> String {
        self.as_str().to_string()
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        text.parse().ok()
    }
}

/// Whether a property is written when cooking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum CookPreference {
    /// Cook unless the value can be elided for the game.
    #[default]
    Default,
    Always,
    Never,
}

impl CookPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Always => "Always",
            Self::Never => "Never",
        }
    }
}

impl ArchiveValue for CookPreference {
    fn to_archive_string(&self, _flags: SerialFlags) -> String {
        self.as_str().to_string()
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        match text.trim() {
            "Default" => Some(Self::Default),
            "Always" => Some(Self::Always),
            "Never" => Some(Self::Never),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_round_trip() {
        for ty in PropertyType::ALL {
            assert_eq!(ty.as_str().parse::<PropertyType>().unwrap(), ty);
        }
        assert_eq!("choice".parse::<PropertyType>().unwrap(), PropertyType::Choice);
        assert!(matches!(
            "Quaternion".parse::<PropertyType>(),
            Err(Error::UnknownPropertyType(_))
        ));
    }

    #[test]
    fn test_sizes() {
        assert_eq!(PropertyType::Vector.fixed_size(), Some(12));
        assert_eq!(PropertyType::Color.fixed_size(), Some(16));
        assert_eq!(PropertyType::Asset.fixed_alignment(), Some(8));
        assert_eq!(PropertyType::Short.fixed_alignment(), Some(2));
        assert_eq!(PropertyType::Struct.fixed_size(), None);
    }

    #[test]
    fn test_cook_preference_text() {
        let text = CookPreference::Never.to_archive_string(SerialFlags::empty());
        assert_eq!(
            CookPreference::from_archive_str(&text, SerialFlags::empty()),
            Some(CookPreference::Never)
        );
        assert_eq!(CookPreference::from_archive_str("Sometimes", SerialFlags::empty()), None);
    }
}
