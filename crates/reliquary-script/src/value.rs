//! Typed property values.

use std::fmt;

use glam::{Vec3, Vec4};
use reliquary_common::INVALID_ID;

use crate::PropertyType;

/// A property value read from or written to property data.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Float(f32),
    String(String),
    Vector(Vec3),
    Color(Vec4),
    /// Enum hash or choice index.
    Enum(u32),
    Flags(u32),
    Asset(u64),
    Sound(u32),
    Animation(u32),
    /// Opaque spline or GUID bytes.
    Bytes(Vec<u8>),
}

impl PropertyValue {
    /// Initial default value for a freshly created property, or `None` for
    /// types that carry no default (aggregates and indirections).
    pub fn initial(ty: PropertyType) -> Option<Self> {
        let value = match ty {
            PropertyType::Bool => Self::Bool(false),
            PropertyType::Byte => Self::Byte(0),
            PropertyType::Short => Self::Short(0),
            PropertyType::Int => Self::Int(0),
            PropertyType::Float => Self::Float(0.0),
            PropertyType::String => Self::String(String::new()),
            PropertyType::Vector => Self::Vector(Vec3::ZERO),
            PropertyType::Color => Self::Color(Vec4::ZERO),
            PropertyType::Enum | PropertyType::Choice => Self::Enum(0),
            PropertyType::Flags => Self::Flags(0),
            PropertyType::Asset => Self::Asset(u64::MAX),
            PropertyType::Sound => Self::Sound(INVALID_ID),
            PropertyType::Animation => Self::Animation(INVALID_ID),
            PropertyType::Spline | PropertyType::Guid => Self::Bytes(Vec::new()),
            PropertyType::Pointer | PropertyType::Struct | PropertyType::Array => return None,
        };
        Some(value)
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Vector(_) => "vector",
            Self::Color(_) => "color",
            Self::Enum(_) => "enum",
            Self::Flags(_) => "flags",
            Self::Asset(_) => "asset",
            Self::Sound(_) => "sound",
            Self::Animation(_) => "animation",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Whether this value can be stored in a property of type `ty`.
    pub fn fits(&self, ty: PropertyType) -> bool {
        matches!(
            (self, ty),
            (Self::Bool(_), PropertyType::Bool)
                | (Self::Byte(_), PropertyType::Byte)
                | (Self::Short(_), PropertyType::Short)
                | (Self::Int(_), PropertyType::Int)
                | (Self::Float(_), PropertyType::Float)
                | (Self::String(_), PropertyType::String)
                | (Self::Vector(_), PropertyType::Vector)
                | (Self::Color(_), PropertyType::Color)
                | (Self::Enum(_), PropertyType::Enum | PropertyType::Choice)
                | (Self::Flags(_), PropertyType::Flags)
                | (Self::Asset(_), PropertyType::Asset)
                | (Self::Sound(_), PropertyType::Sound)
                | (Self::Animation(_), PropertyType::Animation)
                | (Self::Bytes(_), PropertyType::Spline | PropertyType::Guid)
        )
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Short(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Vector(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Self::Color(v) => write!(f, "({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Self::Enum(v) | Self::Flags(v) | Self::Sound(v) | Self::Animation(v) => {
                write!(f, "0x{:08X}", v)
            }
            Self::Asset(v) => write!(f, "0x{:016X}", v),
            Self::Bytes(v) => write!(f, "[{} bytes]", v.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values_fit_their_type() {
        for ty in PropertyType::ALL {
            if let Some(value) = PropertyValue::initial(ty) {
                assert!(value.fits(ty), "{} does not fit {}", value.kind_name(), ty);
            }
        }
        assert!(PropertyValue::initial(PropertyType::Struct).is_none());
    }

    #[test]
    fn test_enum_value_fits_choice() {
        assert!(PropertyValue::Enum(3).fits(PropertyType::Choice));
        assert!(!PropertyValue::Int(3).fits(PropertyType::Choice));
    }

    #[test]
    fn test_display() {
        assert_eq!(PropertyValue::Enum(0x41).to_string(), "0x00000041");
        assert_eq!(PropertyValue::Vector(Vec3::new(1.0, 2.0, 3.0)).to_string(), "(1, 2, 3)");
    }
}
