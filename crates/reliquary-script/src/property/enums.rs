//! Enum and choice properties.
//!
//! Game data has two enumeration types: enums store the hash of the
//! enumerator name and choices store its index. Both are a 32-bit value with
//! an ordered list of named enumerators, so they share one implementation and
//! differ only in the type name mixed into their property ID hash.

use reliquary_archive::{Archive, SerialFlags};

use crate::{PropertyData, PropertyType, Result};

/// How an enumeration property identifies its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumNaming {
    /// Values are name hashes (`Enum`).
    Hashed,
    /// Values are indices (`Choice`).
    Indexed,
}

impl EnumNaming {
    /// Property type presented for this naming scheme.
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Hashed => PropertyType::Enum,
            Self::Indexed => PropertyType::Choice,
        }
    }

    /// Hashable type name used when no archetype or override applies.
    pub fn default_type_name(&self) -> &'static str {
        match self {
            Self::Hashed => "enum",
            Self::Indexed => "choice",
        }
    }
}

/// One enumerator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub id: u32,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    pub(crate) fn serialize<A: Archive>(&mut self, arc: &mut A) -> Result<()> {
        arc.required("Name", &mut self.name, SerialFlags::ATTRIBUTE)?;
        arc.required("ID", &mut self.id, SerialFlags::ATTRIBUTE | SerialFlags::HEX_DISPLAY)?;
        Ok(())
    }
}

/// Payload of `Enum` and `Choice` properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumProperty {
    naming: EnumNaming,
    values: Vec<EnumValue>,
    override_type_name: bool,
}

impl EnumProperty {
    pub fn new(naming: EnumNaming) -> Self {
        Self {
            naming,
            values: Vec::new(),
            override_type_name: false,
        }
    }

    #[inline]
    pub fn naming(&self) -> EnumNaming {
        self.naming
    }

    pub fn add_value(&mut self, name: impl Into<String>, id: u32) {
        self.values.push(EnumValue::new(name, id));
    }

    #[inline]
    pub fn num_possible_values(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<EnumValue> {
        &mut self.values
    }

    /// Index of the enumerator with this ID.
    pub fn value_index(&self, id: u32) -> Option<usize> {
        self.values.iter().position(|v| v.id == id)
    }

    /// ID of the enumerator at `index`.
    pub fn value_id(&self, index: usize) -> Option<u32> {
        self.values.get(index).map(|v| v.id)
    }

    /// Name of the enumerator at `index`.
    pub fn value_name(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|v| v.name.as_str())
    }

    /// Whether `value` names one of the enumerators.
    ///
    /// A property without enumerators accepts any value.
    pub fn is_valid_value(&self, value: u32) -> bool {
        self.values.is_empty() || self.value_index(value).is_some()
    }

    /// Whether the value stored at `offset` of `data` names an enumerator.
    pub fn has_valid_value(&self, data: &PropertyData, offset: u32) -> bool {
        data.read_u32(offset)
            .is_some_and(|value| self.is_valid_value(value))
    }

    /// The override flag stored on this payload. Use
    /// [`crate::PropertyArena::overrides_type_name`] to follow the archetype.
    #[inline]
    pub fn override_type_name(&self) -> bool {
        self.override_type_name
    }

    pub(crate) fn set_override_flag(&mut self, value: bool) {
        self.override_type_name = value;
    }

    /// Copy enumerators from an archetype payload.
    pub(crate) fn copy_from(&mut self, archetype: &EnumProperty) {
        self.values = archetype.values.clone();
    }
}
