//! Property nodes.
//!
//! A template is a tree of typed properties. Every node lives in a
//! [`PropertyArena`] and is addressed through a [`PropertyId`] handle; the
//! arena holds the tree structure, the archetype links between clones and
//! their sources, and the operations that maintain both.

mod access;
mod arena;
mod enums;
mod id_string;
mod kinds;
mod serialize;
mod summary;

use std::sync::Arc;

use reliquary_common::{Game, INVALID_ID};

pub use arena::{PropertyArena, PropertyId};
pub use enums::{EnumNaming, EnumProperty, EnumValue};
pub use id_string::{format_id_string, parse_id_string};
pub use kinds::{AssetProperty, FlagDefinition, FlagsProperty, PropertyKind};
pub use serialize::{ArchetypeResolver, NoArchetypes};
pub use summary::PropertySummary;

use crate::{CookPreference, Error, PropertyFlags, PropertyType, PropertyValue, Result};

/// The script template a property tree belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    /// Object type ID of the template.
    pub object_id: u32,
    /// Template file the tree was loaded from.
    pub source_file: Arc<str>,
}

impl TemplateRef {
    pub fn new(object_id: u32, source_file: impl Into<Arc<str>>) -> Self {
        Self {
            object_id,
            source_file: source_file.into(),
        }
    }
}

/// One property in a template tree.
#[derive(Debug, Clone)]
pub struct PropertyNode {
    pub(crate) kind: PropertyKind,
    pub(crate) game: Game,
    pub(crate) id: u32,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) suffix: String,
    pub(crate) offset: u32,
    pub(crate) min_version: f32,
    pub(crate) max_version: f32,
    pub(crate) cook_preference: CookPreference,
    pub(crate) flags: PropertyFlags,
    pub(crate) archetype: Option<PropertyId>,
    pub(crate) sub_instances: Vec<PropertyId>,
    pub(crate) pointer_parent: Option<PropertyId>,
    pub(crate) template: Option<TemplateRef>,
    pub(crate) source_file: Option<Arc<str>>,
    pub(crate) default_value: Option<PropertyValue>,
}

impl PropertyNode {
    pub(crate) fn new(ty: PropertyType, game: Game) -> Self {
        Self {
            kind: PropertyKind::new(ty),
            game,
            id: INVALID_ID,
            name: String::new(),
            description: String::new(),
            suffix: String::new(),
            offset: 0,
            min_version: 0.0,
            max_version: f32::MAX,
            cook_preference: CookPreference::Default,
            flags: PropertyFlags::empty(),
            archetype: None,
            sub_instances: Vec::new(),
            pointer_parent: None,
            template: None,
            source_file: None,
            default_value: PropertyValue::initial(ty),
        }
    }

    #[inline]
    pub fn property_type(&self) -> PropertyType {
        self.kind.property_type()
    }

    #[inline]
    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    #[inline]
    pub fn game(&self) -> Game {
        self.game
    }

    /// Property ID, or [`INVALID_ID`] for roots and array items.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Byte offset of the value within its record.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn min_version(&self) -> f32 {
        self.min_version
    }

    #[inline]
    pub fn max_version(&self) -> f32 {
        self.max_version
    }

    #[inline]
    pub fn cook_preference(&self) -> CookPreference {
        self.cook_preference
    }

    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// The property this one was cloned from.
    #[inline]
    pub fn archetype(&self) -> Option<PropertyId> {
        self.archetype
    }

    /// Live clones of this property.
    #[inline]
    pub fn sub_instances(&self) -> &[PropertyId] {
        &self.sub_instances
    }

    /// Nearest ancestor whose children live in a separate record.
    #[inline]
    pub fn pointer_parent(&self) -> Option<PropertyId> {
        self.pointer_parent
    }

    #[inline]
    pub fn template(&self) -> Option<&TemplateRef> {
        self.template.as_ref()
    }

    #[inline]
    pub fn default_value(&self) -> Option<&PropertyValue> {
        self.default_value.as_ref()
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.flags.contains(PropertyFlags::INITIALIZED)
    }

    #[inline]
    pub fn is_intrinsic(&self) -> bool {
        self.flags.contains(PropertyFlags::INTRINSIC)
    }

    #[inline]
    pub fn is_atomic(&self) -> bool {
        self.flags.contains(PropertyFlags::ATOMIC)
    }

    #[inline]
    pub fn is_archetype(&self) -> bool {
        self.flags.contains(PropertyFlags::ARCHETYPE)
    }

    #[inline]
    pub fn is_array_archetype(&self) -> bool {
        self.flags.contains(PropertyFlags::ARRAY_ARCHETYPE)
    }

    #[inline]
    pub fn is_pointer_type(&self) -> bool {
        self.property_type().is_pointer_type()
    }

    /// View as an enumeration. Succeeds for both `Enum` and `Choice`.
    pub fn as_enum(&self) -> Option<&EnumProperty> {
        match &self.kind {
            PropertyKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// View as an enumeration. Succeeds for both `Enum` and `Choice`.
    pub fn as_choice(&self) -> Option<&EnumProperty> {
        self.as_enum()
    }

    pub fn as_enum_mut(&mut self) -> Option<&mut EnumProperty> {
        match &mut self.kind {
            PropertyKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_flags(&self) -> Option<&FlagsProperty> {
        match &self.kind {
            PropertyKind::Flags(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_flags_mut(&mut self) -> Option<&mut FlagsProperty> {
        match &mut self.kind {
            PropertyKind::Flags(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetProperty> {
        match &self.kind {
            PropertyKind::Asset(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_asset_mut(&mut self) -> Option<&mut AssetProperty> {
        match &mut self.kind {
            PropertyKind::Asset(a) => Some(a),
            _ => None,
        }
    }

    /// Set the display name, invalidating the cached name check.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.flags.remove(PropertyFlags::HAS_CACHED_NAME_CHECK);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.suffix = suffix.into();
    }

    /// Set the property ID. Only meaningful before initialization.
    pub fn set_id(&mut self, id: u32) {
        self.id = id;
        self.flags.remove(PropertyFlags::HAS_CACHED_NAME_CHECK);
    }

    pub fn set_cook_preference(&mut self, preference: CookPreference) {
        self.cook_preference = preference;
    }

    pub fn set_version_range(&mut self, min: f32, max: f32) {
        self.min_version = min;
        self.max_version = max;
    }

    pub fn set_atomic(&mut self, atomic: bool) {
        self.flags.set(PropertyFlags::ATOMIC, atomic);
    }

    /// Add flags to the property.
    pub fn set_flags(&mut self, flags: PropertyFlags) {
        self.flags |= flags;
    }

    pub fn mark_dirty(&mut self) {
        self.flags |= PropertyFlags::DIRTY;
    }

    /// Set the default value, checking that it fits the property type.
    pub fn set_default_value(&mut self, value: PropertyValue) -> Result<()> {
        let ty = self.property_type();
        if !value.fits(ty) {
            return Err(Error::ValueTypeMismatch {
                expected: ty,
                found: value.kind_name(),
            });
        }
        self.default_value = Some(value);
        Ok(())
    }

    /// Whether the property exists in game data of this version.
    pub fn is_in_version(&self, version: f32) -> bool {
        version >= self.min_version && version <= self.max_version
    }
}

/// Round `value` up to a multiple of `alignment`.
#[inline]
pub(crate) fn align(value: u32, alignment: u32) -> u32 {
    if alignment <= 1 {
        value
    } else {
        value.div_ceil(alignment) * alignment
    }
}
