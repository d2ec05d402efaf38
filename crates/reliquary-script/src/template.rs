//! Script object templates.

use std::fmt;
use std::sync::Arc;

use reliquary_archive::{Archive, ArchiveValue, SerialFlags};
use reliquary_common::{FourCC, Game};

use crate::property::{ArchetypeResolver, TemplateRef};
use crate::{PropertyArena, PropertyId, PropertyNameMap, Result};

/// How an object's rotation is exposed in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationType {
    #[default]
    Enabled,
    Disabled,
}

/// How an object's scale is exposed in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleType {
    #[default]
    Enabled,
    Disabled,
    /// Scale is taken from the object's volume.
    Volume,
}

impl ArchiveValue for RotationType {
    fn to_archive_string(&self, _flags: SerialFlags) -> String {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
        .to_string()
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        match text.trim() {
            "Enabled" => Some(Self::Enabled),
            "Disabled" => Some(Self::Disabled),
            _ => None,
        }
    }
}

impl ArchiveValue for ScaleType {
    fn to_archive_string(&self, _flags: SerialFlags) -> String {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
            Self::Volume => "Volume",
        }
        .to_string()
    }

    fn from_archive_str(text: &str, _flags: SerialFlags) -> Option<Self> {
        match text.trim() {
            "Enabled" => Some(Self::Enabled),
            "Disabled" => Some(Self::Disabled),
            "Volume" => Some(Self::Volume),
            _ => None,
        }
    }
}

/// Properties the editor binds to dedicated controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorProperty {
    InstanceName,
    Position,
    Rotation,
    Scale,
    Active,
    LightParameters,
}

impl EditorProperty {
    pub const ALL: [EditorProperty; 6] = [
        Self::InstanceName,
        Self::Position,
        Self::Rotation,
        Self::Scale,
        Self::Active,
        Self::LightParameters,
    ];

    /// Attribute name in the `EditorProperties` element.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InstanceName => "InstanceName",
            Self::Position => "Position",
            Self::Rotation => "Rotation",
            Self::Scale => "Scale",
            Self::Active => "Active",
            Self::LightParameters => "LightParameters",
        }
    }
}

impl fmt::Display for EditorProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One script object type of a game.
///
/// The property tree itself lives in the [`PropertyArena`]; the template
/// holds the handle to its root struct.
#[derive(Debug, Clone)]
pub struct ScriptTemplate {
    game: Game,
    object_id: u32,
    name: String,
    source_file: Arc<str>,
    properties: Option<PropertyId>,
    editor_properties: [String; EditorProperty::ALL.len()],
    rotation_type: RotationType,
    scale_type: ScaleType,
    preview_scale: f32,
    visible: bool,
}

impl ScriptTemplate {
    pub fn new(game: Game, object_id: u32, source_file: impl Into<Arc<str>>) -> Self {
        Self {
            game,
            object_id,
            name: String::new(),
            source_file: source_file.into(),
            properties: None,
            editor_properties: Default::default(),
            rotation_type: RotationType::default(),
            scale_type: ScaleType::default(),
            preview_scale: 1.0,
            visible: true,
        }
    }

    /// Read a template document and initialize its property tree.
    pub fn read<A: Archive>(
        arena: &mut PropertyArena,
        names: &mut PropertyNameMap,
        arc: &mut A,
        object_id: u32,
        source_file: &str,
        archetypes: &mut dyn ArchetypeResolver,
    ) -> Result<Self> {
        let mut template = Self::new(arc.game(), object_id, source_file);
        template.serialize(arena, arc, archetypes)?;

        if let Some(root) = template.properties {
            if arena.node(root).name().is_empty() {
                arena.node_mut(root).set_name(template.name.clone());
            }
            let owner = TemplateRef::new(object_id, template.source_file.clone());
            arena.initialize(root, Some(&owner), 0, names)?;
        }
        Ok(template)
    }

    /// Serialize the template in the archive's direction.
    pub fn serialize<A: Archive>(
        &mut self,
        arena: &mut PropertyArena,
        arc: &mut A,
        archetypes: &mut dyn ArchetypeResolver,
    ) -> Result<()> {
        arc.required("Name", &mut self.name, SerialFlags::empty())?;

        if arc.begin_param("EditorProperties", SerialFlags::empty())? {
            for (property, id_string) in EditorProperty::ALL.iter().zip(&mut self.editor_properties) {
                arc.param(
                    property.as_str(),
                    id_string,
                    SerialFlags::ATTRIBUTE | SerialFlags::OPTIONAL,
                    Some(String::new()),
                )?;
            }
            arc.end_param()?;
        }

        arc.param("RotationType", &mut self.rotation_type, SerialFlags::OPTIONAL, Some(RotationType::Enabled))?;
        arc.param("ScaleType", &mut self.scale_type, SerialFlags::OPTIONAL, Some(ScaleType::Enabled))?;
        arc.param("PreviewScale", &mut self.preview_scale, SerialFlags::OPTIONAL, Some(1.0))?;
        arc.param("Visible", &mut self.visible, SerialFlags::OPTIONAL, Some(true))?;

        if (arc.is_reader() || self.properties.is_some()) && arc.begin_param("Properties", SerialFlags::empty())? {
            match self.properties {
                Some(root) if arc.is_writer() => arena.write_property(root, arc)?,
                _ => self.properties = Some(arena.read_property(arc, archetypes)?),
            }
            arc.end_param()?;
        }

        Ok(())
    }

    #[inline]
    pub fn game(&self) -> Game {
        self.game
    }

    #[inline]
    pub fn object_id(&self) -> u32 {
        self.object_id
    }

    /// Object ID as a four-character code (Echoes onward).
    pub fn object_fourcc(&self) -> FourCC {
        FourCC::from_u32(self.object_id)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Root struct of the property tree.
    #[inline]
    pub fn properties(&self) -> Option<PropertyId> {
        self.properties
    }

    /// ID string bound to an editor property, if any.
    pub fn editor_property_id_string(&self, property: EditorProperty) -> Option<&str> {
        let text = &self.editor_properties[property as usize];
        (!text.is_empty()).then_some(text.as_str())
    }

    pub fn set_editor_property_id_string(&mut self, property: EditorProperty, id_string: impl Into<String>) {
        self.editor_properties[property as usize] = id_string.into();
    }

    /// Resolve an editor property to its node.
    pub fn editor_property(&self, arena: &PropertyArena, property: EditorProperty) -> Result<Option<PropertyId>> {
        match (self.properties, self.editor_property_id_string(property)) {
            (Some(root), Some(id_string)) => arena.child_by_id_string(root, id_string),
            _ => Ok(None),
        }
    }

    #[inline]
    pub fn rotation_type(&self) -> RotationType {
        self.rotation_type
    }

    #[inline]
    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    #[inline]
    pub fn preview_scale(&self) -> f32 {
        self.preview_scale
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Number of properties in the tree, intrinsic components excluded.
    pub fn num_properties(&self, arena: &PropertyArena) -> usize {
        self.properties.map_or(0, |root| {
            arena
                .descendants(root)
                .filter(|&id| !arena.node(id).is_intrinsic())
                .count()
        })
    }
}
