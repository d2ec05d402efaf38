//! Archive serialization of property trees.
//!
//! One routine handles both directions. Properties cloned from an archetype
//! only store what differs from it, so a template file mostly consists of
//! `Archetype` references plus the handful of overridden defaults.

use reliquary_archive::{Archive, ArchiveValue, SerialFlags};
use reliquary_common::{Game, INVALID_ID};

use super::{PropertyArena, PropertyId};
use crate::{CookPreference, Error, PropertyType, PropertyValue, Result};

/// Looks up property archetypes by name while reading templates.
pub trait ArchetypeResolver {
    /// Find (loading it if needed) the root archetype called `name`.
    fn resolve(&mut self, arena: &mut PropertyArena, name: &str) -> Result<Option<PropertyId>>;
}

/// Resolver for documents that reference no archetypes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoArchetypes;

impl ArchetypeResolver for NoArchetypes {
    fn resolve(&mut self, _arena: &mut PropertyArena, _name: &str) -> Result<Option<PropertyId>> {
        Ok(None)
    }
}

impl<F> ArchetypeResolver for F
where
    F: FnMut(&mut PropertyArena, &str) -> Result<Option<PropertyId>>,
{
    fn resolve(&mut self, arena: &mut PropertyArena, name: &str) -> Result<Option<PropertyId>> {
        self(arena, name)
    }
}

/// Base values a property is compared against when deciding what to omit.
struct Baseline {
    name: String,
    description: String,
    suffix: String,
    cook_preference: CookPreference,
    min_version: f32,
    max_version: f32,
    atomic: bool,
    default_value: Option<PropertyValue>,
}

const ID_FLAGS: SerialFlags = SerialFlags::ATTRIBUTE
    .union(SerialFlags::HEX_DISPLAY)
    .union(SerialFlags::OPTIONAL);

impl PropertyArena {
    fn baseline(&self, id: PropertyId) -> Baseline {
        match self.node(id).archetype {
            Some(archetype) => {
                let source = self.node(archetype);
                Baseline {
                    name: source.name.clone(),
                    description: source.description.clone(),
                    suffix: source.suffix.clone(),
                    cook_preference: source.cook_preference,
                    min_version: source.min_version,
                    max_version: source.max_version,
                    atomic: source.is_atomic(),
                    default_value: source.default_value.clone(),
                }
            }
            None => Baseline {
                name: String::new(),
                description: String::new(),
                suffix: String::new(),
                cook_preference: CookPreference::Default,
                min_version: 0.0,
                max_version: f32::MAX,
                atomic: false,
                default_value: PropertyValue::initial(self.node(id).property_type()),
            },
        }
    }

    /// Read a property whose `Type` is given in the current scope.
    ///
    /// The node is created detached and left uninitialized. On failure the
    /// partially read tree is removed.
    pub fn read_property<A: Archive>(
        &mut self,
        arc: &mut A,
        archetypes: &mut dyn ArchetypeResolver,
    ) -> Result<PropertyId> {
        let mut ty = PropertyType::Struct;
        arc.required("Type", &mut ty, SerialFlags::ATTRIBUTE)?;

        let id = self.create(ty, arc.game());
        if let Err(e) = self.serialize(id, arc, archetypes) {
            self.discard(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Write a property with its `Type` in the current scope.
    pub fn write_property<A: Archive>(&mut self, id: PropertyId, arc: &mut A) -> Result<()> {
        let mut ty = self.node(id).property_type();
        arc.required("Type", &mut ty, SerialFlags::ATTRIBUTE)?;
        self.serialize(id, arc, &mut NoArchetypes)
    }

    /// Serialize a property and its children in the archive's direction.
    pub fn serialize<A: Archive>(
        &mut self,
        id: PropertyId,
        arc: &mut A,
        archetypes: &mut dyn ArchetypeResolver,
    ) -> Result<()> {
        let mut prop_id = self.node(id).id;
        arc.param("ID", &mut prop_id, ID_FLAGS, Some(INVALID_ID))?;
        if arc.is_reader() {
            self.node_mut(id).set_id(prop_id);
        }

        self.serialize_archetype(id, arc, archetypes)?;

        let base = self.baseline(id);
        let inherited = if self.node(id).archetype.is_some() {
            SerialFlags::OPTIONAL
        } else {
            SerialFlags::empty()
        };

        let node = self.node(id);
        if arc.game() <= Game::Prime || self.is_root_parent(id) || node.id <= 0xFF {
            let mut name = node.name.clone();
            arc.param("Name", &mut name, inherited, Some(base.name.clone()))?;
            if arc.is_reader() {
                self.node_mut(id).set_name(name);
            }
        }

        let node = self.node(id);
        let mut description = node.description.clone();
        let mut cook_preference = node.cook_preference;
        let mut min_version = node.min_version;
        let mut max_version = node.max_version;
        let mut suffix = node.suffix.clone();

        arc.param("Description", &mut description, SerialFlags::OPTIONAL, Some(base.description.clone()))?;
        arc.param("CookPreference", &mut cook_preference, SerialFlags::OPTIONAL, Some(base.cook_preference))?;
        arc.param("MinVersion", &mut min_version, SerialFlags::OPTIONAL, Some(base.min_version))?;
        arc.param("MaxVersion", &mut max_version, SerialFlags::OPTIONAL, Some(base.max_version))?;
        arc.param("Suffix", &mut suffix, SerialFlags::OPTIONAL, Some(base.suffix.clone()))?;

        if arc.is_reader() {
            let node = self.node_mut(id);
            node.set_description(description);
            node.set_cook_preference(cook_preference);
            node.set_version_range(min_version, max_version);
            node.set_suffix(suffix);
        }

        self.serialize_default_value(id, arc, &base)?;
        self.serialize_payload(id, arc, archetypes, &base)
    }

    fn serialize_archetype<A: Archive>(
        &mut self,
        id: PropertyId,
        arc: &mut A,
        archetypes: &mut dyn ArchetypeResolver,
    ) -> Result<()> {
        let archetype = self.node(id).archetype;
        let archetype_is_root = archetype.is_some_and(|a| self.is_root_parent(a));

        if !(arc.is_reader() || archetype_is_root) || !arc.can_skip_parameters() {
            return Ok(());
        }

        let mut name = match archetype {
            Some(a) if arc.is_writer() => self.node(a).name.clone(),
            _ => String::new(),
        };
        arc.param(
            "Archetype",
            &mut name,
            SerialFlags::ATTRIBUTE | SerialFlags::OPTIONAL,
            Some(String::new()),
        )?;

        if arc.is_reader() && !name.is_empty() {
            let resolved = archetypes
                .resolve(self, &name)?
                .ok_or(Error::UnresolvedArchetype(name))?;
            self.init_from_archetype(id, resolved);
        }

        Ok(())
    }

    fn serialize_default_value<A: Archive>(&mut self, id: PropertyId, arc: &mut A, base: &Baseline) -> Result<()> {
        const NAME: &str = "DefaultValue";
        let hex = SerialFlags::OPTIONAL | SerialFlags::HEX_DISPLAY;

        let Some(mut value) = self.node(id).default_value.clone() else {
            return Ok(());
        };
        let fallback = base.default_value.clone();

        match (&mut value, fallback) {
            (PropertyValue::Bool(v), Some(PropertyValue::Bool(d))) => {
                arc.param(NAME, v, SerialFlags::OPTIONAL, Some(d))?
            }
            (PropertyValue::Byte(v), Some(PropertyValue::Byte(d))) => {
                arc.param(NAME, v, SerialFlags::OPTIONAL, Some(d))?
            }
            (PropertyValue::Short(v), Some(PropertyValue::Short(d))) => {
                arc.param(NAME, v, SerialFlags::OPTIONAL, Some(d))?
            }
            (PropertyValue::Int(v), Some(PropertyValue::Int(d))) => {
                arc.param(NAME, v, SerialFlags::OPTIONAL, Some(d))?
            }
            (PropertyValue::Float(v), Some(PropertyValue::Float(d))) => {
                arc.param(NAME, v, SerialFlags::OPTIONAL, Some(d))?
            }
            (PropertyValue::String(v), Some(PropertyValue::String(d))) => {
                arc.param(NAME, v, SerialFlags::OPTIONAL, Some(d))?
            }
            (PropertyValue::Enum(v), Some(PropertyValue::Enum(d)))
            | (PropertyValue::Flags(v), Some(PropertyValue::Flags(d)))
            | (PropertyValue::Sound(v), Some(PropertyValue::Sound(d)))
            | (PropertyValue::Animation(v), Some(PropertyValue::Animation(d))) => {
                arc.param(NAME, v, hex, Some(d))?
            }
            (PropertyValue::Asset(v), Some(PropertyValue::Asset(d))) => arc.param(NAME, v, hex, Some(d))?,
            (PropertyValue::Vector(v), Some(PropertyValue::Vector(d))) => {
                let mut components = v.to_array();
                serialize_components(arc, NAME, &mut components, &["X", "Y", "Z"], &d.to_array())?;
                *v = components.into();
            }
            (PropertyValue::Color(v), Some(PropertyValue::Color(d))) => {
                let mut components = v.to_array();
                serialize_components(arc, NAME, &mut components, &["R", "G", "B", "A"], &d.to_array())?;
                *v = components.into();
            }
            // Splines and GUIDs have no textual default.
            _ => return Ok(()),
        }

        if arc.is_reader() {
            self.node_mut(id).set_default_value(value)?;
        }
        Ok(())
    }

    fn serialize_payload<A: Archive>(
        &mut self,
        id: PropertyId,
        arc: &mut A,
        archetypes: &mut dyn ArchetypeResolver,
        base: &Baseline,
    ) -> Result<()> {
        let archetype = self.node(id).archetype;
        let (is_reader, can_skip) = (arc.is_reader(), arc.can_skip_parameters());
        // Lists are written in full unless they match the archetype's.
        let write_lists = |same_as_archetype: bool| {
            is_reader || archetype.is_none() || !can_skip || !same_as_archetype
        };

        match self.node(id).property_type() {
            PropertyType::Enum | PropertyType::Choice => {
                if archetype.is_none() {
                    let mut override_name = self.node(id).as_enum().is_some_and(|e| e.override_type_name());
                    arc.param("OverrideTypeName", &mut override_name, SerialFlags::OPTIONAL, Some(false))?;
                    if let Some(e) = self.node_mut(id).as_enum_mut() {
                        e.set_override_flag(override_name);
                    }
                }

                let same = archetype.is_some_and(|a| self.node(a).kind.same_payload(&self.node(id).kind));
                if write_lists(same) {
                    let mut values = self.node(id).as_enum().map(|e| e.values().to_vec()).unwrap_or_default();
                    arc.list("Values", &mut values, |arc, value| value.serialize(arc))?;
                    if let Some(e) = self.node_mut(id).as_enum_mut() {
                        *e.values_mut() = values;
                    }
                }
            }
            PropertyType::Flags => {
                let same = archetype.is_some_and(|a| self.node(a).kind.same_payload(&self.node(id).kind));
                if write_lists(same) {
                    let mut flags = self.node(id).as_flags().map(|f| f.flags.clone()).unwrap_or_default();
                    arc.list("Flags", &mut flags, |arc, flag| flag.serialize(arc))?;
                    if let Some(f) = self.node_mut(id).as_flags_mut() {
                        f.flags = flags;
                    }
                }
            }
            PropertyType::Asset => {
                let fallback = archetype
                    .and_then(|a| self.node(a).as_asset())
                    .map(|a| a.filter_text())
                    .unwrap_or_default();
                let mut filter = self.node(id).as_asset().map(|a| a.filter_text()).unwrap_or_default();
                arc.param("TypeFilter", &mut filter, SerialFlags::OPTIONAL, Some(fallback))?;
                if arc.is_reader() {
                    if let Some(a) = self.node_mut(id).as_asset_mut() {
                        a.set_filter_text(&filter);
                    }
                }
            }
            PropertyType::Struct => {
                let mut atomic = self.node(id).is_atomic();
                arc.param("Atomic", &mut atomic, SerialFlags::OPTIONAL, Some(base.atomic))?;
                if arc.is_reader() {
                    self.node_mut(id).set_atomic(atomic);
                }
                self.serialize_sub_properties(id, arc, archetypes)?;
            }
            PropertyType::Pointer => self.serialize_sub_properties(id, arc, archetypes)?,
            PropertyType::Array => self.serialize_item_archetype(id, arc, archetypes)?,
            _ => {}
        }

        Ok(())
    }

    fn serialize_sub_properties<A: Archive>(
        &mut self,
        id: PropertyId,
        arc: &mut A,
        archetypes: &mut dyn ArchetypeResolver,
    ) -> Result<()> {
        if arc.is_reader() {
            if !arc.begin_param("SubProperties", SerialFlags::empty())? {
                return Ok(());
            }

            while arc.begin_param("Element", SerialFlags::empty())? {
                let mut ty = PropertyType::Struct;
                arc.required("Type", &mut ty, SerialFlags::ATTRIBUTE)?;
                let mut child_id = INVALID_ID;
                arc.param("ID", &mut child_id, ID_FLAGS, Some(INVALID_ID))?;

                let existing = match child_id {
                    INVALID_ID => None,
                    child_id => self.child_by_id(id, child_id),
                };
                let child = match existing {
                    Some(child) => child,
                    None => self.create_child(id, ty),
                };

                self.serialize(child, arc, archetypes)?;
                arc.end_param()?;
            }

            arc.end_param()?;
            return Ok(());
        }

        let skip_unchanged = self.node(id).archetype.is_some() && arc.can_skip_parameters();
        let children: Vec<PropertyId> = self
            .children(id)
            .filter(|&c| !self.node(c).is_intrinsic())
            .filter(|&c| !skip_unchanged || self.should_serialize(c))
            .collect();

        if children.is_empty() {
            return Ok(());
        }

        arc.begin_param("SubProperties", SerialFlags::empty())?;
        for child in children {
            arc.begin_param("Element", SerialFlags::empty())?;
            let mut ty = self.node(child).property_type();
            arc.required("Type", &mut ty, SerialFlags::ATTRIBUTE)?;
            self.serialize(child, arc, archetypes)?;
            arc.end_param()?;
        }
        arc.end_param()?;
        Ok(())
    }

    fn serialize_item_archetype<A: Archive>(
        &mut self,
        id: PropertyId,
        arc: &mut A,
        archetypes: &mut dyn ArchetypeResolver,
    ) -> Result<()> {
        let existing = self.item_archetype(id);

        if arc.is_reader() {
            if !arc.begin_param("ItemArchetype", SerialFlags::empty())? {
                return Ok(());
            }
            let mut ty = PropertyType::Struct;
            arc.required("Type", &mut ty, SerialFlags::ATTRIBUTE)?;

            let item = match existing {
                Some(item) => item,
                None => self.create_child(id, ty),
            };
            self.serialize(item, arc, archetypes)?;
            arc.end_param()?;
            return Ok(());
        }

        let Some(item) = existing else {
            return Ok(());
        };
        let unchanged = self.node(id).archetype.is_some() && !self.should_serialize(item);
        if unchanged && arc.can_skip_parameters() {
            return Ok(());
        }

        arc.begin_param("ItemArchetype", SerialFlags::empty())?;
        let mut ty = self.node(item).property_type();
        arc.required("Type", &mut ty, SerialFlags::ATTRIBUTE)?;
        self.serialize(item, arc, archetypes)?;
        arc.end_param()?;
        Ok(())
    }
}

/// Serialize a fixed-size float tuple as one element with a component per
/// attribute, e.g. `<DefaultValue X="0" Y="1" Z="0"/>`.
fn serialize_components<A: Archive, const N: usize>(
    arc: &mut A,
    name: &str,
    components: &mut [f32; N],
    labels: &[&str; N],
    fallback: &[f32; N],
) -> Result<()> {
    if arc.is_writer() && arc.can_skip_parameters() && components == fallback {
        return Ok(());
    }

    if !arc.begin_param(name, SerialFlags::empty())? {
        *components = *fallback;
        return Ok(());
    }

    for (component, label) in components.iter_mut().zip(labels) {
        arc.required(label, component, SerialFlags::ATTRIBUTE)?;
    }
    arc.end_param()?;
    Ok(())
}

/// Text form of a property value, as written to template files.
pub(crate) fn value_text(value: &PropertyValue) -> String {
    let hex = SerialFlags::HEX_DISPLAY;
    match value {
        PropertyValue::Bool(v) => v.to_archive_string(SerialFlags::empty()),
        PropertyValue::Byte(v) => v.to_archive_string(SerialFlags::empty()),
        PropertyValue::Short(v) => v.to_archive_string(SerialFlags::empty()),
        PropertyValue::Int(v) => v.to_archive_string(SerialFlags::empty()),
        PropertyValue::Float(v) => v.to_archive_string(SerialFlags::empty()),
        PropertyValue::Enum(v) | PropertyValue::Flags(v) | PropertyValue::Sound(v) | PropertyValue::Animation(v) => {
            v.to_archive_string(hex)
        }
        PropertyValue::Asset(v) => v.to_archive_string(hex),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PropertyNameMap, PropertyType};
    use glam::Vec3;
    use reliquary_archive::{XmlReader, XmlWriter};

    fn write(arena: &mut PropertyArena, id: PropertyId, game: Game) -> String {
        let mut writer = XmlWriter::new("Property", game);
        arena.write_property(id, &mut writer).unwrap();
        writer.to_xml_string().unwrap()
    }

    fn read(arena: &mut PropertyArena, xml: &str, archetypes: &mut dyn ArchetypeResolver) -> PropertyId {
        let mut reader = XmlReader::parse(xml).unwrap();
        arena.read_property(&mut reader, archetypes).unwrap()
    }

    fn sample_tree(arena: &mut PropertyArena) -> PropertyId {
        let root = arena.create(PropertyType::Struct, Game::Echoes);
        arena.node_mut(root).set_name("Door");

        let health = arena.create_child(root, PropertyType::Int);
        arena.node_mut(health).set_id(0x41);
        arena.node_mut(health).set_name("Health");
        arena.node_mut(health).set_default_value(PropertyValue::Int(5)).unwrap();
        arena.node_mut(health).set_description("Hit points");

        let kind = arena.create_child(root, PropertyType::Choice);
        arena.node_mut(kind).set_id(0x1234_5678);
        arena.node_mut(kind).set_default_value(PropertyValue::Enum(1)).unwrap();
        if let Some(e) = arena.node_mut(kind).as_enum_mut() {
            e.add_value("Closed", 0);
            e.add_value("Open", 1);
        }

        let flags = arena.create_child(root, PropertyType::Flags);
        arena.node_mut(flags).set_id(0x2000_0000);
        if let Some(f) = arena.node_mut(flags).as_flags_mut() {
            f.add_flag("Locked", 0x1);
        }

        let model = arena.create_child(root, PropertyType::Asset);
        arena.node_mut(model).set_id(0x3000_0000);
        if let Some(a) = arena.node_mut(model).as_asset_mut() {
            a.set_filter_text("CMDL");
        }

        let offset = arena.create_child(root, PropertyType::Vector);
        arena.node_mut(offset).set_id(0x4000_0000);
        arena
            .node_mut(offset)
            .set_default_value(PropertyValue::Vector(Vec3::new(0.0, 1.5, -2.0)))
            .unwrap();
        arena.node_mut(offset).set_version_range(1.0, 3.0);

        let list = arena.create_child(root, PropertyType::Array);
        arena.node_mut(list).set_id(0x5000_0000);
        let item = arena.create_child(list, PropertyType::Float);
        arena.node_mut(item).set_default_value(PropertyValue::Float(0.25)).unwrap();

        root
    }

    #[test]
    fn test_write_then_read_is_idempotent() {
        let mut arena = PropertyArena::new();
        let root = sample_tree(&mut arena);
        let first = write(&mut arena, root, Game::Echoes);

        let copy = read(&mut arena, &first, &mut NoArchetypes);
        let second = write(&mut arena, copy, Game::Echoes);
        assert_eq!(first, second);

        assert_eq!(arena.node(copy).name(), "Door");
        let health = arena.child_by_id(copy, 0x41).unwrap();
        assert_eq!(arena.node(health).name(), "Health");
        assert_eq!(arena.node(health).default_value(), Some(&PropertyValue::Int(5)));

        let kind = arena.child_by_id(copy, 0x1234_5678).unwrap();
        assert_eq!(arena.node(kind).property_type(), PropertyType::Choice);
        assert_eq!(arena.as_choice(kind).unwrap().num_possible_values(), 2);

        let offset = arena.child_by_id(copy, 0x4000_0000).unwrap();
        assert_eq!(arena.node(offset).max_version(), 3.0);

        let list = arena.child_by_id(copy, 0x5000_0000).unwrap();
        let item = arena.item_archetype(list).unwrap();
        assert!(arena.node(item).is_array_archetype());
        assert_eq!(arena.node(item).default_value(), Some(&PropertyValue::Float(0.25)));
    }

    #[test]
    fn test_hashed_names_not_written() {
        let mut arena = PropertyArena::new();
        let root = sample_tree(&mut arena);
        let xml = write(&mut arena, root, Game::Echoes);

        assert!(xml.contains("<Name>Health</Name>"));
        assert!(xml.contains(r#"ID="0x12345678""#));
        assert!(xml.contains(r#"<DefaultValue X="0" Y="1.5" Z="-2"/>"#));
        assert!(xml.contains("<TypeFilter>CMDL</TypeFilter>"));
        assert!(xml.contains("<MinVersion>1</MinVersion>"));
        assert!(!xml.contains("<Suffix"));
        assert!(!xml.contains("<CookPreference"));
    }

    #[test]
    fn test_archetype_reference_stores_only_differences() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();

        let archetype = arena.create(PropertyType::Struct, Game::Echoes);
        arena.node_mut(archetype).set_name("HealthInfo");
        arena.node_mut(archetype).set_flags(crate::PropertyFlags::ARCHETYPE);
        for (id, value) in [(0xF0668919, 10.0), (0xCF90D15E, 0.5)] {
            let child = arena.create_child(archetype, PropertyType::Float);
            arena.node_mut(child).set_id(id);
            arena.node_mut(child).set_default_value(PropertyValue::Float(value)).unwrap();
        }
        arena.initialize(archetype, None, 0, &mut names).unwrap();

        let mut resolver = |_: &mut PropertyArena, name: &str| -> Result<Option<PropertyId>> {
            Ok((name == "HealthInfo").then_some(archetype))
        };

        let xml = r#"<Property Game="Echoes" Type="Struct" Archetype="HealthInfo">
            <SubProperties>
                <Element Type="Float" ID="0xCF90D15E"><DefaultValue>2</DefaultValue></Element>
            </SubProperties>
        </Property>"#;
        let instance = read(&mut arena, xml, &mut resolver);

        assert_eq!(arena.node(instance).archetype(), Some(archetype));
        assert_eq!(arena.child_count(instance), 2);
        let overridden = arena.child_by_id(instance, 0xCF90D15E).unwrap();
        assert_eq!(arena.node(overridden).default_value(), Some(&PropertyValue::Float(2.0)));
        assert!(arena.should_serialize(overridden));
        let inherited = arena.child_by_id(instance, 0xF0668919).unwrap();
        assert!(!arena.should_serialize(inherited));

        let written = write(&mut arena, instance, Game::Echoes);
        assert!(written.contains(r#"Archetype="HealthInfo""#));
        assert!(written.contains("0xCF90D15E"));
        assert!(!written.contains("0xF0668919"));
    }

    #[test]
    fn test_nested_enum_keeps_type_name_override() {
        let mut arena = PropertyArena::new();
        let root = arena.create(PropertyType::Struct, Game::Echoes);
        arena.node_mut(root).set_name("Weapon");

        let damage = arena.create_child(root, PropertyType::Enum);
        arena.node_mut(damage).set_id(0x10);
        arena.node_mut(damage).set_name("DamageType");
        if let Some(e) = arena.node_mut(damage).as_enum_mut() {
            e.set_override_flag(true);
            e.add_value("Power", 0);
        }
        assert_eq!(arena.hashable_type_name(damage), "DamageType");

        let xml = write(&mut arena, root, Game::Echoes);
        assert!(xml.contains("OverrideTypeName"));

        let copy = read(&mut arena, &xml, &mut NoArchetypes);
        let damage = arena.child_by_id(copy, 0x10).unwrap();
        assert_eq!(arena.hashable_type_name(damage), "DamageType");
        assert_eq!(write(&mut arena, copy, Game::Echoes), xml);
    }

    #[test]
    fn test_inline_names_follow_archive_game() {
        let xml = r#"<Property Type="Struct"><SubProperties>
            <Element Type="Int" ID="0x12345678"><Name>Speed</Name></Element>
        </SubProperties></Property>"#;

        let mut arena = PropertyArena::new();
        let mut prime = XmlReader::parse(xml).unwrap().with_game(Game::Prime);
        let root = arena.read_property(&mut prime, &mut NoArchetypes).unwrap();
        let speed = arena.child_by_id(root, 0x1234_5678).unwrap();
        assert_eq!(arena.node(speed).name(), "Speed");

        let mut echoes = XmlReader::parse(xml).unwrap().with_game(Game::Echoes);
        let root = arena.read_property(&mut echoes, &mut NoArchetypes).unwrap();
        let speed = arena.child_by_id(root, 0x1234_5678).unwrap();
        assert_eq!(arena.node(speed).name(), "");
    }

    #[test]
    fn test_unresolved_archetype_discards_node() {
        let mut arena = PropertyArena::new();
        let xml = r#"<Property Game="Echoes" Type="Struct" Archetype="Missing"/>"#;
        let mut reader = XmlReader::parse(xml).unwrap();

        let result = arena.read_property(&mut reader, &mut NoArchetypes);
        assert!(matches!(result, Err(Error::UnresolvedArchetype(name)) if name == "Missing"));
        assert!(arena.is_empty());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let mut arena = PropertyArena::new();
        let mut reader = XmlReader::parse(r#"<Property Type="Quaternion"/>"#).unwrap();
        assert!(arena.read_property(&mut reader, &mut NoArchetypes).is_err());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&PropertyValue::Enum(0x41)), "0x00000041");
        assert_eq!(value_text(&PropertyValue::Float(1.5)), "1.5");
    }
}
