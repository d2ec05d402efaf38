//! Property name map.
//!
//! From Echoes onward, property names are not stored in game data; each
//! property is identified by a hash of its name and type. The name map keeps
//! the known `(type, ID) -> name` pairs, hands names out to properties as
//! they are initialized, and tracks which live properties use each pair so a
//! rename reaches all of them.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};

use hashbrown::{HashMap as FastHashMap, HashSet as FastHashSet};
use reliquary_archive::{Archive, SerialFlags, XmlReader, XmlWriter};
use reliquary_common::{crc, Game, INVALID_ID};
use rustc_hash::FxHasher;
use tracing::{debug, info, warn};

use crate::{Error, PropertyArena, PropertyFlags, PropertyId, PropertyType, Result};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;
type FxHashSet<T> = FastHashSet<T, BuildHasherDefault<FxHasher>>;

/// Name reported for IDs the map does not know.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Where the name map lives and which variant is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMapConfig {
    /// Typed map, keyed by ID and type name.
    pub map_path: PathBuf,
    /// Legacy map, keyed by ID only.
    pub legacy_map_path: PathBuf,
    /// Look names up in the legacy map.
    pub use_legacy_for_lookups: bool,
    /// Write renames to the legacy map.
    pub use_legacy_for_updates: bool,
}

impl NameMapConfig {
    /// Default file locations under a data directory.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self {
            map_path: data_dir.join("templates/PropertyMap.xml"),
            legacy_map_path: data_dir.join("templates/PropertyMapLegacy.xml"),
            use_legacy_for_lookups: false,
            use_legacy_for_updates: false,
        }
    }
}

/// Map key: property ID plus the hash of its hashable type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameKey {
    pub id: u32,
    pub type_hash: u32,
}

impl NameKey {
    pub fn new(id: u32, type_name: &str) -> Self {
        Self {
            id,
            type_hash: crc::hash_str(type_name),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct NameValue {
    name: String,
    is_valid: bool,
    properties: FxHashSet<PropertyId>,
}

/// One entry as seen through [`PropertyNameMap::iter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMapEntry<'a> {
    pub id: u32,
    pub type_name: &'a str,
    pub name: &'a str,
    /// Whether `name` hashes to `id` with this type.
    pub is_valid: bool,
    /// Number of live properties using the entry.
    pub live_properties: usize,
}

/// The `(type, ID) -> name` directory.
///
/// Loaded lazily on first registration; changes are kept in memory until
/// [`PropertyNameMap::save`].
#[derive(Debug)]
pub struct PropertyNameMap {
    config: Option<NameMapConfig>,
    entries: BTreeMap<NameKey, NameValue>,
    legacy: BTreeMap<u32, String>,
    type_names: FxHashMap<u32, String>,
    loaded: bool,
    dirty: bool,
}

impl PropertyNameMap {
    /// A map backed by the files in `config`, loaded on first use.
    pub fn new(config: NameMapConfig) -> Self {
        Self {
            config: Some(config),
            entries: BTreeMap::new(),
            legacy: BTreeMap::new(),
            type_names: FxHashMap::default(),
            loaded: false,
            dirty: false,
        }
    }

    /// An empty map with no backing file.
    pub fn in_memory() -> Self {
        Self {
            config: None,
            entries: BTreeMap::new(),
            legacy: BTreeMap::new(),
            type_names: FxHashMap::default(),
            loaded: true,
            dirty: false,
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of typed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn use_legacy_for_lookups(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.use_legacy_for_lookups)
    }

    fn use_legacy_for_updates(&self) -> bool {
        self.config.as_ref().is_some_and(|c| c.use_legacy_for_updates)
    }

    /// Load the map if it has not been loaded yet.
    pub fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.load()?;
        }
        Ok(())
    }

    fn load(&mut self) -> Result<()> {
        let Some(config) = self.config.clone() else {
            self.loaded = true;
            return Ok(());
        };

        if config.use_legacy_for_lookups {
            debug!(path = %config.legacy_map_path.display(), "loading legacy property map");
            if let Some(mut reader) = open_map(&config.legacy_map_path)? {
                while reader.begin_param("Element", SerialFlags::empty())? {
                    let (mut id, mut name) = (0u32, String::new());
                    serialize_legacy_entry(&mut reader, &mut id, &mut name)?;
                    self.legacy.insert(id, name);
                    reader.end_param()?;
                }
            }
        } else {
            debug!(path = %config.map_path.display(), "loading property map");
            if let Some(mut reader) = open_map(&config.map_path)? {
                while reader.begin_param("Element", SerialFlags::empty())? {
                    let (mut id, mut type_name, mut name) = (0u32, String::new(), String::new());
                    serialize_entry(&mut reader, &mut id, &mut type_name, &mut name)?;
                    reader.end_param()?;

                    let is_valid = crc::property_id(&name, &type_name) == id;
                    let key = NameKey::new(id, &type_name);
                    self.register_type_name(key.type_hash, &type_name);
                    self.entries.insert(
                        key,
                        NameValue {
                            name,
                            is_valid,
                            properties: FxHashSet::default(),
                        },
                    );
                }
            }
        }

        info!(
            entries = self.entries.len(),
            legacy = self.legacy.len(),
            "property map loaded"
        );
        self.loaded = true;
        Ok(())
    }

    fn register_type_name(&mut self, type_hash: u32, type_name: &str) {
        self.type_names
            .entry(type_hash)
            .or_insert_with(|| type_name.to_string());
    }

    /// Human-readable type name for a type hash.
    pub fn type_name(&self, type_hash: u32) -> Option<&str> {
        self.type_names.get(&type_hash).map(String::as_str)
    }

    /// Key registered with the other half of the `Int`/`Choice` pair.
    fn fallback_key(&self, id: u32, ty: PropertyType) -> Option<NameKey> {
        let other = match ty {
            PropertyType::Int => "choice",
            PropertyType::Choice => "int",
            _ => return None,
        };
        Some(NameKey::new(id, other)).filter(|key| self.entries.contains_key(key))
    }

    /// Register a property that takes its name from the map.
    ///
    /// The property receives the mapped name and is tracked for renames. An
    /// unseen `(type, ID)` pair gets a placeholder entry named `"Unknown"`.
    pub fn register_property(&mut self, arena: &mut PropertyArena, id: PropertyId) -> Result<()> {
        self.ensure_loaded()?;

        let node = arena.node(id);
        let prop_id = node.id();
        if prop_id == INVALID_ID {
            return Err(Error::UnregistrableProperty(prop_id));
        }

        let ty = node.property_type();
        let type_name = arena.hashable_type_name(id).to_string();
        let mut key = NameKey::new(prop_id, &type_name);

        if !self.entries.contains_key(&key) {
            if self.use_legacy_for_lookups() {
                let name = self
                    .legacy
                    .get(&prop_id)
                    .cloned()
                    .ok_or(Error::LegacyNameMissing(prop_id))?;
                let is_valid = crc::property_id(&name, &type_name) == prop_id;
                self.entries.insert(
                    key,
                    NameValue {
                        name,
                        is_valid,
                        properties: FxHashSet::default(),
                    },
                );
                self.register_type_name(key.type_hash, &type_name);
            } else if let Some(fallback) = self.fallback_key(prop_id, ty) {
                key = fallback;
            } else {
                self.entries.insert(
                    key,
                    NameValue {
                        name: UNKNOWN_NAME.to_string(),
                        is_valid: false,
                        properties: FxHashSet::default(),
                    },
                );
                self.register_type_name(key.type_hash, &type_name);
            }
        }

        let name = match self.entries.get_mut(&key) {
            Some(value) => {
                value.properties.insert(id);
                value.name.clone()
            }
            None => UNKNOWN_NAME.to_string(),
        };
        arena.node_mut(id).set_name(name);
        Ok(())
    }

    /// Stop tracking a property. The entry itself is kept.
    pub fn unregister_property(&mut self, arena: &PropertyArena, id: PropertyId) {
        let node = arena.node(id);
        let key = NameKey::new(node.id(), arena.hashable_type_name(id));

        if let Some(value) = self.entries.get_mut(&key) {
            if value.properties.remove(&id) {
                return;
            }
        }

        if let Some(fallback) = self.fallback_key(node.id(), node.property_type()) {
            if let Some(value) = self.entries.get_mut(&fallback) {
                value.properties.remove(&id);
            }
        }
    }

    /// Mapped name of a property, or `"Unknown"`.
    pub fn property_name(&self, arena: &PropertyArena, id: PropertyId) -> &str {
        let prop_id = arena.node(id).id();

        if self.use_legacy_for_lookups() {
            return self.legacy.get(&prop_id).map_or(UNKNOWN_NAME, String::as_str);
        }
        self.property_name_by_id(prop_id, arena.hashable_type_name(id))
    }

    /// Mapped name for an ID and exact hashable type name, or `"Unknown"`.
    pub fn property_name_by_id(&self, id: u32, type_name: &str) -> &str {
        self.entries
            .get(&NameKey::new(id, type_name))
            .map_or(UNKNOWN_NAME, |v| v.name.as_str())
    }

    /// Whether the stored name of a known pair hashes to its ID. `None` when
    /// the pair is not in the map.
    pub fn is_valid_property_id(&self, id: u32, type_name: &str) -> Option<bool> {
        self.entries
            .get(&NameKey::new(id, type_name))
            .map(|v| v.is_valid)
    }

    /// Live properties registered under a pair.
    pub fn properties_with_id(&self, id: u32, type_name: &str) -> Vec<PropertyId> {
        self.entries
            .get(&NameKey::new(id, type_name))
            .map(|v| v.properties.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Template files that contain a property with this pair.
    pub fn template_files_with_property(&self, arena: &PropertyArena, id: u32, type_name: &str) -> BTreeSet<String> {
        self.properties_with_id(id, type_name)
            .into_iter()
            .filter_map(|p| arena.template_file_name(p))
            .map(str::to_string)
            .collect()
    }

    /// Rename a pair.
    ///
    /// Live properties still showing the old name follow the rename;
    /// properties whose name was changed locally keep it. Returns whether
    /// anything changed.
    pub fn set_property_name(&mut self, arena: &mut PropertyArena, id: u32, type_name: &str, new_name: &str) -> bool {
        if self.use_legacy_for_updates() {
            if self.legacy.get(&id).map(String::as_str) == Some(new_name) {
                return false;
            }
            self.legacy.insert(id, new_name.to_string());
            self.dirty = true;
            return true;
        }

        let Some(value) = self.entries.get_mut(&NameKey::new(id, type_name)) else {
            return false;
        };
        if value.name == new_name {
            return false;
        }

        let old_name = std::mem::replace(&mut value.name, new_name.to_string());
        value.is_valid = crc::property_id(new_name, type_name) == id;

        for &property in &value.properties {
            if arena.get(property).is_some_and(|node| node.name() == old_name) {
                arena.node_mut(property).set_name(new_name);
            }
        }

        debug!(id = format_args!("0x{id:08X}"), type_name, old_name, new_name, "renamed property");
        self.dirty = true;
        true
    }

    /// Move the properties in the inheritance chain of `property` from
    /// `(old type, ID)` to `(new type, ID)`.
    pub fn change_type_name(&mut self, arena: &mut PropertyArena, property: PropertyId, old_type: &str, new_type: &str) {
        let old_hash = crc::hash_str(old_type);
        let new_hash = crc::hash_str(new_type);
        if old_hash == new_hash {
            return;
        }

        let root = arena.root_archetype(property);
        for node in arena.gather_all_sub_instances(root, true) {
            if !arena.uses_name_map(node) {
                continue;
            }

            let prop_id = arena.node(node).id();
            let old_key = NameKey { id: prop_id, type_hash: old_hash };
            let new_key = NameKey { id: prop_id, type_hash: new_hash };

            let was_registered = self
                .entries
                .get_mut(&old_key)
                .is_some_and(|v| v.properties.remove(&node));

            let name = arena.node(node).name().to_string();
            let value = self.entries.entry(new_key).or_insert_with(|| NameValue {
                is_valid: crc::property_id(&name, new_type) == prop_id,
                name,
                properties: FxHashSet::default(),
            });
            if was_registered {
                value.properties.insert(node);
            }

            arena.node_mut(node).flags.remove(PropertyFlags::HAS_CACHED_NAME_CHECK);
            self.dirty = true;
        }

        self.register_type_name(new_hash, new_type);
    }

    /// Re-key every entry of type `old_type` to `new_type`, keeping IDs and
    /// names.
    pub fn change_type_name_globally(&mut self, old_type: &str, new_type: &str) {
        let old_hash = crc::hash_str(old_type);
        let new_hash = crc::hash_str(new_type);
        if old_hash == new_hash {
            return;
        }

        let keys: Vec<NameKey> = self
            .entries
            .keys()
            .filter(|k| k.type_hash == old_hash)
            .copied()
            .collect();

        for key in keys {
            let Some(mut value) = self.entries.remove(&key) else {
                continue;
            };
            let new_key = NameKey { id: key.id, type_hash: new_hash };
            value.is_valid = crc::property_id(&value.name, new_type) == key.id;

            match self.entries.get_mut(&new_key) {
                Some(existing) => existing.properties.extend(value.properties),
                None => {
                    self.entries.insert(new_key, value);
                }
            }
            self.dirty = true;
        }

        self.type_names.insert(new_hash, new_type.to_string());
    }

    /// Iterate over the typed entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = NameMapEntry<'_>> + '_ {
        self.entries.iter().map(|(key, value)| NameMapEntry {
            id: key.id,
            type_name: self.type_name(key.type_hash).unwrap_or(UNKNOWN_NAME),
            name: &value.name,
            is_valid: value.is_valid,
            live_properties: value.properties.len(),
        })
    }

    /// Write the map back to disk.
    ///
    /// Does nothing unless the map is dirty or `force` is set. Entries with
    /// no live properties are dropped from the typed map first, so every
    /// template using the map should be loaded before saving.
    pub fn save(&mut self, force: bool) -> Result<()> {
        if !self.loaded {
            if !force {
                return Ok(());
            }
            self.load()?;
        }

        if !self.dirty && !force {
            return Ok(());
        }

        let Some(config) = self.config.clone() else {
            self.dirty = false;
            return Ok(());
        };

        if config.use_legacy_for_updates {
            let mut writer = XmlWriter::bare("PropertyMap", Game::ID_NAMING);
            for (id, name) in &self.legacy {
                let (mut id, mut name) = (*id, name.clone());
                writer.begin_param("Element", SerialFlags::empty())?;
                serialize_legacy_entry(&mut writer, &mut id, &mut name)?;
                writer.end_param()?;
            }
            write_map(&writer, &config.legacy_map_path)?;
        } else {
            let before = self.entries.len();
            self.entries.retain(|_, v| !v.properties.is_empty());
            debug!(pruned = before - self.entries.len(), "pruned unused property map entries");

            let mut writer = XmlWriter::bare("PropertyMap", Game::ID_NAMING);
            for (key, value) in &self.entries {
                let Some(type_name) = self.type_names.get(&key.type_hash) else {
                    warn!(id = format_args!("0x{:08X}", key.id), "skipping entry with unknown type hash");
                    continue;
                };

                let (mut id, mut type_name, mut name) = (key.id, type_name.clone(), value.name.clone());
                writer.begin_param("Element", SerialFlags::empty())?;
                serialize_entry(&mut writer, &mut id, &mut type_name, &mut name)?;
                writer.end_param()?;
            }
            write_map(&writer, &config.map_path)?;
        }

        info!(entries = self.entries.len(), "property map saved");
        self.dirty = false;
        Ok(())
    }

    /// Save pending changes and drop all state. The next use reloads.
    pub fn shutdown(&mut self) -> Result<()> {
        self.save(false)?;

        self.entries.clear();
        self.legacy.clear();
        self.type_names.clear();
        self.loaded = self.config.is_none();
        Ok(())
    }
}

fn open_map(path: &Path) -> Result<Option<XmlReader>> {
    if !path.exists() {
        warn!(path = %path.display(), "property map not found, starting empty");
        return Ok(None);
    }
    Ok(Some(XmlReader::open(path)?))
}

fn write_map(writer: &XmlWriter, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    writer.save(path)?;
    Ok(())
}

/// `<Key ID=".." Type=".."/><Value Name=".."/>`
fn serialize_entry<A: Archive>(arc: &mut A, id: &mut u32, type_name: &mut String, name: &mut String) -> Result<()> {
    if arc.begin_param("Key", SerialFlags::empty())? {
        arc.required("ID", id, SerialFlags::ATTRIBUTE | SerialFlags::HEX_DISPLAY)?;
        arc.required("Type", type_name, SerialFlags::ATTRIBUTE)?;
        arc.end_param()?;
    }
    if arc.begin_param("Value", SerialFlags::empty())? {
        arc.required("Name", name, SerialFlags::ATTRIBUTE)?;
        arc.end_param()?;
    }
    Ok(())
}

/// `<Key>0x..</Key><Value>..</Value>`
fn serialize_legacy_entry<A: Archive>(arc: &mut A, id: &mut u32, name: &mut String) -> Result<()> {
    arc.required("Key", id, SerialFlags::HEX_DISPLAY)?;
    arc.required("Value", name, SerialFlags::empty())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A root struct with one child per `(type, ID)` pair, initialized
    /// against `names`.
    fn tree(arena: &mut PropertyArena, names: &mut PropertyNameMap, children: &[(PropertyType, u32)]) -> Vec<PropertyId> {
        let root = arena.create(PropertyType::Struct, Game::Echoes);
        let ids: Vec<PropertyId> = children
            .iter()
            .map(|&(ty, id)| {
                let child = arena.create_child(root, ty);
                arena.node_mut(child).set_id(id);
                child
            })
            .collect();
        arena.initialize(root, None, 0, names).unwrap();
        ids
    }

    #[test]
    fn test_unknown_then_named() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();

        let first = tree(&mut arena, &mut names, &[(PropertyType::Int, 0x41)]);
        assert_eq!(names.property_name_by_id(0x41, "int"), UNKNOWN_NAME);
        assert_eq!(arena.node(first[0]).name(), UNKNOWN_NAME);
        assert_eq!(names.is_valid_property_id(0x41, "int"), Some(false));

        assert!(names.set_property_name(&mut arena, 0x41, "int", "Health"));
        assert_eq!(arena.node(first[0]).name(), "Health");

        let second = tree(&mut arena, &mut names, &[(PropertyType::Int, 0x41)]);
        assert_eq!(arena.node(second[0]).name(), "Health");
        assert_eq!(names.properties_with_id(0x41, "int").len(), 2);
        assert!(names.is_dirty());
    }

    #[test]
    fn test_rename_keeps_local_overrides() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let nodes = tree(
            &mut arena,
            &mut names,
            &[(PropertyType::Int, 5), (PropertyType::Int, 5), (PropertyType::Int, 5)],
        );
        arena.node_mut(nodes[2]).set_name("Custom");

        names.set_property_name(&mut arena, 5, "int", "NewName");

        assert_eq!(arena.node(nodes[0]).name(), "NewName");
        assert_eq!(arena.node(nodes[1]).name(), "NewName");
        assert_eq!(arena.node(nodes[2]).name(), "Custom");
        assert_eq!(names.property_name_by_id(5, "int"), "NewName");
    }

    #[test]
    fn test_global_type_rename() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let nodes = tree(&mut arena, &mut names, &[(PropertyType::Int, 1), (PropertyType::Int, 2)]);
        names.set_property_name(&mut arena, 1, "int", "One");
        names.set_property_name(&mut arena, 2, "int", "Two");

        names.change_type_name_globally("int", "Counter");

        assert_eq!(names.property_name_by_id(1, "Counter"), "One");
        assert_eq!(names.property_name_by_id(2, "Counter"), "Two");
        assert_eq!(names.is_valid_property_id(1, "int"), None);
        assert_eq!(names.properties_with_id(2, "Counter"), [nodes[1]]);
        assert!(names.iter().all(|e| e.type_name == "Counter"));
    }

    #[test]
    fn test_int_choice_fallback() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        tree(&mut arena, &mut names, &[(PropertyType::Choice, 7)]);
        names.set_property_name(&mut arena, 7, "choice", "Mode");

        let ints = tree(&mut arena, &mut names, &[(PropertyType::Int, 7)]);
        assert_eq!(arena.node(ints[0]).name(), "Mode");
        assert_eq!(names.len(), 1);
        assert_eq!(names.properties_with_id(7, "choice").len(), 2);

        assert_eq!(names.type_name(crc::hash_str("choice")), Some("choice"));
        assert_eq!(names.type_name(crc::hash_str("int")), None);

        names.unregister_property(&arena, ints[0]);
        assert_eq!(names.properties_with_id(7, "choice").len(), 1);
    }

    #[test]
    fn test_sentinel_id_is_rejected() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();
        let node = arena.create(PropertyType::Int, Game::Echoes);
        assert!(matches!(
            names.register_property(&mut arena, node),
            Err(Error::UnregistrableProperty(INVALID_ID))
        ));
    }

    #[test]
    fn test_scoped_type_rename() {
        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::in_memory();

        let archetype = arena.create(PropertyType::Enum, Game::Corruption);
        arena.node_mut(archetype).set_id(0x100);
        let root = arena.create(PropertyType::Struct, Game::Corruption);
        let copy = arena.create_copy(archetype, Some(root));
        let other = arena.create_child(root, PropertyType::Enum);
        arena.node_mut(other).set_id(0x100);
        arena.initialize(root, None, 0, &mut names).unwrap();
        assert_eq!(names.properties_with_id(0x100, "enum").len(), 2);

        names.change_type_name(&mut arena, copy, "enum", "DamageType");

        assert_eq!(names.properties_with_id(0x100, "enum"), [other]);
        assert_eq!(names.properties_with_id(0x100, "DamageType"), [copy]);
    }

    #[test]
    fn test_save_prunes_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let config = NameMapConfig::in_data_dir(dir.path());

        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::new(config.clone());
        let nodes = tree(&mut arena, &mut names, &[(PropertyType::Int, 0x41), (PropertyType::Float, 0x42)]);
        names.set_property_name(&mut arena, 0x41, "int", "Health");
        names.set_property_name(&mut arena, 0x42, "float", "Speed");

        arena.destroy(nodes[1], &mut names).unwrap();
        names.save(false).unwrap();
        assert!(!names.is_dirty());

        let mut reloaded = PropertyNameMap::new(config);
        reloaded.ensure_loaded().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.property_name_by_id(0x41, "int"), "Health");
        assert_eq!(reloaded.property_name_by_id(0x42, "float"), UNKNOWN_NAME);
        assert_eq!(reloaded.is_valid_property_id(0x41, "int"), Some(false));
    }

    #[test]
    fn test_load_checks_names_against_ids() {
        let dir = tempfile::tempdir().unwrap();
        let config = NameMapConfig::in_data_dir(dir.path());
        std::fs::create_dir_all(dir.path().join("templates")).unwrap();
        std::fs::write(
            &config.map_path,
            r#"<PropertyMap>
                <Element><Key ID="0xF0668919" Type="float"/><Value Name="Health"/></Element>
                <Element><Key ID="0xE174739A" Type="struct"/><Value Name="HealthInfo"/></Element>
                <Element><Key ID="0xF0668919" Type="int"/><Value Name="Health"/></Element>
            </PropertyMap>"#,
        )
        .unwrap();

        let mut names = PropertyNameMap::new(config);
        names.ensure_loaded().unwrap();
        assert_eq!(names.is_valid_property_id(0xF066_8919, "float"), Some(true));
        assert_eq!(names.is_valid_property_id(0xE174_739A, "struct"), Some(true));
        assert_eq!(names.is_valid_property_id(0xF066_8919, "int"), Some(false));
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut names = PropertyNameMap::new(NameMapConfig::in_data_dir(dir.path()));
        names.save(false).unwrap();
        assert!(!names.is_loaded());

        names.ensure_loaded().unwrap();
        assert!(names.is_loaded());
        assert!(names.is_empty());
    }

    #[test]
    fn test_legacy_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = NameMapConfig::in_data_dir(dir.path());
        config.use_legacy_for_lookups = true;
        std::fs::create_dir_all(dir.path().join("templates")).unwrap();
        std::fs::write(
            &config.legacy_map_path,
            "<PropertyMap><Element><Key>0x00000041</Key><Value>Health</Value></Element></PropertyMap>",
        )
        .unwrap();

        let mut arena = PropertyArena::new();
        let mut names = PropertyNameMap::new(config);
        let nodes = tree(&mut arena, &mut names, &[(PropertyType::Int, 0x41)]);
        assert_eq!(arena.node(nodes[0]).name(), "Health");
        assert_eq!(names.property_name(&arena, nodes[0]), "Health");

        let root = arena.create(PropertyType::Struct, Game::Echoes);
        let missing = arena.create_child(root, PropertyType::Int);
        arena.node_mut(missing).set_id(0x99);
        assert!(matches!(
            arena.initialize(root, None, 0, &mut names),
            Err(Error::LegacyNameMissing(0x99))
        ));
    }
}
