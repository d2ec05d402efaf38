//! Per-game template registry.

use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use reliquary_archive::{Archive, SerialFlags};
use reliquary_common::{FourCC, Game};
use rustc_hash::FxHasher;

use crate::{PropertyId, Result, ScriptTemplate};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// A `Name`/`Path` pair from the master file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PathEntry {
    pub name: String,
    pub path: String,
}

/// An `ID`/`Path` pair from the master file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TemplateEntry {
    pub id: u32,
    pub path: String,
}

/// An `ID`/`Name` pair from the master file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NamedId {
    id: u32,
    name: String,
}

/// Everything known about one game's script objects.
#[derive(Debug)]
pub struct MasterTemplate {
    pub(crate) game: Game,
    pub(crate) game_name: String,
    pub(crate) source_file: String,
    pub(crate) version: u32,
    pub(crate) fully_loaded: bool,
    pub(crate) game_versions: Vec<String>,
    pub(crate) archetype_paths: Vec<PathEntry>,
    pub(crate) template_paths: Vec<TemplateEntry>,
    pub(crate) templates: BTreeMap<u32, ScriptTemplate>,
    pub(crate) template_order: Vec<u32>,
    pub(crate) archetypes: FxHashMap<String, PropertyId>,
    pub(crate) states: BTreeMap<u32, String>,
    pub(crate) messages: BTreeMap<u32, String>,
}

impl MasterTemplate {
    pub fn new(game: Game, source_file: impl Into<String>) -> Self {
        Self {
            game,
            game_name: String::new(),
            source_file: source_file.into(),
            version: 0,
            fully_loaded: true,
            game_versions: Vec::new(),
            archetype_paths: Vec::new(),
            template_paths: Vec::new(),
            templates: BTreeMap::new(),
            template_order: Vec::new(),
            archetypes: FxHashMap::default(),
            states: BTreeMap::new(),
            messages: BTreeMap::new(),
        }
    }

    /// Serialize the master file contents in the archive's direction.
    ///
    /// Templates and archetypes are referenced by path only; loading them
    /// is up to the loader.
    pub fn serialize<A: Archive>(&mut self, arc: &mut A) -> Result<()> {
        arc.param("Name", &mut self.game_name, SerialFlags::ATTRIBUTE, Some(String::new()))?;
        arc.param("Version", &mut self.version, SerialFlags::ATTRIBUTE, Some(0))?;

        arc.list("GameVersions", &mut self.game_versions, |arc, name| -> Result<()> {
            arc.required("Name", name, SerialFlags::ATTRIBUTE)?;
            Ok(())
        })?;

        arc.list("Archetypes", &mut self.archetype_paths, |arc, entry| -> Result<()> {
            arc.required("Name", &mut entry.name, SerialFlags::ATTRIBUTE)?;
            arc.required("Path", &mut entry.path, SerialFlags::ATTRIBUTE)?;
            Ok(())
        })?;

        arc.list("Templates", &mut self.template_paths, |arc, entry| -> Result<()> {
            arc.required("ID", &mut entry.id, SerialFlags::ATTRIBUTE | SerialFlags::HEX_DISPLAY)?;
            arc.required("Path", &mut entry.path, SerialFlags::ATTRIBUTE)?;
            Ok(())
        })?;

        serialize_named_ids(arc, "States", &mut self.states)?;
        serialize_named_ids(arc, "Messages", &mut self.messages)?;
        Ok(())
    }

    #[inline]
    pub fn game(&self) -> Game {
        self.game
    }

    /// Display name of the game.
    #[inline]
    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    #[inline]
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// False when some template file could not be read.
    #[inline]
    pub fn is_loaded_successfully(&self) -> bool {
        self.fully_loaded
    }

    pub fn num_game_versions(&self) -> usize {
        self.game_versions.len()
    }

    /// Index of a named game version.
    pub fn game_version(&self, name: &str) -> Option<u32> {
        self.game_versions
            .iter()
            .position(|v| v.eq_ignore_ascii_case(name))
            .map(|i| i as u32)
    }

    pub fn game_versions(&self) -> &[String] {
        &self.game_versions
    }

    pub(crate) fn insert_template(&mut self, template: ScriptTemplate) {
        let id = template.object_id();
        if self.templates.insert(id, template).is_none() {
            self.template_order.push(id);
        }
    }

    pub fn num_script_templates(&self) -> usize {
        self.templates.len()
    }

    pub fn template_by_id(&self, object_id: u32) -> Option<&ScriptTemplate> {
        self.templates.get(&object_id)
    }

    pub fn template_by_fourcc(&self, object_id: FourCC) -> Option<&ScriptTemplate> {
        self.template_by_id(object_id.to_u32())
    }

    /// Template by position in the master file.
    pub fn template_by_index(&self, index: usize) -> Option<&ScriptTemplate> {
        self.template_order
            .get(index)
            .and_then(|id| self.templates.get(id))
    }

    /// Templates in master file order.
    pub fn templates(&self) -> impl Iterator<Item = &ScriptTemplate> + '_ {
        self.template_order
            .iter()
            .filter_map(|id| self.templates.get(id))
    }

    /// A loaded property archetype by name.
    pub fn find_property_archetype(&self, name: &str) -> Option<PropertyId> {
        self.archetypes.get(name).copied()
    }

    /// Names of all archetypes listed in the master file.
    pub fn archetype_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.archetype_paths.iter().map(|e| e.name.as_str())
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn state_by_id(&self, id: u32) -> Option<&str> {
        self.states.get(&id).map(String::as_str)
    }

    pub fn state_by_fourcc(&self, id: FourCC) -> Option<&str> {
        self.state_by_id(id.to_u32())
    }

    /// State by position in ID order.
    pub fn state_by_index(&self, index: usize) -> Option<&str> {
        self.states.values().nth(index).map(String::as_str)
    }

    pub fn num_messages(&self) -> usize {
        self.messages.len()
    }

    pub fn message_by_id(&self, id: u32) -> Option<&str> {
        self.messages.get(&id).map(String::as_str)
    }

    pub fn message_by_fourcc(&self, id: FourCC) -> Option<&str> {
        self.message_by_id(id.to_u32())
    }

    /// Message by position in ID order.
    pub fn message_by_index(&self, index: usize) -> Option<&str> {
        self.messages.values().nth(index).map(String::as_str)
    }
}

fn serialize_named_ids<A: Archive>(arc: &mut A, name: &str, map: &mut BTreeMap<u32, String>) -> Result<()> {
    let mut entries: Vec<NamedId> = map
        .iter()
        .map(|(&id, name)| NamedId { id, name: name.clone() })
        .collect();

    arc.list(name, &mut entries, |arc, entry| -> Result<()> {
        arc.required("ID", &mut entry.id, SerialFlags::ATTRIBUTE | SerialFlags::HEX_DISPLAY)?;
        arc.required("Name", &mut entry.name, SerialFlags::ATTRIBUTE)?;
        Ok(())
    })?;

    if arc.is_reader() {
        map.extend(entries.into_iter().map(|e| (e.id, e.name)));
    }
    Ok(())
}
