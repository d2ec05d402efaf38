//! Loading game lists, master files, property archetypes and script
//! templates from the template directory.
//!
//! With the `parallel` feature, template files are read and parsed on the
//! rayon pool; building the property trees stays sequential because every
//! tree goes into the same arena and name map.

use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};

use hashbrown::HashMap as FastHashMap;
use reliquary_archive::{Archive, SerialFlags, XmlElement, XmlReader};
use reliquary_common::Game;
use rustc_hash::FxHasher;
use tracing::{debug, info, warn};

use crate::master::{PathEntry, TemplateEntry};
use crate::property::ArchetypeResolver;
use crate::{Error, MasterTemplate, PropertyArena, PropertyFlags, PropertyId, PropertyNameMap, Result, ScriptTemplate};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// One `<Game ID=".." Path=".."/>` line of the game list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameListEntry {
    pub game: Game,
    /// Master file path relative to the template directory.
    pub path: String,
}

/// Read `GameList.xml`.
pub fn read_game_list(path: &Path) -> Result<Vec<GameListEntry>> {
    let mut reader = XmlReader::open(path)?;
    let mut games = Vec::new();

    while reader.begin_param("Game", SerialFlags::empty())? {
        let mut game = Game::Prime;
        let mut path = String::new();
        reader.required("ID", &mut game, SerialFlags::ATTRIBUTE)?;
        reader.required("Path", &mut path, SerialFlags::ATTRIBUTE)?;
        reader.end_param()?;

        games.push(GameListEntry { game, path });
    }

    debug!(games = games.len(), "read game list");
    Ok(games)
}

/// Whether an error means a file could not be read or parsed, as opposed
/// to a template that is inconsistent.
fn is_unreadable(error: &Error) -> bool {
    matches!(
        error,
        Error::Io(_)
            | Error::Archive(
                reliquary_archive::Error::Io(_)
                    | reliquary_archive::Error::Xml(_)
                    | reliquary_archive::Error::Utf8(_)
            )
    )
}

fn read_document(path: &Path) -> Result<XmlElement> {
    let xml = std::fs::read_to_string(path)?;
    Ok(XmlElement::parse(&xml)?)
}

#[cfg(not(feature = "parallel"))]
fn read_documents(base_dir: &Path, entries: &[TemplateEntry]) -> Vec<Result<XmlElement>> {
    entries
        .iter()
        .map(|entry| read_document(&base_dir.join(&entry.path)))
        .collect()
}

#[cfg(feature = "parallel")]
fn read_documents(base_dir: &Path, entries: &[TemplateEntry]) -> Vec<Result<XmlElement>> {
    entries
        .par_iter()
        .map(|entry| read_document(&base_dir.join(&entry.path)))
        .collect()
}

/// Resolves archetype names against a master file's `Archetypes` list,
/// loading each file on first reference.
///
/// Loaded archetypes are queued and initialized by
/// [`ArchetypeLoader::initialize_pending`], since resolution happens while
/// the name map is borrowed by the template being read.
struct ArchetypeLoader<'a> {
    game: Game,
    base_dir: &'a Path,
    paths: &'a [PathEntry],
    loaded: &'a mut FxHashMap<String, PropertyId>,
    in_progress: Vec<String>,
    pending: Vec<PropertyId>,
}

impl ArchetypeLoader<'_> {
    fn load(&mut self, arena: &mut PropertyArena, name: &str, path: &str) -> Result<PropertyId> {
        debug!(name, path, "loading property archetype");
        let mut reader = XmlReader::open(self.base_dir.join(path))?.with_game(self.game);

        if !reader.begin_param("Property", SerialFlags::empty())? {
            return Err(reliquary_archive::Error::MissingParameter("Property".to_string()).into());
        }
        let id = arena.read_property(&mut reader, self)?;
        reader.end_param()?;

        let node = arena.node_mut(id);
        node.set_flags(PropertyFlags::ARCHETYPE);
        if node.name().is_empty() {
            node.set_name(name);
        }
        arena.set_source_file(id, path);
        Ok(id)
    }

    fn initialize_pending(&mut self, arena: &mut PropertyArena, names: &mut PropertyNameMap) -> Result<()> {
        for id in self.pending.drain(..) {
            arena.initialize(id, None, 0, names)?;
        }
        Ok(())
    }
}

impl ArchetypeResolver for ArchetypeLoader<'_> {
    fn resolve(&mut self, arena: &mut PropertyArena, name: &str) -> Result<Option<PropertyId>> {
        if let Some(&id) = self.loaded.get(name) {
            return Ok(Some(id));
        }
        if self.in_progress.iter().any(|n| n == name) {
            return Err(Error::ArchetypeCycle(name.to_string()));
        }
        let Some(path) = self.paths.iter().find(|e| e.name == name).map(|e| e.path.clone()) else {
            return Ok(None);
        };

        self.in_progress.push(name.to_string());
        let result = self.load(arena, name, &path);
        self.in_progress.pop();

        let id = result?;
        self.loaded.insert(name.to_string(), id);
        self.pending.push(id);
        Ok(Some(id))
    }
}

/// Load a game's master file and every script template it lists.
///
/// Template files that cannot be read or parsed are skipped with a warning
/// and leave the master marked as not fully loaded. Any other error aborts
/// the load.
pub fn load_master(
    arena: &mut PropertyArena,
    names: &mut PropertyNameMap,
    game: Game,
    templates_dir: &Path,
    master_path: &str,
) -> Result<MasterTemplate> {
    let path = templates_dir.join(master_path);
    info!(%game, path = %path.display(), "loading master template");

    let mut master = MasterTemplate::new(game, master_path);
    let mut reader = XmlReader::open(&path)?.with_game(game);
    master.serialize(&mut reader)?;

    let base_dir: PathBuf = path.parent().unwrap_or(templates_dir).to_path_buf();
    let documents = read_documents(&base_dir, &master.template_paths);

    let mut templates = Vec::with_capacity(documents.len());
    let mut fully_loaded = true;
    {
        let mut archetypes = ArchetypeLoader {
            game,
            base_dir: &base_dir,
            paths: &master.archetype_paths,
            loaded: &mut master.archetypes,
            in_progress: Vec::new(),
            pending: Vec::new(),
        };

        for (entry, document) in master.template_paths.iter().zip(documents) {
            let result = document.and_then(|element| {
                let mut reader = XmlReader::from_element(element).with_game(game);
                ScriptTemplate::read(arena, names, &mut reader, entry.id, &entry.path, &mut archetypes)
            });
            archetypes.initialize_pending(arena, names)?;

            match result {
                Ok(template) => templates.push(template),
                Err(e) if is_unreadable(&e) => {
                    warn!(%game, path = %entry.path, error = %e, "failed to load script template");
                    fully_loaded = false;
                }
                Err(e) => return Err(e),
            }
        }
    }

    for template in templates {
        master.insert_template(template);
    }
    master.fully_loaded = fully_loaded;

    if !fully_loaded {
        warn!(%game, "master template is only partially loaded");
    }
    info!(
        %game,
        templates = master.num_script_templates(),
        archetypes = master.archetypes.len(),
        "master template loaded"
    );
    Ok(master)
}
