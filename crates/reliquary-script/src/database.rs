//! Template database: every game's master template, the property arena
//! they share and the property name map.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use reliquary_common::Game;
use tracing::{debug, info};

use crate::loader::{self, GameListEntry};
use crate::{Error, MasterTemplate, NameMapConfig, PropertyArena, PropertyNameMap, Result};

/// Where the template data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Root data directory; templates live in `templates/` below it.
    pub data_dir: PathBuf,
    pub name_map: NameMapConfig,
}

impl DatabaseConfig {
    /// Default layout under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            name_map: NameMapConfig::in_data_dir(&data_dir),
            data_dir,
        }
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.data_dir.join("templates")
    }

    pub fn game_list_path(&self) -> PathBuf {
        self.templates_dir().join("GameList.xml")
    }
}

/// All templates known to the editor.
///
/// Master templates are loaded on first request. Property trees of every
/// game live in one [`PropertyArena`], named through one
/// [`PropertyNameMap`].
#[derive(Debug)]
pub struct TemplateDatabase {
    config: DatabaseConfig,
    arena: PropertyArena,
    names: PropertyNameMap,
    game_list: Vec<GameListEntry>,
    masters: BTreeMap<Game, MasterTemplate>,
}

impl TemplateDatabase {
    /// Read the game list. No master template is loaded yet.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        let game_list = loader::read_game_list(&config.game_list_path())?;
        info!(
            data_dir = %config.data_dir.display(),
            games = game_list.len(),
            "opened template database"
        );

        Ok(Self {
            names: PropertyNameMap::new(config.name_map.clone()),
            config,
            arena: PropertyArena::new(),
            game_list,
            masters: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Games listed in the game list, in list order.
    pub fn games(&self) -> impl Iterator<Item = Game> + '_ {
        self.game_list.iter().map(|entry| entry.game)
    }

    pub fn game_list(&self) -> &[GameListEntry] {
        &self.game_list
    }

    pub fn is_game_loaded(&self, game: Game) -> bool {
        self.masters.contains_key(&game)
    }

    /// Load a game's master template if it is not loaded yet.
    pub fn load_game(&mut self, game: Game) -> Result<()> {
        if self.masters.contains_key(&game) {
            return Ok(());
        }

        let entry = self
            .game_list
            .iter()
            .find(|entry| entry.game == game)
            .ok_or(Error::GameNotListed(game))?;

        let master = loader::load_master(
            &mut self.arena,
            &mut self.names,
            game,
            &self.config.templates_dir(),
            &entry.path,
        )?;
        self.masters.insert(game, master);
        Ok(())
    }

    /// A game's master template, loading it on first request.
    pub fn master(&mut self, game: Game) -> Result<&MasterTemplate> {
        self.load_game(game)?;
        self.masters.get(&game).ok_or(Error::GameNotListed(game))
    }

    /// An already loaded master template.
    pub fn loaded_master(&self, game: Game) -> Option<&MasterTemplate> {
        self.masters.get(&game)
    }

    /// Load every listed game, calling `progress` before each one.
    pub fn load_all_games(&mut self, mut progress: impl FnMut(Game)) -> Result<()> {
        let games: Vec<Game> = self.games().collect();
        for game in games {
            progress(game);
            self.load_game(game)?;
        }
        Ok(())
    }

    /// Loaded master templates in game order.
    pub fn master_list(&self) -> impl Iterator<Item = &MasterTemplate> + '_ {
        self.masters.values()
    }

    #[inline]
    pub fn arena(&self) -> &PropertyArena {
        &self.arena
    }

    #[inline]
    pub fn arena_mut(&mut self) -> &mut PropertyArena {
        &mut self.arena
    }

    #[inline]
    pub fn names(&self) -> &PropertyNameMap {
        &self.names
    }

    #[inline]
    pub fn names_mut(&mut self) -> &mut PropertyNameMap {
        &mut self.names
    }

    /// Arena and name map together, for operations that need both.
    pub fn parts_mut(&mut self) -> (&mut PropertyArena, &mut PropertyNameMap) {
        (&mut self.arena, &mut self.names)
    }

    /// Save the property name map.
    ///
    /// Saving the typed map drops entries with no live properties, so every
    /// game is loaded first.
    pub fn save_property_map(&mut self, force: bool) -> Result<()> {
        if !self.config.name_map.use_legacy_for_updates {
            self.load_all_games(|game| debug!(%game, "loading game before saving property map"))?;
        }
        self.names.save(force)
    }

    /// Save pending name map changes and unload everything.
    pub fn shutdown(&mut self) -> Result<()> {
        self.names.shutdown()?;
        self.masters.clear();
        self.arena = PropertyArena::new();
        info!("template database shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, path: &str, contents: &str) {
        let path = dir.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "templates/GameList.xml",
            r#"<GameList>
                <Game ID="Prime" Path="MP1/Game.xml"/>
                <Game ID="Echoes" Path="MP2/Game.xml"/>
            </GameList>"#,
        );
        write(
            root,
            "templates/MP1/Game.xml",
            r#"<Game Name="Metroid Prime"><Templates><Element ID="0x08" Path="Script/Door.xml"/></Templates></Game>"#,
        );
        write(
            root,
            "templates/MP1/Script/Door.xml",
            r#"<ScriptObject><Name>Door</Name><Properties Type="Struct"><SubProperties>
                 <Element Type="Float" ID="0x00"><Name>Open Time</Name></Element>
               </SubProperties></Properties></ScriptObject>"#,
        );
        write(
            root,
            "templates/MP2/Game.xml",
            r#"<Game Name="Metroid Prime 2"><Templates><Element ID="0x444F4F52" Path="Script/Door.xml"/></Templates></Game>"#,
        );
        write(
            root,
            "templates/MP2/Script/Door.xml",
            r#"<ScriptObject><Name>Door</Name><Properties Type="Struct"><SubProperties>
                 <Element Type="Int" ID="0x00000041"/>
                 <Element Type="Float" ID="0x00000042"/>
               </SubProperties></Properties></ScriptObject>"#,
        );
        write(
            root,
            "templates/PropertyMap.xml",
            r#"<PropertyMap>
                <Element><Key ID="0x00000041" Type="int"/><Value Name="Health"/></Element>
                <Element><Key ID="0x00000099" Type="int"/><Value Name="Stale"/></Element>
            </PropertyMap>"#,
        );
        dir
    }

    #[test]
    fn test_games_load_on_demand() {
        let dir = fixture();
        let mut db = TemplateDatabase::open(DatabaseConfig::new(dir.path())).unwrap();
        assert_eq!(db.games().collect::<Vec<_>>(), [Game::Prime, Game::Echoes]);
        assert!(!db.is_game_loaded(Game::Echoes));

        let master = db.master(Game::Echoes).unwrap();
        assert_eq!(master.game_name(), "Metroid Prime 2");
        assert!(master.is_loaded_successfully());
        let root = master.template_by_id(0x444F4F52).unwrap().properties().unwrap();

        let health = db.arena().child_by_id(root, 0x41).unwrap();
        assert_eq!(db.arena().node(health).name(), "Health");
        assert_eq!(db.master_list().count(), 1);

        assert!(matches!(db.master(Game::Corruption), Err(Error::GameNotListed(Game::Corruption))));
    }

    #[test]
    fn test_load_all_games_reports_progress() {
        let dir = fixture();
        let mut db = TemplateDatabase::open(DatabaseConfig::new(dir.path())).unwrap();

        let mut seen = Vec::new();
        db.load_all_games(|game| seen.push(game)).unwrap();
        assert_eq!(seen, [Game::Prime, Game::Echoes]);

        let door = db.loaded_master(Game::Prime).unwrap().template_by_id(0x08).unwrap();
        let open_time = db.arena().child_by_id(door.properties().unwrap(), 0x00).unwrap();
        assert_eq!(db.arena().node(open_time).name(), "Open Time");
    }

    #[test]
    fn test_save_property_map_loads_everything_first() {
        let dir = fixture();
        let config = DatabaseConfig::new(dir.path());
        let mut db = TemplateDatabase::open(config.clone()).unwrap();

        let (arena, names) = db.parts_mut();
        assert!(!names.set_property_name(arena, 0x42, "float", "Speed"));
        db.save_property_map(true).unwrap();
        assert_eq!(db.master_list().count(), 2);

        let (arena, names) = db.parts_mut();
        assert!(names.set_property_name(arena, 0x42, "float", "Speed"));
        db.shutdown().unwrap();

        let mut reloaded = PropertyNameMap::new(config.name_map);
        reloaded.ensure_loaded().unwrap();
        assert_eq!(reloaded.property_name_by_id(0x41, "int"), "Health");
        assert_eq!(reloaded.property_name_by_id(0x42, "float"), "Speed");
        assert_eq!(reloaded.property_name_by_id(0x99, "int"), "Unknown");
    }
}
