//! Reliquary CLI - Command-line tool for script object property templates.
//!
//! This is the main entry point for the Reliquary command-line application.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tracing_subscriber::EnvFilter;

use reliquary::prelude::*;
use reliquary::script::PropertySummary;

/// Reliquary - script object template tool
#[derive(Parser)]
#[command(name = "reliquary")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data directory containing `templates/`
    #[arg(short, long, global = true, env = "RELIQUARY_DATA_DIR", default_value = "resources")]
    data_dir: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the games in the game list
    Games,

    /// List a game's script templates
    Templates {
        /// Game identifier (e.g. Prime, Echoes, Corruption)
        #[arg(short, long)]
        game: Game,

        /// Only show templates whose name matches this regex
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Print a template's property tree
    Tree {
        #[arg(short, long)]
        game: Game,

        /// Template object ID (`DOOR`, `0x08`) or name
        template: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve an ID string within a template
    Lookup {
        #[arg(short, long)]
        game: Game,

        /// Template object ID or name
        template: String,

        /// Colon-separated property ID path, e.g. `0x5846524D:00`
        id_string: String,
    },

    /// Dump the property name map
    Names {
        /// Only list entries whose name does not hash to their ID
        #[arg(long)]
        invalid: bool,

        /// Only list entries whose type name matches this glob pattern
        #[arg(short = 't', long = "type")]
        type_pattern: Option<String>,
    },

    /// Rename a property in the name map and save it
    Rename {
        /// Property ID (hex)
        id: String,

        /// Hashable type name (e.g. `int`, `HealthInfo`)
        type_name: String,

        /// New property name
        name: String,
    },

    /// Cook a template's default values and print them as hex
    Cook {
        #[arg(short, long)]
        game: Game,

        /// Template object ID or name
        template: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = DatabaseConfig::new(&cli.data_dir);
    let mut db = TemplateDatabase::open(config)
        .with_context(|| format!("Failed to open template database in {}", cli.data_dir.display()))?;

    match cli.command {
        Commands::Games => cmd_games(&db),
        Commands::Templates { game, filter } => cmd_templates(&mut db, game, filter.as_deref()),
        Commands::Tree { game, template, json } => cmd_tree(&mut db, game, &template, json),
        Commands::Lookup { game, template, id_string } => cmd_lookup(&mut db, game, &template, &id_string),
        Commands::Names { invalid, type_pattern } => cmd_names(&mut db, invalid, type_pattern.as_deref()),
        Commands::Rename { id, type_name, name } => cmd_rename(&mut db, &id, &type_name, &name),
        Commands::Cook { game, template } => cmd_cook(&mut db, game, &template),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_games(db: &TemplateDatabase) -> Result<()> {
    for entry in db.game_list() {
        println!("{:<16} {}", entry.game.to_string(), entry.path);
    }
    println!("\nTotal: {} games", db.game_list().len());
    Ok(())
}

fn cmd_templates(db: &mut TemplateDatabase, game: Game, filter: Option<&str>) -> Result<()> {
    let filter = filter
        .map(Regex::new)
        .transpose()
        .context("Invalid filter regex")?;

    let master = db
        .master(game)
        .with_context(|| format!("Failed to load templates for {game}"))?;

    let mut count = 0;
    for template in master.templates() {
        if let Some(filter) = &filter {
            if !filter.is_match(template.name()) {
                continue;
            }
        }

        println!(
            "0x{:08X} {:>6} {}",
            template.object_id(),
            object_label(game, template.object_id()),
            template.name()
        );
        count += 1;
    }

    println!("\nTotal: {} templates", count);
    if !master.is_loaded_successfully() {
        eprintln!("Warning: some templates for {game} failed to load");
    }
    Ok(())
}

fn cmd_tree(db: &mut TemplateDatabase, game: Game, template: &str, json: bool) -> Result<()> {
    let root = template_root(db, game, template)?;
    let summary = db.arena().summarize(root);

    if json {
        println!("{}", summary.to_json().context("Failed to render JSON")?);
    } else {
        print_summary(&summary, 0);
        println!("\nTotal: {} properties", summary.count());
    }
    Ok(())
}

fn cmd_lookup(db: &mut TemplateDatabase, game: Game, template: &str, id_string: &str) -> Result<()> {
    let root = template_root(db, game, template)?;
    let arena = db.arena();

    let property = arena
        .child_by_id_string(root, id_string)
        .context("Invalid ID string")?
        .with_context(|| format!("No property at {id_string} in {template}"))?;

    let node = arena.node(property);
    println!("ID string:  {}", arena.id_string(property));
    println!("Name:       {}", node.name());
    println!("Type:       {}", node.property_type());
    println!("Type name:  {}", arena.hashable_type_name(property));
    println!("Offset:     {}", node.offset());
    println!("Size:       {}", arena.data_size(property));
    if let Some(value) = node.default_value() {
        println!("Default:    {}", value);
    }
    println!("Name valid: {}", arena.check_name(property));
    if let Some(file) = arena.template_file_name(property) {
        println!("Defined in: {}", file);
    }
    Ok(())
}

fn cmd_names(db: &mut TemplateDatabase, invalid: bool, type_pattern: Option<&str>) -> Result<()> {
    let pattern = type_pattern
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid type pattern")?;

    load_all_games(db)?;

    let mut count = 0;
    for entry in db.names().iter() {
        if invalid && entry.is_valid {
            continue;
        }
        if let Some(pattern) = &pattern {
            if !pattern.matches(entry.type_name) {
                continue;
            }
        }

        println!(
            "0x{:08X} {:<20} {:<32} {}{}",
            entry.id,
            entry.type_name,
            entry.name,
            entry.live_properties,
            if entry.is_valid { "" } else { " (invalid)" }
        );
        count += 1;
    }

    println!("\nTotal: {} entries", count);
    Ok(())
}

fn cmd_rename(db: &mut TemplateDatabase, id: &str, type_name: &str, name: &str) -> Result<()> {
    let id = parse_hex(id).with_context(|| format!("Invalid property ID: {id}"))?;

    load_all_games(db)?;

    let (arena, names) = db.parts_mut();
    let previous = names.property_name_by_id(id, type_name).to_string();
    if !names.set_property_name(arena, id, type_name, name) {
        anyhow::bail!("No change: 0x{id:08X} ({type_name}) is unknown or already named {name:?}");
    }

    let updated = names.properties_with_id(id, type_name).len();
    db.save_property_map(false).context("Failed to save property map")?;

    println!("Renamed 0x{id:08X} ({type_name}): {previous} -> {name} ({updated} properties)");
    Ok(())
}

fn cmd_cook(db: &mut TemplateDatabase, game: Game, template: &str) -> Result<()> {
    let root = template_root(db, game, template)?;
    let arena = db.arena();

    let data = arena.initialize_data(root).context("Failed to build default values")?;
    let cooked = cook_object(arena, root, &data).context("Failed to cook template")?;

    for line in cooked.chunks(16) {
        let hex: Vec<String> = line.iter().map(|b| format!("{b:02X}")).collect();
        println!("{}", hex.join(" "));
    }
    println!("\nTotal: {} bytes", cooked.len());
    Ok(())
}

/// Load every game, showing progress.
fn load_all_games(db: &mut TemplateDatabase) -> Result<()> {
    let total = db.game_list().len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut loaded = 0;
    db.load_all_games(|game| {
        pb.set_position(loaded);
        pb.set_message(game.to_string());
        loaded += 1;
    })
    .context("Failed to load templates")?;

    pb.finish_and_clear();
    tracing::info!(games = total, elapsed = ?start.elapsed(), "loaded all games");
    Ok(())
}

/// Root property of a template given by object ID or name.
fn template_root(db: &mut TemplateDatabase, game: Game, template: &str) -> Result<PropertyId> {
    let master = db
        .master(game)
        .with_context(|| format!("Failed to load templates for {game}"))?;

    let by_id = template
        .parse::<FourCC>()
        .ok()
        .and_then(|id| master.template_by_fourcc(id));
    let found = by_id.or_else(|| {
        master
            .templates()
            .find(|t| t.name().eq_ignore_ascii_case(template))
    });

    found
        .with_context(|| format!("No template {template:?} for {game}"))?
        .properties()
        .with_context(|| format!("Template {template:?} has no properties"))
}

fn parse_hex(text: &str) -> Option<u32> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    u32::from_str_radix(digits, 16).ok()
}

/// Object IDs are four-character codes from Echoes on.
fn object_label(game: Game, id: u32) -> String {
    let fourcc = FourCC::from_u32(id);
    if game > Game::Prime && fourcc.is_printable() {
        fourcc.to_string()
    } else {
        String::new()
    }
}

fn print_summary(summary: &PropertySummary, depth: usize) {
    let label = if summary.id_string.is_empty() {
        "<root>".to_string()
    } else {
        summary.id_string.clone()
    };

    print!(
        "{:indent$}{} {} [{}] @{} ({} bytes)",
        "",
        label,
        summary.name,
        summary.property_type,
        summary.offset,
        summary.size,
        indent = depth * 2
    );
    if let Some(archetype) = &summary.archetype {
        print!(" : {}", archetype);
    }
    if let Some(value) = &summary.default_value {
        print!(" = {}", value);
    }
    if !summary.accurate_name {
        print!(" (unverified name)");
    }
    println!();

    for child in &summary.children {
        print_summary(child, depth + 1);
    }
}
