//! EspBind CLI
//!
//! Command-line interface for quest alias management and script property
//! auto-fill on plugin documents.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use espbind_core::{
    add_reference_alias, attach_script_to_alias, auto_fill_alias_script, auto_fill_all,
    auto_fill_quest_script, auto_fill_quests, find_alias_script_mut, find_quest_script_mut,
    load_plugin, save_plugin, set_alias_property, set_property_from_str, AutoFillOutcome,
    BindError, IndexCache, ProjectConfig, PropertyKind, SCRIPT_EXT,
};

#[derive(Parser)]
#[command(name = "espbind")]
#[command(about = "Quest alias and script property auto-fill tool for plugin documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize an espbind.json project config
    Init {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,

        /// Directory to initialize (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Add a reference alias to a quest
    AddAlias {
        /// Plugin document to edit (default: from espbind.json)
        #[arg(long)]
        plugin: Option<PathBuf>,

        /// Quest editor ID
        #[arg(long)]
        quest: String,

        /// Alias name
        #[arg(long)]
        name: String,

        /// Alias flags
        #[arg(long, default_value = "0")]
        flags: u32,
    },

    /// Attach a script to a quest alias
    AttachScript {
        #[arg(long)]
        plugin: Option<PathBuf>,

        #[arg(long)]
        quest: String,

        /// Alias name
        #[arg(long)]
        alias: String,

        /// Script name
        #[arg(long)]
        script: String,
    },

    /// Set a script property from a string value
    SetProperty {
        #[arg(long)]
        plugin: Option<PathBuf>,

        #[arg(long)]
        quest: String,

        /// Alias name (set the property on an alias script instead of a quest script)
        #[arg(long)]
        alias: Option<String>,

        #[arg(long)]
        script: String,

        /// Property name
        #[arg(long)]
        name: String,

        /// Property value; object kind uses 'Plugin.esp|0xFormID',
        /// alias kind uses the target alias name
        #[arg(long)]
        value: String,

        /// Property kind: object, alias, int, float, bool, string
        #[arg(long)]
        kind: String,
    },

    /// Auto-fill one script's properties from its Papyrus source
    Autofill {
        #[arg(long)]
        plugin: Option<PathBuf>,

        #[arg(long)]
        quest: String,

        /// Alias name (auto-fill an alias script instead of a quest script)
        #[arg(long)]
        alias: Option<String>,

        #[arg(long)]
        script: String,

        /// Papyrus source file (default: <script-dir>/<script>.psc)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Directory containing Papyrus sources (default: from espbind.json)
        #[arg(long)]
        script_dir: Option<PathBuf>,

        /// Game data folder (default: from espbind.json)
        #[arg(long)]
        data_folder: Option<PathBuf>,
    },

    /// Auto-fill every script attachment in the plugin
    AutofillAll {
        #[arg(long)]
        plugin: Option<PathBuf>,

        #[arg(long)]
        script_dir: Option<PathBuf>,

        #[arg(long)]
        data_folder: Option<PathBuf>,

        /// Restrict the run to these quest editor IDs (repeatable)
        #[arg(long)]
        quest: Vec<String>,
    },

    /// Build the record index once and report cache state
    CacheStats {
        #[arg(long)]
        data_folder: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        report_error(&err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ProjectConfig::load_from_dir(Path::new(".")).unwrap_or_default();

    match cli.command {
        Commands::Init { name, path } => cmd_init(name, path),
        Commands::AddAlias {
            plugin,
            quest,
            name,
            flags,
        } => cmd_add_alias(plugin_path(plugin, &config)?, &quest, &name, flags),
        Commands::AttachScript {
            plugin,
            quest,
            alias,
            script,
        } => cmd_attach_script(plugin_path(plugin, &config)?, &quest, &alias, &script),
        Commands::SetProperty {
            plugin,
            quest,
            alias,
            script,
            name,
            value,
            kind,
        } => cmd_set_property(
            plugin_path(plugin, &config)?,
            &quest,
            alias.as_deref(),
            &script,
            &name,
            &value,
            &kind,
        ),
        Commands::Autofill {
            plugin,
            quest,
            alias,
            script,
            source,
            script_dir,
            data_folder,
        } => cmd_autofill(
            plugin_path(plugin, &config)?,
            &quest,
            alias.as_deref(),
            &script,
            source,
            script_dir_path(script_dir, &config),
            data_folder_path(data_folder, &config)?,
        ),
        Commands::AutofillAll {
            plugin,
            script_dir,
            data_folder,
            quest,
        } => cmd_autofill_all(
            plugin_path(plugin, &config)?,
            script_dir_path(script_dir, &config),
            data_folder_path(data_folder, &config)?,
            quest,
        ),
        Commands::CacheStats { data_folder } => {
            cmd_cache_stats(data_folder_path(data_folder, &config)?)
        }
    }
}

/// Print an error with any context and remediation suggestions it carries.
fn report_error(err: &anyhow::Error) {
    eprintln!("Error: {err}");
    if let Some(bind) = err.downcast_ref::<BindError>() {
        if let Some(context) = bind.context() {
            eprintln!("  {context}");
        }
        let suggestions = bind.suggestions();
        if !suggestions.is_empty() {
            eprintln!("Try:");
            for suggestion in suggestions {
                eprintln!("  - {suggestion}");
            }
        }
    }
}

fn plugin_path(flag: Option<PathBuf>, config: &Option<ProjectConfig>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(config) = config {
        return Ok(config.plugin.clone());
    }
    bail!("No plugin document given. Use --plugin or create espbind.json with 'espbind init'.")
}

fn script_dir_path(flag: Option<PathBuf>, config: &Option<ProjectConfig>) -> PathBuf {
    flag.or_else(|| config.as_ref().map(|c| c.script_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("./scripts"))
}

fn data_folder_path(flag: Option<PathBuf>, config: &Option<ProjectConfig>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = config.as_ref().and_then(|c| c.data_folder.clone()) {
        return Ok(path);
    }
    bail!("No game data folder given. Use --data-folder or set dataFolder in espbind.json.")
}

fn parse_kind(kind: &str) -> Result<PropertyKind> {
    match kind.to_lowercase().as_str() {
        "object" => Ok(PropertyKind::Object),
        "int" => Ok(PropertyKind::Int),
        "float" => Ok(PropertyKind::Float),
        "bool" => Ok(PropertyKind::Bool),
        "string" => Ok(PropertyKind::String),
        other => bail!("Unsupported property kind '{other}' (expected object, alias, int, float, bool or string)"),
    }
}

fn cmd_init(name: Option<String>, path: Option<PathBuf>) -> Result<()> {
    let project_dir = path.unwrap_or_else(|| PathBuf::from("."));
    let project_name = name.unwrap_or_else(|| {
        project_dir
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_else(|| "MyMod".to_string())
    });

    std::fs::create_dir_all(&project_dir).context("Failed to create project directory")?;
    std::fs::create_dir_all(project_dir.join("scripts"))
        .context("Failed to create scripts directory")?;

    let config = ProjectConfig {
        name: project_name.clone(),
        ..Default::default()
    };
    let config_path = config.save_to_dir(&project_dir)?;

    println!("Initialized EspBind project '{project_name}'");
    println!("  {}  - project configuration", config_path.display());
    println!("  scripts/      - Papyrus source files (.psc)");
    println!("\nNext steps:");
    println!("  1. Set dataFolder in espbind.json to your game Data folder");
    println!("  2. Point plugin at your plugin document");
    println!("  3. Run: espbind autofill-all");
    Ok(())
}

fn cmd_add_alias(plugin_path: PathBuf, quest: &str, name: &str, flags: u32) -> Result<()> {
    let mut plugin = load_plugin(&plugin_path)?;
    let alias = add_reference_alias(&mut plugin, quest, name, flags)?;
    save_plugin(&plugin, &plugin_path)?;
    println!("Added alias '{}' (ID: {}) to quest '{quest}'", alias.name, alias.id);
    Ok(())
}

fn cmd_attach_script(plugin_path: PathBuf, quest: &str, alias: &str, script: &str) -> Result<()> {
    let mut plugin = load_plugin(&plugin_path)?;
    attach_script_to_alias(&mut plugin, quest, alias, script)?;
    save_plugin(&plugin, &plugin_path)?;
    println!("Attached script '{script}' to alias '{alias}' on quest '{quest}'");
    Ok(())
}

fn cmd_set_property(
    plugin_path: PathBuf,
    quest_id: &str,
    alias: Option<&str>,
    script_name: &str,
    name: &str,
    value: &str,
    kind: &str,
) -> Result<()> {
    let mut plugin = load_plugin(&plugin_path)?;
    let plugin_name = plugin.name.clone();

    let quest_snapshot = plugin
        .quest(quest_id)
        .ok_or_else(|| BindError::config(format!("Quest not found: {quest_id}")))?
        .clone();

    let quest = plugin
        .quest_mut(quest_id)
        .ok_or_else(|| BindError::config(format!("Quest not found: {quest_id}")))?;

    let script = match alias {
        Some(alias_name) => find_alias_script_mut(quest, alias_name, script_name).ok_or_else(|| {
            BindError::config(format!(
                "Script '{script_name}' not attached to alias '{alias_name}' on quest '{quest_id}'"
            ))
        })?,
        None => find_quest_script_mut(quest, script_name).ok_or_else(|| {
            BindError::config(format!(
                "Script '{script_name}' not attached to quest '{quest_id}'"
            ))
        })?,
    };

    // The alias kind references an alias slot; everything else is parsed
    // from the raw string per its declared kind.
    if kind.eq_ignore_ascii_case("alias") {
        set_alias_property(script, name, &quest_snapshot, &plugin_name, value)?;
    } else {
        set_property_from_str(script, name, value, parse_kind(kind)?)?;
    }

    save_plugin(&plugin, &plugin_path)?;
    println!("Set {kind} property '{name}' = '{value}' on script '{script_name}'");
    Ok(())
}

fn cmd_autofill(
    plugin_path: PathBuf,
    quest: &str,
    alias: Option<&str>,
    script: &str,
    source: Option<PathBuf>,
    script_dir: PathBuf,
    data_folder: PathBuf,
) -> Result<()> {
    let mut plugin = load_plugin(&plugin_path)?;
    let source = source.unwrap_or_else(|| script_dir.join(format!("{script}.{SCRIPT_EXT}")));
    tracing::info!("Auto-filling '{script}' from {}", source.display());
    let cache = IndexCache::new();

    let outcome = match alias {
        Some(alias_name) => auto_fill_alias_script(
            &mut plugin,
            quest,
            alias_name,
            script,
            &source,
            &cache,
            &data_folder,
        )?,
        None => auto_fill_quest_script(&mut plugin, quest, script, &source, &cache, &data_folder)?,
    };

    save_plugin(&plugin, &plugin_path)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &AutoFillOutcome) {
    println!(
        "Auto-fill for '{}': {} of {} properties filled",
        outcome.script_name,
        outcome.filled_count(),
        outcome.total
    );
    if !outcome.filled.is_empty() {
        println!("  Filled:    {}", outcome.filled.join(", "));
    }
    if !outcome.skipped.is_empty() {
        println!("  Skipped:   {}", outcome.skipped.join(", "));
    }
    if !outcome.not_found.is_empty() {
        println!("  Not found: {}", outcome.not_found.join(", "));
    }
}

fn cmd_autofill_all(
    plugin_path: PathBuf,
    script_dir: PathBuf,
    data_folder: PathBuf,
    quests: Vec<String>,
) -> Result<()> {
    let mut plugin = load_plugin(&plugin_path)?;
    tracing::info!("Starting bulk auto-fill for {}", plugin.name);
    let cache = IndexCache::new();

    let outcome = if quests.is_empty() {
        auto_fill_all(&mut plugin, &script_dir, &data_folder, &cache)?
    } else {
        auto_fill_quests(&mut plugin, &quests, &script_dir, &data_folder, &cache)?
    };

    save_plugin(&plugin, &plugin_path)?;

    println!(
        "Bulk auto-fill: {} of {} scripts filled ({} properties, {} skipped)",
        outcome.filled_scripts,
        outcome.total_scripts,
        outcome.properties_filled,
        outcome.skipped_scripts
    );
    for detail in &outcome.details {
        println!("  {detail}");
    }
    if !outcome.errors.is_empty() {
        println!("Errors:");
        for error in &outcome.errors {
            println!("  {error}");
        }
    }
    Ok(())
}

fn cmd_cache_stats(data_folder: PathBuf) -> Result<()> {
    let cache = IndexCache::new();
    let index = cache.get_or_build(&data_folder, true, false)?;
    let stats = cache.stats();

    println!("Record index for {}:", data_folder.display());
    println!("  Master files: {}", index.plugin_count());
    println!("  Cached:       {}", stats.cached);
    println!("  Age:          {:.1}s", stats.age.as_secs_f64());
    println!("  Expired:      {}", stats.expired);
    Ok(())
}
