//! Placement CLI
//!
//! mapgrouppos.xml → loot container placements (JSON)
//! interactive authoring of new anchor definitions

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use placement_core::{
    load_registry, render_registry_entry, AuthoringSession, OutputFormat, PlacementConfig,
};
#[cfg(feature = "cli")]
use std::io::{BufRead, Write};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "placement")]
#[command(about = "Re-anchor loot containers onto relocated map buildings", long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (YAML); falls back to $PLACEMENT_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// `{...},` per record
    Fragments,
    /// A complete JSON array
    Array,
    /// One object per line
    Lines,
}

#[cfg(feature = "cli")]
impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Fragments => OutputFormat::Fragments,
            Format::Array => OutputFormat::Array,
            Format::Lines => OutputFormat::Lines,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Re-anchor containers for every known building in a scene file
    Process {
        /// Input mapgrouppos.xml path
        #[arg(long)]
        r#in: PathBuf,

        /// Output file path
        #[arg(long)]
        out: PathBuf,

        /// Anchor table (YAML) replacing the embedded one
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Output layout
        #[arg(long, value_enum, default_value = "fragments")]
        format: Format,

        /// Append to the output file instead of truncating it
        #[arg(long, default_value = "false")]
        append: bool,

        /// Re-hash the output after writing
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Author a new anchor definition interactively
    Author {
        /// Append the YAML entry to this anchor table instead of printing it
        #[arg(long)]
        append_to: Option<PathBuf>,
    },

    /// List anchor types in the registry
    Anchors {
        /// Anchor table (YAML) replacing the embedded one
        #[arg(long)]
        registry: Option<PathBuf>,
    },

    /// Show the loot table a container type resolves to
    Classify {
        /// Container config type, with or without the placement suffix
        name: String,
    },
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PlacementConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Commands::Process {
            r#in,
            out,
            registry,
            format,
            append,
            verify,
            metadata,
        } => {
            println!("🔨 Re-anchoring containers...");
            println!("   Scene:  {}", r#in.display());
            println!("   Output: {}", out.display());

            let options = placement_cli::RunOptions {
                scene: r#in,
                output: out,
                format: format.into(),
                append,
                registry,
            };
            let meta = placement_cli::run_batch(&options, &config)?;

            print_metadata(&meta);

            if verify {
                verify_output(&options.output, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                placement_cli::save_metadata(&metadata_path, &meta)?;
                println!("\n📄 Metadata saved to: {}", metadata_path.display());
            }
        }

        Commands::Author { append_to } => {
            let entry = author_interactive()?;
            match append_to {
                Some(path) => {
                    placement_cli::append_registry_entry(&path, &entry)?;
                    println!("\n✅ Anchor appended to: {}", path.display());
                }
                None => {
                    println!("\n{entry}");
                }
            }
        }

        Commands::Anchors { registry } => {
            let registry_path = registry.as_deref().or(config.registry_path.as_deref());
            let registry = load_registry(registry_path)?;
            for anchor in registry.iter() {
                println!("{:<40} {:>3} items", anchor.type_id, anchor.item_count());
            }
            println!("\n{} anchor types", registry.len());
        }

        Commands::Classify { name } => {
            let resolver = config.loot_table_resolver();
            let container = resolver.container_name(&name);
            let table = resolver.loot_table(&container);
            println!("{container} → {table}");
            if resolver.is_unclassified(table) {
                println!("   (no mapping; needs manual classification)");
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &placement_cli::RunMetadata) {
    let stats = &meta.stats;
    println!("\n✅ Batch complete!");
    println!("   Registry:      {}", meta.registry);
    println!("   Groups read:   {}", stats.groups_read);
    println!("   Matched:       {}", stats.anchors_matched);
    println!("   Unknown:       {}", stats.unknown_anchors);
    println!("   Malformed:     {}", stats.malformed_records);
    println!("   Records:       {}", stats.records_emitted);
    println!("   Unclassified:  {}", stats.unclassified_items);
    println!("   Checksum:      {}", meta.checksum);
    println!("   Created:       {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn verify_output(path: &Path, checksum: &str) -> Result<()> {
    println!("\n🔍 Verifying output integrity...");
    if placement_cli::verify_output(path, checksum)? {
        println!("✅ Output verification passed");
        Ok(())
    } else {
        anyhow::bail!("❌ Output verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn author_interactive() -> Result<String> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = std::io::stdout();
    let mut session = AuthoringSession::new();

    while let Some(prompt) = session.next_prompt() {
        print!("{}", prompt.text());
        stdout.flush()?;

        let Some(line) = lines.next() else {
            anyhow::bail!("Input closed before the anchor definition was complete");
        };
        if let Err(e) = session.answer(&line?) {
            eprintln!("   ⚠️  {e}");
        }
    }

    let definition = session.finish()?;
    Ok(render_registry_entry(&definition)?)
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("placement CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
