//! Placement batch driver
//!
//! mapgrouppos.xml → re-anchored loot containers → JSON output file
//! plus optional run metadata (stats, SHA256 checksum, timestamp).

use anyhow::{Context, Result};
use placement_core::{
    load_registry, sink_for, BatchProcessor, BatchStats, OutputFormat, PlacementConfig,
    RegistrySource, SceneDocument,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Options for one batch run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scene: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    /// Keep existing output content instead of truncating
    pub append: bool,
    /// Overrides `registry_path` from the config
    pub registry: Option<PathBuf>,
}

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Scene document that was processed
    pub scene: String,
    /// Output file
    pub output: String,
    /// Anchor table used: "embedded" or a file path
    pub registry: String,
    pub stats: BatchStats,
    /// SHA256 of the output file (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
}

/// Process one scene document into the output file.
pub fn run_batch(options: &RunOptions, config: &PlacementConfig) -> Result<RunMetadata> {
    // 1. Registry (flag > config > env > embedded)
    let registry_path = options.registry.as_deref().or(config.registry_path.as_deref());
    let registry = load_registry(registry_path).context("Failed to load anchor registry")?;
    tracing::debug!(anchors = registry.len(), "registry ready");

    // 2. Scene document
    let document = SceneDocument::from_path(&options.scene)
        .with_context(|| format!("Failed to read scene: {}", options.scene.display()))?;
    tracing::info!(scene = %options.scene.display(), groups = document.len(), "scene loaded");

    // 3. Output file (truncate unless appending)
    if let Some(parent) = options.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(options.append)
        .truncate(!options.append)
        .open(&options.output)
        .with_context(|| format!("Failed to open output file: {}", options.output.display()))?;
    tracing::debug!(
        output = %options.output.display(),
        format = ?options.format,
        append = options.append,
        "output opened"
    );

    // 4. Batch
    let resolver = config.loot_table_resolver();
    let processor = BatchProcessor::new(&registry, &resolver)
        .with_settings(config.container.clone())
        .with_parallel(config.parallel);

    let stats = {
        let mut sink = sink_for(options.format, BufWriter::new(file));
        processor
            .run(&document, sink.as_mut())
            .with_context(|| format!("Batch failed writing: {}", options.output.display()))?
    };

    // 5. Metadata
    let checksum = checksum_file(&options.output)?;
    Ok(RunMetadata {
        scene: options.scene.display().to_string(),
        output: options.output.display().to_string(),
        registry: match registry.source() {
            RegistrySource::Embedded => "embedded".to_string(),
            RegistrySource::File(path) => path.display().to_string(),
        },
        stats,
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
    })
}

/// SHA256 (hex) of a file
pub fn checksum_file(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Check an output file against a recorded checksum.
pub fn verify_output(path: &Path, expected_checksum: &str) -> Result<bool> {
    Ok(checksum_file(path)? == expected_checksum)
}

/// Append a rendered registry entry to an anchor table file.
///
/// Starts on a fresh line when the table does not end with a newline.
pub fn append_registry_entry(path: &Path, entry: &str) -> Result<()> {
    let existing =
        fs::read(path).with_context(|| format!("Failed to open anchor table: {}", path.display()))?;
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open anchor table: {}", path.display()))?;

    if existing.last().is_some_and(|b| *b != b'\n') {
        file.write_all(b"\n")
            .with_context(|| format!("Failed to append to: {}", path.display()))?;
    }
    file.write_all(entry.as_bytes())
        .with_context(|| format!("Failed to append to: {}", path.display()))?;
    tracing::info!(path = %path.display(), "anchor entry appended");
    Ok(())
}

pub fn save_metadata(path: &Path, meta: &RunMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write metadata: {}", path.display()))?;
    Ok(())
}
