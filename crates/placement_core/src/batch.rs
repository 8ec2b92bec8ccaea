//! Batch processing
//!
//! scene records → registry lookup → reanchor each item → classify → output.
//!
//! Output order follows scene record order, then each anchor's item order.
//! Records whose type id is not in the registry produce nothing.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{AnchorRegistry, LootTableResolver};
use crate::engine::AnchorMove;
use crate::error::Result;
use crate::models::{AnchorDefinition, ContainerSettings, OutputRecord};
use crate::scene::{SceneDocument, SceneRecord};
use crate::sink::RecordSink;

/// Counters for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub groups_read: usize,
    pub anchors_matched: usize,
    pub unknown_anchors: usize,
    pub malformed_records: usize,
    pub records_emitted: usize,
    pub unclassified_items: usize,
}

pub struct BatchProcessor<'a> {
    registry: &'a AnchorRegistry,
    loot_tables: &'a LootTableResolver,
    settings: ContainerSettings,
    parallel: bool,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(registry: &'a AnchorRegistry, loot_tables: &'a LootTableResolver) -> Self {
        Self {
            registry,
            loot_tables,
            settings: ContainerSettings::default(),
            parallel: false,
        }
    }

    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn expand(&self, anchor: &AnchorDefinition, record: &SceneRecord) -> Vec<OutputRecord> {
        let mv = AnchorMove::new(anchor.original, record.anchor_pose());
        anchor
            .items
            .iter()
            .map(|item| {
                let pose = mv.apply(&item.original);
                let container_name = self.loot_tables.container_name(&item.type_name);
                let loot_table = self.loot_tables.loot_table(&container_name).to_string();
                OutputRecord::new(&anchor.type_id, container_name, loot_table, &pose, &self.settings)
            })
            .collect()
    }

    /// Output records for one scene record, or `None` for an unknown anchor type.
    pub fn process_record(&self, record: &SceneRecord) -> Option<Vec<OutputRecord>> {
        let anchor = self.registry.lookup(&record.type_id)?;
        Some(self.expand(anchor, record))
    }

    /// Lazy, order-preserving output over `records`.
    pub fn process<'s, I>(&'s self, records: I) -> Box<dyn Iterator<Item = OutputRecord> + 's>
    where
        I: IntoIterator<Item = SceneRecord>,
        I::IntoIter: 's,
    {
        Box::new(
            records
                .into_iter()
                .flat_map(move |record| self.process_record(&record).unwrap_or_default()),
        )
    }

    /// Same output as [`process`](Self::process), computed across the rayon pool.
    pub fn process_parallel(&self, records: &[SceneRecord]) -> Vec<OutputRecord> {
        records
            .par_iter()
            .map(|record| self.process_record(record).unwrap_or_default())
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Drive a whole scene document into `sink`.
    ///
    /// Malformed groups are logged and skipped; sink failures abort the run.
    pub fn run(&self, document: &SceneDocument, sink: &mut dyn RecordSink) -> Result<BatchStats> {
        let mut stats = BatchStats {
            groups_read: document.len(),
            ..BatchStats::default()
        };

        let mut records = Vec::with_capacity(document.len());
        for (i, parsed) in document.records().enumerate() {
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => {
                    stats.malformed_records += 1;
                    tracing::warn!(group = i, error = %e, "skipping malformed scene group");
                }
            }
        }

        let matched = records
            .iter()
            .filter(|record| {
                let known = self.registry.lookup(&record.type_id).is_some();
                if !known {
                    tracing::debug!(type_id = %record.type_id, "no anchor definition, skipping");
                }
                known
            })
            .count();
        stats.anchors_matched = matched;
        stats.unknown_anchors = records.len() - matched;

        let outputs: Box<dyn Iterator<Item = OutputRecord> + '_> = if self.parallel {
            Box::new(self.process_parallel(&records).into_iter())
        } else {
            self.process(records.iter().cloned())
        };

        for output in outputs {
            if self.loot_tables.is_unclassified(&output.loot_table) {
                stats.unclassified_items += 1;
                tracing::debug!(
                    location = %output.location_name,
                    container = %output.container_name,
                    "container needs manual classification"
                );
            }
            sink.append(&output)?;
            stats.records_emitted += 1;
        }
        sink.finish()?;

        tracing::info!(
            groups = stats.groups_read,
            matched = stats.anchors_matched,
            unknown = stats.unknown_anchors,
            malformed = stats.malformed_records,
            emitted = stats.records_emitted,
            unclassified = stats.unclassified_items,
            "batch complete"
        );
        Ok(stats)
    }
}
