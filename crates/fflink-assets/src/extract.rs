//! Turning decoded payloads back into source files.

use hashbrown::HashSet;
use log::info;

use crate::asset::{Blob, LocalizeEntry, Payload, RawFile, StringTable};
use crate::codecs::{decode_name, localize, rawfile, stringtable, Codec};
use crate::io::AssetSink;
use crate::manifest::ManifestRow;
use crate::Result;

/// What happened to one payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    Written,
    /// Zero-length content
    SkippedEmpty,
    /// A file generated for the archive itself
    SkippedSelfReference,
}

/// Counts over one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExtractSummary {
    pub written: usize,
    pub skipped_empty: usize,
    pub skipped_self_reference: usize,
    pub skipped_unknown: usize,
}

impl ExtractSummary {
    fn count(&mut self, outcome: ExtractOutcome) {
        match outcome {
            ExtractOutcome::Written => self.written += 1,
            ExtractOutcome::SkippedEmpty => self.skipped_empty += 1,
            ExtractOutcome::SkippedSelfReference => self.skipped_self_reference += 1,
        }
    }
}

/// Writes payloads to a sink and records their manifest rows.
///
/// Localized strings sharing a prefix are appended to one `.str` file and
/// produce a single manifest row.
pub struct Extractor<'s> {
    sink: &'s mut dyn AssetSink,
    /// Normalized output name used to spot self-referencing raw files
    output_name: String,
    localize_prefixes: HashSet<String>,
    summary: ExtractSummary,
}

impl<'s> Extractor<'s> {
    /// `output_name` is the name of the output directory (or archive).
    pub fn new(sink: &'s mut dyn AssetSink, output_name: &str) -> Self {
        Self {
            sink,
            output_name: rawfile::normalize_for_compare(output_name),
            localize_prefixes: HashSet::new(),
            summary: ExtractSummary::default(),
        }
    }

    #[inline]
    pub fn summary(&self) -> ExtractSummary {
        self.summary
    }

    /// Count an entry that was skipped for having no enabled codec.
    pub fn record_unknown(&mut self) {
        self.summary.skipped_unknown += 1;
    }

    /// Extract one payload.
    pub fn emit(&mut self, payload: &Payload) -> Result<ExtractOutcome> {
        let outcome = match payload {
            Payload::Localize(entry) => self.localize(entry)?,
            Payload::RawFile(raw) => self.raw_file(raw)?,
            Payload::StringTable(table) => self.string_table(table)?,
            Payload::MapEnts(blob) => self.blob(Codec::MapEnts, blob)?,
            Payload::AddonMapEnts(blob) => self.blob(Codec::AddonMapEnts, blob)?,
            Payload::PhysPreset(blob) => self.blob(Codec::PhysPreset, blob)?,
        };
        self.summary.count(outcome);
        Ok(outcome)
    }

    fn localize(&mut self, entry: &LocalizeEntry) -> Result<ExtractOutcome> {
        let (prefix, reference) = localize::split_key(&entry.key);
        let path = format!("{}/{prefix}.str", localize::SOURCE_DIR);

        self.sink
            .append_file(&path, &localize::format_block(reference, &entry.value))?;

        if !self.localize_prefixes.contains(&prefix) {
            self.sink
                .record(ManifestRow::new(Codec::Localize.manifest_name(), prefix.as_str()))?;
            self.localize_prefixes.insert(prefix.clone());
        }

        info!("localize {prefix} -> {}", decode_name(reference));
        Ok(ExtractOutcome::Written)
    }

    fn raw_file(&mut self, raw: &RawFile) -> Result<ExtractOutcome> {
        let name = rawfile::sanitize_name(&decode_name(&raw.name)).replace('\\', "/");

        if rawfile::is_self_reference(&name, &self.output_name) {
            info!("skipping generated file {name}");
            return Ok(ExtractOutcome::SkippedSelfReference);
        }
        if raw.content.is_empty() {
            info!("skipping empty file {name}");
            return Ok(ExtractOutcome::SkippedEmpty);
        }

        self.sink.write_file(&name, &raw.content)?;
        self.sink
            .record(ManifestRow::new(Codec::RawFile.manifest_name(), name.as_str()))?;

        info!("rawfile {name} ({} bytes)", raw.content.len());
        Ok(ExtractOutcome::Written)
    }

    fn string_table(&mut self, table: &StringTable) -> Result<ExtractOutcome> {
        let name = decode_name(&table.name).replace('\\', "/");

        self.sink.write_file(&name, &stringtable::to_csv(table))?;
        self.sink
            .record(ManifestRow::new(Codec::StringTable.manifest_name(), name.as_str()))?;

        info!(
            "stringtable {name} ({} rows, {} columns)",
            table.rows, table.columns
        );
        Ok(ExtractOutcome::Written)
    }

    fn blob(&mut self, codec: Codec, blob: &Blob) -> Result<ExtractOutcome> {
        let name = rawfile::sanitize_name(&decode_name(&blob.name)).replace('\\', "/");
        if blob.content.is_empty() {
            info!("skipping empty {} {name}", codec.manifest_name());
            return Ok(ExtractOutcome::SkippedEmpty);
        }

        self.sink.write_file(&name, &blob.content)?;
        self.sink
            .record(ManifestRow::new(codec.manifest_name(), name.as_str()))?;

        info!("{} {name} ({} bytes)", codec.manifest_name(), blob.content.len());
        Ok(ExtractOutcome::Written)
    }
}
