//! Reading inputs, parsing them in parallel and aggregating the result.

use std::path::{Path, PathBuf};

use docket_config::DocketConfig;
use docket_core::{
    DocEntry, ExtPatterns, Relations, SourceFile, Warnings, aggregate, extract_entries,
};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Extensions picked up when an input is a directory.
const SOURCE_EXTENSIONS: &[&str] = &["js", "scss"];

/// Filename, entries and warnings of one parsed file.
type Extracted = (String, Vec<DocEntry>, Warnings);

/// Result of a documentation run.
#[derive(Debug)]
pub struct Documentation {
    pub relations: Relations,
    pub warnings: Warnings,
}

impl Documentation {
    /// JSON export of every class with its members.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(self.relations.export()?)
    }
}

/// Expand the configured inputs into source files. Files are taken as
/// given; directories are walked for `.js` and `.scss` files in name order.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
        } else if input.is_dir() {
            walk(input, &mut files)?;
        } else {
            return Err(Error::InputNotFound(input.clone()));
        }
    }
    tracing::debug!(inputs = inputs.len(), files = files.len(), "collected source files");
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry.map_err(|source| Error::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if entry.file_type().is_file() && wanted {
            files.push(path.to_path_buf());
        }
    }
    Ok(())
}

/// Run the configured documentation job.
pub fn document(config: &DocketConfig) -> Result<Documentation> {
    config.validate()?;
    let paths = collect_inputs(&config.inputs)?;
    let patterns = config.ext_patterns();
    let warnings = Warnings::with_rules(config.warning_rules()?);

    let parsed: Vec<Extracted> = paths
        .par_iter()
        .map(|path| {
            let file = docket_js::load(path)?;
            Ok(extract(file, &patterns, &warnings))
        })
        .collect::<Result<_>>()?;

    finish(parsed, config, warnings)
}

/// Document sources already held in memory, as `(filename, text)` pairs.
pub fn document_sources(
    sources: &[(String, String)],
    config: &DocketConfig,
) -> Result<Documentation> {
    config.validate()?;
    let patterns = config.ext_patterns();
    let warnings = Warnings::with_rules(config.warning_rules()?);

    let parsed: Vec<Extracted> = sources
        .par_iter()
        .map(|(name, text)| {
            let file = docket_js::parse_source(Path::new(name), text)?;
            Ok(extract(file, &patterns, &warnings))
        })
        .collect::<Result<_>>()?;

    finish(parsed, config, warnings)
}

/// Per-file work, run on worker threads with a forked collector.
fn extract(
    file: SourceFile,
    patterns: &ExtPatterns,
    warnings: &Warnings,
) -> Extracted {
    let mut local = warnings.fork();
    let entries = extract_entries(&file, patterns, &mut local);
    (file.filename, entries, local)
}

/// Aggregate in input order and apply the warnings policy.
fn finish(
    parsed: Vec<Extracted>,
    config: &DocketConfig,
    mut warnings: Warnings,
) -> Result<Documentation> {
    let mut files = Vec::with_capacity(parsed.len());
    for (filename, entries, local) in parsed {
        warnings.absorb(local);
        files.push((filename, entries));
    }

    let relations = aggregate(files, config.aggregate_options(), &mut warnings)?;
    tracing::debug!(
        classes = relations.len(),
        warnings = warnings.len(),
        "documentation run finished"
    );
    warnings.check(config.warnings_as_errors)?;
    Ok(Documentation {
        relations,
        warnings,
    })
}
