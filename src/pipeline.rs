use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::config::{DatasetSpec, PipelineConfig};
use crate::data::clean::{normalize_numeric_columns, report_missing};
use crate::data::loader::load_kosis_csv;
use crate::data::model::Dataset;
use crate::data::preview::render_preview;
use crate::data::writer::save_processed;
use crate::error::Result;
use crate::summary::{build_summary, Summary};

const RULE_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// Pipeline outcome
// ---------------------------------------------------------------------------

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    /// Loaded datasets by name; `None` where loading failed.
    pub loaded: BTreeMap<String, Option<Dataset>>,
    /// Cleaned datasets by name, in configuration order.
    pub cleaned: Vec<(String, Dataset)>,
    pub summary: Summary,
    /// Output files written.
    pub written: Vec<PathBuf>,
}

impl PipelineOutcome {
    pub fn cleaned(&self, name: &str) -> Option<&Dataset> {
        self.cleaned.iter().find(|(n, _)| n == name).map(|(_, ds)| ds)
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Clean one dataset as its spec describes: numeric normalization with a
/// missing-value report, then the keyword filter.
pub fn clean_dataset(mut dataset: Dataset, spec: &DatasetSpec) -> Dataset {
    println!("\n[cleaning {}]", spec.name);

    if spec.normalize {
        let converted = normalize_numeric_columns(&mut dataset);
        if !converted.is_empty() {
            info!("{}: converted to numbers: {}", spec.name, converted.join(", "));
        }
        report_missing(&dataset);
    }
    if let Some(filter) = &spec.filter {
        dataset = filter.apply(dataset);
    }

    info!("{} cleaned ({} rows)", spec.name, dataset.len());
    dataset
}

/// Run load → clean → summarize → save → preview.
///
/// Load failures degrade to absent datasets and never stop the run; a
/// failure to write an output file is returned.
pub fn run(config: &PipelineConfig, project_root: &Path) -> Result<PipelineOutcome> {
    let data_dir = config.data_dir_in(project_root);
    let mut outcome = PipelineOutcome::default();

    banner("KOSIS preprocessing started");

    println!("\n[1/4 load]");
    for spec in &config.datasets {
        let dataset = load_kosis_csv(&data_dir, &spec.file, config.encoding_for(spec));
        outcome.loaded.insert(spec.name.clone(), dataset);
    }

    println!("\n[2/4 clean]");
    for spec in config.datasets.iter().filter(|s| s.is_cleaned()) {
        let Some(dataset) = outcome.loaded.get(&spec.name).cloned().flatten() else {
            continue;
        };
        outcome
            .cleaned
            .push((spec.name.clone(), clean_dataset(dataset, spec)));
    }

    println!("\n[3/4 summary]");
    let available: BTreeMap<String, Dataset> = outcome.cleaned.iter().cloned().collect();
    outcome.summary = build_summary(&available, &config.summary);
    if !outcome.summary.is_empty() {
        match serde_json::to_string_pretty(&outcome.summary) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("failed to render summary: {e}"),
        }
    }

    println!("\n[4/4 save]");
    for spec in &config.datasets {
        let Some(output) = &spec.output else {
            continue;
        };
        if let Some(path) = save_processed(outcome.cleaned(&spec.name), &data_dir, output)? {
            outcome.written.push(path);
        }
    }

    banner("KOSIS preprocessing finished");

    for (name, dataset) in &outcome.cleaned {
        println!("\n[{name} preview]");
        match render_preview(dataset) {
            Ok(table) => println!("{table}"),
            Err(e) => error!("failed to render {name} preview: {e}"),
        }
    }

    Ok(outcome)
}

fn banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{rule}\n{title}\n{rule}");
}
