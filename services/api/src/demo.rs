use crate::infra::{load_records, load_rules};
use clap::Args;
use parcel_recon::config::{AppConfig, ConfigError};
use parcel_recon::error::AppError;
use parcel_recon::telemetry;
use parcel_recon::workflows::edits::{
    EditClassifier, EditFeedValidator, EditIntentRecord, FeedLocation, ReferenceRecord,
    ValidationRun, VerdictTier,
};
use parcel_recon::workflows::samples;
use parcel_recon::workflows::snapshots::{
    default_matcher, ChangeReport, PropertyRecord, SnapshotComparator,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ValidateArgs {
    /// Edit feed path or http(s) URL (defaults to RECON_FEED_SOURCE)
    #[arg(long)]
    pub(crate) feed: Option<String>,
    /// Registry CSV export (defaults to RECON_REGISTRY_PATH, then the sample registry)
    #[arg(long)]
    pub(crate) registry: Option<PathBuf>,
    /// Classifier rules TOML (defaults to RECON_RULES_PATH, then the built-in tables)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Annotated feed destination (defaults to RECON_OUTPUT_PATH)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CompareArgs {
    /// Current snapshot CSV (defaults to the sample current snapshot)
    #[arg(long)]
    pub(crate) current: Option<PathBuf>,
    /// Reference snapshot CSV (defaults to the sample reference snapshot)
    #[arg(long)]
    pub(crate) reference: Option<PathBuf>,
    /// Known subdivided parent, by SPI or propnum; repeatable
    #[arg(long = "parent")]
    pub(crate) parents: Vec<String>,
    /// Write the JSON report here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// List the evidence behind each verdict.
    #[arg(long)]
    pub(crate) show_evidence: bool,
    /// Skip the snapshot comparison portion of the demo.
    #[arg(long)]
    pub(crate) skip_compare: bool,
}

pub(crate) async fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs {
        feed,
        registry,
        rules,
        output,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let source = feed
        .or(config.feed.source)
        .ok_or(ConfigError::MissingFeedSource)?;
    let location = FeedLocation::parse(&source);
    info!(%location, "fetching edit feed");
    let feed = location.load().await?;

    let registry_path = registry.or(config.registry_path);
    let registry: Vec<ReferenceRecord> =
        load_records(registry_path.as_deref(), samples::registry_source())?;
    let rules = load_rules(rules.or(config.rules_path).as_deref())?;

    let validator = EditFeedValidator::new(EditClassifier::new(rules))
        .with_progress_interval(config.feed.progress_interval);
    let run = validator.validate(feed.intents(), &registry);

    let output = output.unwrap_or(config.feed.output_path);
    let file = File::create(&output)?;
    feed.write_validated(&run.results, BufWriter::new(file))?;
    info!(path = %output.display(), rows = feed.len(), "annotated feed written");

    println!("Edit feed validation ({location})");
    render_summary(&run);
    println!("Annotated feed written to {}", output.display());
    Ok(())
}

pub(crate) fn run_compare(args: CompareArgs) -> Result<(), AppError> {
    let CompareArgs {
        current,
        reference,
        parents,
        output,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let current: Vec<PropertyRecord> =
        load_records(current.as_deref(), samples::current_source())?;
    let reference: Vec<PropertyRecord> =
        load_records(reference.as_deref(), samples::reference_source())?;

    let mut known_parents = config.known_parents;
    known_parents.extend(parents);
    let report = SnapshotComparator::new(default_matcher(&known_parents))
        .report(&current, &reference);
    let json = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "Wrote {} change records to {}",
                report.changes.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        show_evidence,
        skip_compare,
    } = args;

    println!("Property edit reconciliation demo");
    println!("\nEdit feed verdicts (sample registry)");
    let intents = samples::edit_intents();
    let registry = samples::registry_records();
    let run = EditFeedValidator::default().validate(&intents, &registry);
    render_verdicts(&intents, &run, show_evidence);
    render_summary(&run);

    if skip_compare {
        return Ok(());
    }

    println!("\nSnapshot comparison (sample current vs reference)");
    let comparator = SnapshotComparator::new(default_matcher([samples::SAMPLE_PARENT_SPI]));
    let report = comparator.report(&samples::current_snapshot(), &samples::reference_snapshot());
    render_report(&report);
    Ok(())
}

fn render_verdicts(intents: &[EditIntentRecord], run: &ValidationRun, show_evidence: bool) {
    for (intent, result) in intents.iter().zip(&run.results) {
        println!(
            "- [{}] {} ({})",
            result.tier.label(),
            display_code(intent),
            intent.identifier.describe()
        );
        println!("  {}", result.message);
        if show_evidence {
            for hit in &result.evidence {
                println!("    * {:?}: {}", hit.source, hit.detail);
            }
        }
    }
}

fn display_code(intent: &EditIntentRecord) -> String {
    let code = intent.normalized_code();
    if code.is_empty() {
        "none".to_string()
    } else {
        code
    }
}

fn render_summary(run: &ValidationRun) {
    println!("Summary: {} rows", run.summary.total);
    for tier in [
        VerdictTier::Ok,
        VerdictTier::Review,
        VerdictTier::NeedsReview,
        VerdictTier::NeedsGeneralReview,
        VerdictTier::NotFound,
    ] {
        let count = run.summary.count(tier);
        if count > 0 {
            println!("  - {}: {}", tier.label(), count);
        }
    }
}

fn render_report(report: &ChangeReport) {
    for change in &report.changes {
        println!(
            "- {}: propnum {} -> code '{}'",
            change.category.label(),
            change.propnum,
            change.proposed_edit_code.as_str()
        );
        println!("  {}", change.justification);
        if let (Some(old), Some(new)) = (&change.old_value, &change.new_value) {
            println!("  {} : '{}' -> '{}'", change.attribute_changed, old, new);
        }
        if !change.notes.is_empty() {
            println!("  Notes: {}", change.notes);
        }
    }
    println!("Summary: {} change records", report.changes.len());
    for (category, count) in &report.summary {
        println!("  - {}: {}", category.label(), count);
    }
}
