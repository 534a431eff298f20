//! LearnPilot Pipeline
//!
//! Reads a batch of extracted papers and writes a reading plan:
//! 1. Loads the batch JSON (paper id -> concepts, prerequisites, difficulty)
//! 2. Builds the dependency graph
//! 3. Resolves the reading order and scores each paper
//! 4. Prints the curriculum report to stdout
//!
//! Exit status is 2 for bad input, 1 for any other failure.

mod report;

use learnpilot_common::{config::AppConfig, errors::AppError, metrics, Result, VERSION};
use learnpilot_graph::{build_dependency_graph, Curriculum, PaperBatch};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Configuration comes before tracing: the log settings live in it
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    init_tracing(&config);

    info!("Starting LearnPilot Pipeline v{}", VERSION);

    let input = std::env::args().nth(1);
    match run(&config, input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, code = e.code().as_code(), "Pipeline failed");
            ExitCode::from(if e.is_input_error() { 2 } else { 1 })
        }
    }
}

fn init_tracing(config: &AppConfig) {
    let observability = &config.observability;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&observability.log_level));

    // Logs go to stderr so the report on stdout stays clean
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if observability.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(config: &AppConfig, input: Option<String>) -> Result<()> {
    let metrics_handle = if config.observability.metrics_enabled {
        Some(install_metrics()?)
    } else {
        None
    };

    let mut stdout = std::io::stdout().lock();
    write_report(config, input, &mut stdout)?;

    if let Some(handle) = metrics_handle {
        info!(
            service = %config.observability.service_name,
            snapshot = %handle.render(),
            "Metrics snapshot"
        );
    }

    Ok(())
}

/// Read the batch file, build its curriculum, and write the report
fn write_report<W: Write>(config: &AppConfig, input: Option<String>, out: &mut W) -> Result<()> {
    let path = input
        .or_else(|| config.pipeline.input_path.clone())
        .ok_or_else(|| AppError::Configuration {
            message: "no batch file given: pass a path or set pipeline.input_path".to_string(),
        })?;

    info!(path = %path, "Reading paper batch");
    let batch = read_batch(BufReader::new(File::open(&path)?))?;

    let graph = build_dependency_graph(&batch);
    let curriculum = Curriculum::build(&graph, &config.planning);

    let rendered = report::render(&curriculum, config.pipeline.output_format)?;
    out.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Parse a batch; text that is not JSON at all is bad input too
fn read_batch<R: Read>(reader: R) -> Result<PaperBatch> {
    PaperBatch::from_reader(reader).map_err(|e| match e {
        AppError::Serialization(err) => AppError::Validation {
            message: format!("batch file is not valid JSON: {}", err),
            field: None,
        },
        other => other,
    })
}

/// Install an in-process Prometheus recorder; the pipeline exits too
/// quickly to be scraped, so the snapshot is logged at the end of the run
fn install_metrics() -> Result<PrometheusHandle> {
    let name = format!("{}_graph_build_duration_seconds", metrics::METRICS_PREFIX);
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(name), metrics::BUILD_BUCKETS)
        .and_then(|builder| builder.install_recorder())
        .map_err(anyhow::Error::from)?;

    metrics::register_metrics();
    Ok(handle)
}
