//! CLI command implementations
//!
//! Each command loads the configuration, builds what it needs from it and
//! writes one JSON response to stdout. Errors are written as an error
//! response by `run` and returned to `main`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;

use crate::batch::{run_batch, BatchOptions};
use crate::http_server::{HttpServer, PlaygroundState};
use crate::layout::{LayoutSpec, ValidationMode};
use crate::observability::{Event, Logger};
use crate::pipeline::{GenerationError, GenerationPipeline, GenerationRequest, SchemaSource};
use crate::store::SpecStore;

use super::args::{Cli, Command, SpecAction};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let result = run_command(cli);
    if let Err(e) = &result {
        write_error(e)?;
    }
    result
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<()> {
    let mut config = Config::load(&cli.config)?;
    if cli.debug {
        config.debug = true;
    }

    let logger = Logger::for_debug(config.debug);
    let config_path = cli.config.display().to_string();
    if cli.config.exists() {
        logger.event(Event::ConfigLoaded, &[("path", config_path.as_str())]);
    } else {
        logger.event(Event::ConfigDefaulted, &[("path", config_path.as_str())]);
    }

    match cli.command {
        Command::Generate {
            schema,
            spec,
            spec_id,
            out,
            emit_spec,
            templates,
            strict,
        } => {
            if strict {
                config.strict = true;
            }
            generate(
                &config,
                logger,
                GenerateArgs {
                    schema,
                    spec,
                    spec_id,
                    out,
                    emit_spec,
                    templates,
                },
            )
        }
        Command::Infer { schema } => infer(&config, logger, &schema),
        Command::Validate { schema, spec } => validate(&config, logger, &schema, &spec),
        Command::Batch {
            input,
            output,
            batch_size,
            workers,
            templates,
        } => {
            let mut options = BatchOptions::new(input, output);
            options.batch_size = batch_size.unwrap_or(config.batch_size);
            options.max_workers = workers.unwrap_or(config.max_workers);
            options.output_extension = config.output_extension.clone();
            options.render = config.render_config(templates);
            options.mode = config.validation_mode();
            options.logger = logger;
            batch(&options)
        }
        Command::Spec { action } => spec(&config, logger, action),
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(&config, logger)
        }
    }
}

/// Arguments of `generate` after clap
#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub schema: PathBuf,
    pub spec: Option<PathBuf>,
    pub spec_id: Option<String>,
    pub out: Option<PathBuf>,
    pub emit_spec: Option<PathBuf>,
    pub templates: Option<PathBuf>,
}

/// Render one schema into a page
pub fn generate(config: &Config, logger: Logger, args: GenerateArgs) -> CliResult<()> {
    let pipeline = pipeline(config, logger, args.templates)?;

    let spec = match (args.spec, args.spec_id) {
        (Some(path), _) => Some(read_spec(&path)?),
        (None, Some(id)) => Some(SpecStore::open(&config.spec_dir)?.load(&id)?),
        (None, None) => None,
    };

    let mut request = GenerationRequest::from_file(&args.schema);
    if let Some(spec) = spec {
        request = request.with_spec(spec);
    }

    let output = pipeline.run_guarded(&request)?;

    if let Some(path) = &args.emit_spec {
        write_pretty(path, &output.spec)?;
    }

    let layout = output.tree.effective_layout().as_str().to_string();
    match &args.out {
        Some(path) => {
            fs::write(path, &output.html)?;
            write_response(json!({
                "layout": layout,
                "out": path.display().to_string(),
                "bytes": output.html.len()
            }))
        }
        None => write_response(json!({
            "layout": layout,
            "html": output.html
        })),
    }
}

/// Print the inferred specification
pub fn infer(config: &Config, logger: Logger, schema: &Path) -> CliResult<()> {
    let pipeline = pipeline(config, logger, None)?;
    let spec = pipeline.infer(&SchemaSource::File(schema.to_path_buf()))?;
    write_response(spec.to_value())
}

/// Check a specification file against a schema
pub fn validate(config: &Config, logger: Logger, schema: &Path, spec_path: &Path) -> CliResult<()> {
    let pipeline = pipeline(config, logger, None)?;
    let spec = read_spec(spec_path)?;
    let violations = pipeline.validate(&SchemaSource::File(schema.to_path_buf()), &spec)?;

    if violations.is_empty() {
        return write_response(json!({"valid": true, "violations": []}));
    }

    Err(CliError::spec_invalid(format!(
        "{} violation(s); first: {}",
        violations.len(),
        violations[0]
    ))
    .with_details(json!({"valid": false, "violations": violations})))
}

/// Render a directory of schemas
pub fn batch(options: &BatchOptions) -> CliResult<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;
    let summary = runtime.block_on(run_batch(options))?;
    let report = serde_json::to_value(&summary)?;

    if summary.is_success() {
        return write_response(report);
    }

    Err(CliError::batch_incomplete(format!(
        "{} of {} files failed",
        summary.failed, summary.total
    ))
    .with_details(report))
}

/// Manage the specification store
pub fn spec(config: &Config, logger: Logger, action: SpecAction) -> CliResult<()> {
    let store = SpecStore::open(&config.spec_dir)?;

    match action {
        SpecAction::Save { id, file } => {
            let spec = read_spec(&file)?;
            store.save(&id, &spec)?;
            logger.event(Event::SpecSaved, &[("id", id.as_str())]);
            write_response(json!({"id": id, "saved": true}))
        }
        SpecAction::Show { id } => write_response(store.load(&id)?.to_value()),
        SpecAction::List => {
            let ids = store.list()?;
            write_response(json!({"total": ids.len(), "ids": ids}))
        }
        SpecAction::Delete { id } => {
            store.delete(&id)?;
            logger.event(Event::SpecDeleted, &[("id", id.as_str())]);
            write_response(json!({"id": id, "deleted": true}))
        }
    }
}

/// Start the playground server and block until it stops
pub fn serve(config: &Config, logger: Logger) -> CliResult<()> {
    let pipeline = pipeline(config, logger, None)?;
    let store = SpecStore::open(&config.spec_dir)?;
    let state = Arc::new(PlaygroundState::new(pipeline, store));
    let server = HttpServer::new(config.server.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

fn pipeline(
    config: &Config,
    logger: Logger,
    templates: Option<PathBuf>,
) -> CliResult<GenerationPipeline> {
    let mode: ValidationMode = config.validation_mode();
    Ok(GenerationPipeline::from_config(
        &config.render_config(templates),
        mode,
        logger,
    )?)
}

fn read_spec(path: &Path) -> CliResult<LayoutSpec> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::io_error(format!("Failed to read specification {}: {}", path.display(), e))
    })?;
    Ok(LayoutSpec::from_json(&content).map_err(GenerationError::from)?)
}

fn write_pretty(path: &Path, spec: &LayoutSpec) -> CliResult<()> {
    let mut content = serde_json::to_string_pretty(&spec.to_value())?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}
