//! Per-request generation pipeline
//!
//! schema provider -> (infer | supplied spec) -> validate -> apply -> render
//!
//! A pipeline holds no per-request state; one instance can serve any number
//! of requests, from any number of threads.

mod errors;
mod request;

pub use errors::{ErrorKind, GenerationError, GenerationResult, InputError};
pub use request::{GenerationOutput, GenerationRequest, SchemaSource};

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::layout::{LayoutEngine, LayoutSpec, ValidationMode, Violation};
use crate::observability::{Event, Logger, ObservationScope};
use crate::render::{FormRenderer, RenderConfig, RenderResult};

pub struct GenerationPipeline {
    engine: LayoutEngine,
    renderer: FormRenderer,
    logger: Logger,
}

impl GenerationPipeline {
    pub fn new(engine: LayoutEngine, renderer: FormRenderer, logger: Logger) -> Self {
        Self {
            engine,
            renderer,
            logger,
        }
    }

    /// Builds the renderer from `render`; fails if the templates cannot be loaded.
    pub fn from_config(
        render: &RenderConfig,
        mode: ValidationMode,
        logger: Logger,
    ) -> RenderResult<Self> {
        Ok(Self::new(
            LayoutEngine::new(mode),
            FormRenderer::new(render)?,
            logger,
        ))
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Runs one request end to end.
    pub fn run(&self, request: &GenerationRequest) -> GenerationResult<GenerationOutput> {
        let label = request.schema.label();
        let scope = ObservationScope::with_fields(&self.logger, "GENERATE", &[("schema", label.as_str())]);

        match self.execute(request) {
            Ok(output) => {
                scope.complete_with_fields(&[("layout", output.tree.effective_layout().as_str())]);
                Ok(output)
            }
            Err(GenerationError::Unexpected(message)) => {
                scope.fail(&message);
                Err(GenerationError::Unexpected(message))
            }
            Err(err) => {
                scope.reject(err.code(), &err.message());
                Err(err)
            }
        }
    }

    /// Like `run`, but a panic anywhere in the traversal becomes
    /// `GenerationError::Unexpected` instead of unwinding into the caller.
    pub fn run_guarded(&self, request: &GenerationRequest) -> GenerationResult<GenerationOutput> {
        catch_unwind(AssertUnwindSafe(|| self.run(request)))
            .unwrap_or_else(|payload| Err(GenerationError::Unexpected(panic_message(payload))))
    }

    /// Loads the schema and infers its specification.
    pub fn infer(&self, source: &SchemaSource) -> GenerationResult<LayoutSpec> {
        let schema = source.load()?;
        let spec = self.engine.generate(&schema);
        let label = source.label();
        self.logger
            .event(Event::SpecInferred, &[("schema", label.as_str())]);
        Ok(spec)
    }

    /// Loads the schema and checks `spec` against it.
    pub fn validate(
        &self,
        source: &SchemaSource,
        spec: &LayoutSpec,
    ) -> GenerationResult<Vec<Violation>> {
        let schema = source.load()?;
        Ok(self.engine.validate(spec, &schema))
    }

    fn execute(&self, request: &GenerationRequest) -> GenerationResult<GenerationOutput> {
        let schema = request.schema.load()?;
        let properties = schema.property_count().to_string();
        self.logger
            .event(Event::SchemaLoaded, &[("properties", properties.as_str())]);

        let spec = match &request.spec {
            Some(spec) => {
                self.logger.event(Event::SpecAccepted, &[]);
                spec.clone()
            }
            None => {
                let spec = self.engine.generate(&schema);
                self.logger.event(Event::SpecInferred, &[]);
                spec
            }
        };

        let tree = self.engine.apply(&schema, &spec).inspect_err(|err| {
            let first = err.first().to_string();
            let count = err.violations().len().to_string();
            self.logger.event(
                Event::SpecRejected,
                &[("first", first.as_str()), ("violations", count.as_str())],
            );
        })?;

        let html = self.renderer.render_page(&tree, Some(&spec));
        let bytes = html.len().to_string();
        self.logger
            .event(Event::FormRendered, &[("bytes", bytes.as_str())]);

        Ok(GenerationOutput { spec, tree, html })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic during generation: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic during generation: {}", s)
    } else {
        "panic during generation".to_string()
    }
}
