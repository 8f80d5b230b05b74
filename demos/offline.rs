// Offline run of the documentation pipeline.
//
// A canned generator stands in for the model, so no API keys are needed.
// Each finished task is exported as an OpenTelemetry span on stdout.
//
// Run: cargo run --example offline

use std::sync::Arc;

use docwright::{AgentRole, Pipeline, PipelineError, PipelineRequest, TemplateKind, TextGenerator};
use opentelemetry::trace::{Span, Tracer};
use opentelemetry::{KeyValue, global};
use opentelemetry_sdk::trace::SdkTracerProvider;

// ---------------------------------------------------------------------------
// Canned model
// ---------------------------------------------------------------------------

struct Canned;
impl TextGenerator for Canned {
    fn generate(&self, prompt: &str, role: &AgentRole) -> Result<String, PipelineError> {
        let first_line = prompt.lines().next().unwrap_or_default();
        Ok(format!(
            "## {}\n\nResponding to: {first_line}\n\n- point one\n- point two",
            role.name
        ))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let provider = SdkTracerProvider::builder()
        .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        .build();
    global::set_tracer_provider(provider.clone());
    let tracer = global::tracer("docwright");

    let pipeline = Pipeline::new(Arc::new(Canned));
    let request = PipelineRequest::new(
        "Python Best Practices for Data Science Projects",
        TemplateKind::TechnicalDocumentation,
        "Focus on code organization, version control, and reproducibility",
    )
    .unwrap();

    let mut runner = pipeline.runner(&request).unwrap().on_step(move |e| {
        let mut span = tracer.start(e.task.to_string());
        span.set_attribute(KeyValue::new("role", e.role.to_string()));
        span.set_attribute(KeyValue::new("step", e.step_number as i64));
        span.set_attribute(KeyValue::new("output_chars", e.output_chars as i64));
        span.end();
    });

    let mut ctx = pipeline.ctx();
    match runner.run(&mut ctx) {
        Ok(result) => println!("=== Result ===\n{result}\n"),
        Err(e) => eprintln!("run failed: {e}"),
    }

    println!("=== Log ===");
    for entry in ctx.logs() {
        println!("  {entry}");
    }

    let _ = provider.shutdown();
}
