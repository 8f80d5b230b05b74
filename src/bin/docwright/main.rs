mod args;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use docwright::source::{ContentSource, preview};
use docwright::{Config, Pipeline, PipelineRequest, TemplateKind, sink};

use args::Args;

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    // RUST_LOG wins; otherwise -v flags pick the level.
    if std::env::var("RUST_LOG").is_err() {
        builder.filter_level(match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        });
    }
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list_templates {
        for kind in TemplateKind::ALL {
            println!("{kind}");
        }
        return Ok(());
    }

    let topic = args.topic.clone().unwrap_or_default();
    let template: TemplateKind = args.template.parse()?;
    let content = ContentSource::pick(args.content.clone(), args.file.clone()).load()?;

    if args.preview {
        println!("{}", preview(&topic, template, &content));
        return Ok(());
    }

    let request = PipelineRequest::new(topic, template, content)?;

    let mut config = Config::from_env()?;
    args.apply(&mut config);
    log::debug!("{config:?}");
    let pipeline = Pipeline::from_config(&config)?;

    let started = Instant::now();
    let mut runner = pipeline
        .runner(&request)?
        .on_step(|e| {
            eprintln!(
                "Phase {}/{}: {} complete ({:.1}s)",
                e.step_number,
                e.total_steps,
                e.role,
                e.duration.as_secs_f64()
            );
        })
        .on_error(|e| {
            eprintln!("Phase {} ({}) failed: {}", e.step_number, e.task, e.error);
        });

    log::info!(
        "running the {} workflow ({} phases)",
        runner.workflow().name(),
        runner.workflow().len()
    );
    let result = runner
        .run(&mut pipeline.ctx())
        .context("documentation generation failed")?;
    eprintln!(
        "Complete! Generated in {:.2} seconds",
        started.elapsed().as_secs_f64()
    );

    let target = match (&args.output, args.save) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(sink::default_file_name(request.topic()))),
        (None, false) => None,
    };

    match target {
        Some(path) => {
            sink::write_markdown(&path, &result)?;
            eprintln!("Saved to {}", path.display());
        }
        None => print!("{}", sink::render_markdown(&result)),
    }

    Ok(())
}
