//! kollect CLI - run collection pipelines over JSON data

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kollect::cli::{Args, SubCommand};
use kollect::{
    execute_pipeline, explain_pipeline, format_output, parse_pipeline, Collection,
    ExecutionContext, OutputFormat, STAGES,
};

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let ctx = ExecutionContext {
        output_format: if args.json { OutputFormat::Json } else { OutputFormat::Human },
        pretty: args.pretty,
        verbose: args.verbose,
        seed: args.seed,
    };

    match args.command {
        SubCommand::Run {
            pipeline,
            input,
            null_input,
        } => {
            let pipeline = parse_pipeline(&pipeline)?;
            let collection = if null_input {
                Collection::new()
            } else {
                read_input(input.as_deref())?
            };

            let result = execute_pipeline(&pipeline, collection, &ctx)?;
            if let Some(message) = &result.message {
                eprintln!("{}", message);
            }
            let output = format_output(&result, &ctx.output_format, ctx.pretty)?;
            println!("{}", output.trim_end());
            Ok(())
        }

        SubCommand::Explain { pipeline } => {
            let pipeline = parse_pipeline(&pipeline)?;
            let result = explain_pipeline(&pipeline)?;
            let output = format_output(&result, &ctx.output_format, ctx.pretty)?;
            println!("{}", output.trim_end());
            Ok(())
        }

        SubCommand::Stages => {
            for info in STAGES {
                println!("{:<34} {}", info.usage, info.summary);
            }
            Ok(())
        }
    }
}

/// Read a JSON document from `path`, or stdin when no path is given.
/// Blank input is an empty collection.
fn read_input(path: Option<&Path>) -> anyhow::Result<Collection> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            text
        }
    };

    if text.trim().is_empty() {
        return Ok(Collection::new());
    }

    let json: serde_json::Value = serde_json::from_str(&text).context("input is not valid JSON")?;
    Ok(Collection::from_json(json))
}
