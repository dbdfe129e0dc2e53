use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jsonflow::config::PipelineConfig;
use jsonflow::error::PipelineError;
use jsonflow::layout::Algorithm;

/// Convert arbitrary JSON into a positioned workflow graph
#[derive(Parser, Debug)]
#[command(name = "jsonflow")]
#[command(about = "Convert arbitrary JSON into a positioned workflow graph", long_about = None)]
struct Args {
    /// Input JSON file (reads stdin when omitted or "-")
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Pipeline configuration (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Layout algorithm: hierarchical or simple
    #[arg(short, long, value_name = "ALGORITHM")]
    algorithm: Option<Algorithm>,

    /// Tighten spacing for graphs with more than 50 nodes
    #[arg(long)]
    optimize_large: bool,

    /// Print the structural analysis instead of the workflow
    #[arg(long)]
    analysis: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jsonflow=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            tracing::debug!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, PipelineError> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(algorithm) = args.algorithm {
        config.layout.algorithm = algorithm;
    }
    if args.optimize_large {
        config.layout.optimize_large_graphs = true;
    }

    let input = read_input(args.file.as_ref())?;

    if args.analysis {
        let summary = jsonflow::pipeline::analyze_text(&input, &config)?;
        render(&summary, args.compact)
    } else {
        let graph = jsonflow::pipeline::convert(&input, &config)?;
        render(&graph, args.compact)
    }
}

fn read_input(file: Option<&PathBuf>) -> Result<String, PipelineError> {
    match file {
        Some(path) if path.to_str() != Some("-") => std::fs::read_to_string(path).map_err(|e| {
            PipelineError::parse("P002", format!("Failed to read input file '{}': {}", path.display(), e))
        }),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| PipelineError::parse("P002", format!("Failed to read from stdin: {}", e)))?;
            Ok(buffer)
        }
    }
}

fn render<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, PipelineError> {
    let rendered = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    rendered.map_err(|e| PipelineError::output(format!("Failed to serialize output: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonflow::error::Phase;

    struct Unserializable;

    impl serde::Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("value cannot be written"))
        }
    }

    #[test]
    fn render_failure_is_an_output_error() {
        let err = render(&Unserializable, false).unwrap_err();
        assert_eq!(err.code, "O001");
        assert_eq!(err.phase, Phase::Output);
        assert!(err.message.contains("value cannot be written"));
    }

    #[test]
    fn render_compact_is_one_line() {
        let text = render(&serde_json::json!({"a": [1, 2]}), true).unwrap();
        assert_eq!(text, r#"{"a":[1,2]}"#);
    }
}
