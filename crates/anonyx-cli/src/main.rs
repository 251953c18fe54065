//! anonyx — replace names, organizations, places, emails, and phone numbers
//! in free text with casing-aware placeholders.

mod cli;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use anonyx_common::AnonymizationResult;
use anonyx_config::AnonyxConfig;
use anonyx_ner::Anonymizer;

use cli::{Cli, Commands, InputArgs};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the anonymized output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("anonyx=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnonyxConfig::load_from(path)?,
        None => AnonyxConfig::load()?,
    };
    debug!(
        path = ?cli.config,
        model = %config.classifier.model_id,
        email = config.detectors.email,
        phone = config.detectors.phone,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Anonymize { input, report, json } => {
            let text = read_input(&input)?;
            if text.trim().is_empty() {
                info!("Blank input, classifier not called");
                eprintln!("Nothing to anonymize.");
                return Ok(());
            }
            let anonymizer = Anonymizer::from_config(&config)?;
            let result = anonymizer.anonymize(&text)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render(&result, report));
            }
        }
        Commands::Detect { input, json } => {
            let text = read_input(&input)?;
            if text.trim().is_empty() {
                info!("Blank input, classifier not called");
                eprintln!("Nothing to anonymize.");
                return Ok(());
            }
            let anonymizer = Anonymizer::from_config(&config)?;
            let spans = anonymizer.detect_entities(&text)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&spans)?);
            } else {
                for span in &spans {
                    println!(
                        "{}..{}\t{}\t{}\t{}",
                        span.start(),
                        span.end(),
                        span.category(),
                        span.surface(),
                        span.replacement().unwrap_or_default(),
                    );
                }
            }
        }
    }
    Ok(())
}

/// TEXT argument, then `--file`, then stdin.
fn read_input(input: &InputArgs) -> anyhow::Result<String> {
    if let Some(text) = &input.text {
        return Ok(text.clone());
    }
    if let Some(path) = &input.file {
        return read_file(path);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn render(result: &AnonymizationResult, report: bool) -> String {
    let mut out = result.text.clone();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    if report {
        out.push_str("\nDetected entities:\n");
        for entity in &result.entities {
            out.push_str("- ");
            out.push_str(&entity.describe());
            if !entity.applied {
                out.push_str(" (not applied)");
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anonyx_common::{Category, EntitySpan, ReportedEntity, SpanSource};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_with_report() {
        let original = "Call JOHN";
        let span = EntitySpan::detect(Category::Person, "PER", original, 5, 9, SpanSource::Classifier)
            .unwrap()
            .with_replacement("[PERSON]");
        let result = AnonymizationResult {
            text: "Call [PERSON]".into(),
            entities: vec![ReportedEntity { span, applied: true }],
            empty_input: false,
        };
        assert_eq!(render(&result, false), "Call [PERSON]\n");
        assert_eq!(
            render(&result, true),
            "Call [PERSON]\n\nDetected entities:\n- Text: 'JOHN' -> Label: PERSON (UPPERCASE) -> Replacement: [PERSON]\n"
        );
    }

    #[test]
    fn test_text_argument_wins() {
        let input = InputArgs { text: Some("hello".into()), file: Some("/nonexistent".into()) };
        assert_eq!(read_input(&input).unwrap(), "hello");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = read_file(Path::new("/nonexistent/anonyx-input.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/anonyx-input.txt"));
    }
}
