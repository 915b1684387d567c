//! rlens - review sentiment from the command line
//!
//! Commands:
//! - `analyze`: verdict for one review, optionally scoped to an aspect
//! - `summarize`: prompt-ready review lines and label distribution
//! - `status`: which adapters are live

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rlens_common::config::{load_config, TomlConfig};
use rlens_sentiment::language::localize_label;
use rlens_sentiment::summary::{
    analyze_reviews, format_reviews_with_sentiment, sentiment_distribution, ReviewPassage,
};
use rlens_sentiment::types::SentimentOutcome;
use rlens_sentiment::{MultilingualAnalyzer, SentimentEngine};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rlens")]
#[command(about = "Sentiment fusion and aspect extraction for restaurant reviews")]
#[command(version)]
struct Args {
    /// Config file (overrides RLENS_CONFIG and the default location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze one review (reads stdin when TEXT is omitted)
    Analyze {
        text: Option<String>,

        /// Restrict the verdict to one aspect (food, service, ambience, price, ...)
        #[arg(short, long)]
        aspect: Option<String>,

        /// "hybrid", "basic" or an adapter name
        #[arg(short, long)]
        method: Option<String>,

        /// Detect the language and translate before scoring
        #[arg(long)]
        multilingual: bool,

        /// Print the label in this language (e.g. es, fr, ja)
        #[arg(long, default_value = "en")]
        lang: String,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize reviews, one per line ("rating<TAB>text" or "text")
    Summarize {
        /// Reviews file (stdin when omitted)
        file: Option<PathBuf>,

        /// Question the summary answers; picks the aspect to break out
        #[arg(short, long, default_value = "")]
        question: String,
    },

    /// Show adapter availability
    Status {
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(config: &TomlConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Parse `rating<TAB>text` or plain `text` lines; blank lines are skipped
fn parse_reviews(input: &str) -> Vec<ReviewPassage> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once('\t') {
            Some((rating, text)) => match rating.trim().parse::<f32>() {
                Ok(rating) => ReviewPassage::new(text.trim()).with_rating(rating),
                Err(_) => ReviewPassage::new(line.trim()),
            },
            None => ReviewPassage::new(line.trim()),
        })
        .collect()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize result")?
    );
    Ok(())
}

fn print_outcome<T: SentimentOutcome + serde::Serialize>(
    result: &T,
    lang: &str,
    json: bool,
) -> Result<()> {
    if json {
        print_json(result)?;
    } else {
        let sentiment = result.sentiment();
        println!(
            "{} ({:.3}) via {}",
            localize_label(sentiment.label, lang),
            sentiment.confidence,
            sentiment.method
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config);
    info!("Starting rlens {}", env!("CARGO_PKG_VERSION"));

    let engine = Arc::new(
        SentimentEngine::from_config(&config)
            .await
            .context("Failed to build sentiment engine")?,
    );

    match args.command {
        Command::Analyze {
            text,
            aspect,
            method,
            multilingual,
            lang,
            json,
        } => {
            let text = match text {
                Some(text) => text,
                None => read_input(None)?,
            };

            if multilingual {
                let analyzer = MultilingualAnalyzer::from_config(engine, &config.translation);
                match aspect {
                    Some(aspect) => {
                        let result = analyzer.analyze_aspect_sentiment(&text, &aspect).await;
                        if json {
                            print_json(&result)?;
                        } else {
                            print_outcome(&result.result, &lang, false)?;
                            println!(
                                "aspect '{}' mentioned: {}; language: {}{}",
                                result.result.aspect,
                                result.result.aspect_mentioned,
                                result.original_language,
                                if result.translation_degraded { " (degraded)" } else { "" }
                            );
                        }
                    }
                    None => {
                        let result = analyzer.analyze_sentiment(&text).await;
                        if json {
                            print_json(&result)?;
                        } else {
                            print_outcome(&result.result, &lang, false)?;
                            println!(
                                "language: {}{}",
                                result.original_language,
                                if result.translation_degraded { " (degraded)" } else { "" }
                            );
                        }
                    }
                }
            } else {
                match aspect {
                    Some(aspect) => {
                        let result = engine.analyze_aspect_sentiment(&text, &aspect).await;
                        print_outcome(&result, &lang, json)?;
                        if !json {
                            println!(
                                "aspect '{}' mentioned: {}",
                                result.aspect, result.aspect_mentioned
                            );
                        }
                    }
                    None => {
                        let result = match method {
                            Some(method) => engine.analyze_with_method(&text, &method).await,
                            None => engine.analyze_sentiment(&text).await,
                        };
                        print_outcome(&result, &lang, json)?;
                    }
                }
            }
        }

        Command::Summarize { file, question } => {
            let input = read_input(file.as_ref())?;
            let reviews = parse_reviews(&input);
            info!("Summarizing {} reviews", reviews.len());

            let analyzer = MultilingualAnalyzer::from_config(engine, &config.translation);
            let report = analyze_reviews(&analyzer, &reviews, &question).await;

            println!("{}", format_reviews_with_sentiment(&report));
            println!();
            println!("{}", sentiment_distribution(&report));
        }

        Command::Status { json } => {
            let registry = engine.registry().await;
            if json {
                print_json(registry.statuses())?;
            } else {
                println!("preferred method: {}", engine.preferred_method());
                for status in registry.statuses() {
                    println!("{:<12} weight {:.2}  {}", status.name, status.weight, status.state);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reviews() {
        let reviews = parse_reviews("4.5\tLovely pasta\n\nNo rating here\nabc\tnot a rating\n");
        assert_eq!(reviews.len(), 3);
        assert_eq!(reviews[0].rating, Some(4.5));
        assert_eq!(reviews[0].text, "Lovely pasta");
        assert_eq!(reviews[1].rating, None);
        assert_eq!(reviews[2].text, "abc\tnot a rating");
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "rlens", "analyze", "Great food", "--aspect", "food", "--json",
        ])
        .unwrap();
        match args.command {
            Command::Analyze { text, aspect, json, .. } => {
                assert_eq!(text.as_deref(), Some("Great food"));
                assert_eq!(aspect.as_deref(), Some("food"));
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_print_json_accepts_multilingual_results() {
        let result = rlens_sentiment::MultilingualResult {
            result: rlens_sentiment::SentimentResult::empty(""),
            original_language: "en".to_string(),
            translated_text: None,
            translation_degraded: false,
        };
        assert!(print_json(&result).is_ok());
        assert!(print_json(&[result.result.clone()][..]).is_ok());
    }
}
