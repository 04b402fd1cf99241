mod catalog;
mod model;
mod normalize;
mod pipeline;
mod settings;
mod source;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::model::{CardType, Catalog};
use crate::pipeline::Generation;
use crate::settings::Settings;
use crate::source::http::HttpFetcher;
use crate::source::remote::{PaginateOptions, RemoteSource};
use crate::source::sample::SampleSource;

#[derive(Parser)]
#[command(name = "optcg_catalog", about = "One Piece TCG card catalog generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the catalog from the built-in sample cards
    Sample {
        /// Output file (default: OPTCG_OUTPUT or cards_database.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build the catalog by paginating the card API
    Fetch {
        /// Output file (default: OPTCG_OUTPUT or cards_database.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Stop after this many pages (default: until the listing ends)
        #[arg(short = 'n', long)]
        max_pages: Option<u32>,
    },
    /// Summarize an existing catalog file
    Stats {
        /// Catalog to read (default: OPTCG_OUTPUT or cards_database.json)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Sample { output } => {
            let path = output.unwrap_or_else(|| settings.output.clone());
            let mut source = SampleSource::builtin();
            let outcome = pipeline::generate(&mut source, &path).await?;
            report(outcome)
        }
        Commands::Fetch { output, max_pages } => {
            let path = output.unwrap_or_else(|| settings.output.clone());
            let fetcher = HttpFetcher::new(&settings)?;
            let options = PaginateOptions {
                delay: settings.rate_limit(),
                max_pages,
            };
            let mut source = RemoteSource::new(fetcher, options).with_progress(spinner()?);
            println!("Fetching cards from {} ...", settings.api_base);
            let outcome = pipeline::generate(&mut source, &path).await?;
            report(outcome)
        }
        Commands::Stats { input } => {
            let path = input.unwrap_or_else(|| settings.output.clone());
            let catalog = catalog::read_catalog(&path)?;
            print_stats(&path, &catalog);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn spinner() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    Ok(pb)
}

fn report(outcome: Generation) -> anyhow::Result<()> {
    match outcome {
        Generation::Written { path, sets, cards } => {
            println!("Saved {:?}", path);
            println!("  {} sets", sets);
            println!("  {} cards", cards);
            Ok(())
        }
        Generation::Empty => {
            anyhow::bail!("No cards were obtained (0 cards generated); catalog not written")
        }
    }
}

fn print_stats(path: &Path, catalog: &Catalog) {
    println!("Catalog: {:?}", path);
    println!("Sets:    {}", catalog.sets.len());
    println!("Cards:   {}\n", catalog.cards.len());

    if catalog.sets.is_empty() {
        return;
    }

    println!(
        "{:<6} | {:<30} | {:<10} | {:>5} | {:>4} {:>4} {:>4} {:>4}",
        "Code", "Name", "Released", "Cards", "Ldr", "Chr", "Evt", "Stg"
    );
    println!("{}", "-".repeat(86));

    for set in &catalog.sets {
        let in_set: Vec<_> = catalog.cards_in_set(&set.code).collect();
        let by_type: Vec<usize> = CardType::ALL
            .iter()
            .map(|t| in_set.iter().filter(|c| c.card_type == *t).count())
            .collect();
        println!(
            "{:<6} | {:<30} | {:<10} | {:>5} | {:>4} {:>4} {:>4} {:>4}",
            set.code,
            truncate(&set.name, 30),
            set.release_date.as_deref().unwrap_or("-"),
            in_set.len(),
            by_type[0],
            by_type[1],
            by_type[2],
            by_type[3],
        );
    }

    let orphans = catalog.cards.iter().filter(|c| c.set_code.is_empty()).count();
    if orphans > 0 {
        println!("\n{} cards without a set", orphans);
    }
    if let Some(meta) = &catalog.metadata {
        println!(
            "\nGenerated {} from {} source ({} cards)",
            meta.generated_at.to_rfc3339(),
            meta.source,
            meta.total_cards
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_width() {
        assert_eq!(truncate("Uta", 30), "Uta");
        let long = truncate("The Seven Warlords of the Sea and Friends", 30);
        assert_eq!(long.chars().count(), 30);
        assert!(long.ends_with("..."));
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }

    #[test]
    fn empty_generation_is_an_error() {
        assert!(report(Generation::Empty).is_err());
    }

    #[test]
    fn cli_parses_fetch_flags() {
        let cli = Cli::try_parse_from(["optcg_catalog", "fetch", "-n", "3", "-o", "out.json"]).unwrap();
        match cli.command {
            Commands::Fetch { output, max_pages } => {
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert_eq!(max_pages, Some(3));
            }
            _ => panic!("expected fetch"),
        }
    }
}
