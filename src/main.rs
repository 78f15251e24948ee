//! Pixabay search: command-line host
//!
//! Drives the provider contract once, the way a desktop search host would:
//! initial result set, filtering, metadata and optionally activation.

use anyhow::{bail, Result};
use pixabay_search::{config, ImageSearchProvider, SearchProvider};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    activate: bool,
    max_results: Option<usize>,
    terms: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1))? {
        Some(args) => args,
        None => return Ok(()),
    };

    // Load configuration
    let settings = config::load(args.config.as_deref())?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting pixabay-search v{}", pixabay_search::VERSION);

    let provider = ImageSearchProvider::from_settings(&settings)?;
    let cancellable = CancellationToken::new();

    let ctrl_c = cancellable.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut ids = provider
        .get_initial_result_set(&args.terms, &cancellable)
        .await?;
    if let Some(max) = args.max_results {
        ids = provider.filter_results(&ids, max);
    }

    let metas = provider.get_result_metas(&ids, &cancellable).await?;
    if metas.is_empty() {
        println!("No results. Searches start with '{}'.", settings.search.prefix);
    }
    for meta in &metas {
        println!(
            "{:>10}  {}  {}",
            meta.id,
            meta.name,
            meta.description.as_deref().unwrap_or_default()
        );
    }

    if args.activate {
        if let Some(first) = ids.first() {
            provider.activate_result(first, &args.terms);
        }
    }

    info!("Metrics: {}", serde_json::to_string(&provider.metrics())?);
    provider.teardown();
    Ok(())
}

/// Parse arguments; `None` means usage or version was printed
fn parse_args(raw: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut args = Args::default();
    let mut raw = raw;

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("pixabay-search {}", pixabay_search::VERSION);
                return Ok(None);
            }
            "-c" | "--config" => match raw.next() {
                Some(path) => args.config = Some(PathBuf::from(path)),
                None => bail!("{} requires a file argument", arg),
            },
            "-n" | "--max-results" => match raw.next().map(|n| n.parse()) {
                Some(Ok(n)) => args.max_results = Some(n),
                _ => bail!("{} requires a number", arg),
            },
            "-a" | "--activate" => args.activate = true,
            "--" => {
                args.terms.extend(raw.by_ref());
            }
            _ => args.terms.push(arg),
        }
    }

    Ok(Some(args))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
pixabay-search v{}
Debounced Pixabay image search provider

USAGE:
    pixabay-search [OPTIONS] <TERMS>...

    Terms only reach Pixabay when the first one starts with the prefix,
    e.g. `pixabay-search p: yellow flowers`.

OPTIONS:
    -c, --config <FILE>        Path to configuration file
    -n, --max-results <N>      Keep only the first N results
    -a, --activate             Open the first result in the external viewer
    -h, --help                 Print help information
    -V, --version              Print version information

ENVIRONMENT VARIABLES:
    PIXABAY_SEARCH_SETTINGS    Path to settings.yml
    PIXABAY_API_KEY            Pixabay API key
    PIXABAY_LANG               Result language
    PIXABAY_DEBOUNCE_MS        Debounce delay in milliseconds
    PIXABAY_DEBUG              Enable debug logging (true/false)
    PIXABAY_BASE_URL           API endpoint
"#,
        pixabay_search::VERSION
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &[&str]) -> Option<Args> {
        parse_args(raw.iter().map(|s| s.to_string())).unwrap()
    }

    #[test]
    fn test_parse_terms_and_flags() {
        let args = parse(&["-c", "my.yml", "-n", "3", "--activate", "p:", "cats"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("my.yml")));
        assert_eq!(args.max_results, Some(3));
        assert!(args.activate);
        assert_eq!(args.terms, vec!["p:", "cats"]);
    }

    #[test]
    fn test_parse_help() {
        assert!(parse(&["--help"]).is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(["-c".to_string()].into_iter()).is_err());
        assert!(parse_args(["-n".to_string(), "x".to_string()].into_iter()).is_err());
    }

    #[test]
    fn test_double_dash_keeps_flags_as_terms() {
        let args = parse(&["--", "p:", "-a"]).unwrap();
        assert!(!args.activate);
        assert_eq!(args.terms, vec!["p:", "-a"]);
    }
}
