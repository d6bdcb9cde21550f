use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tally_core::{Classifier, EngineConfig, FuzzyConfig, TransactionCandidate};
use tally_sqlite::SqliteStore;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "tally-import")]
#[command(about = "Suggest categories and entities for imported bank transactions")]
#[command(version)]
struct Args {
    /// SQLite database holding rules, entities and categories
    #[arg(long)]
    db: PathBuf,

    /// User whose rules and names are used
    #[arg(short, long)]
    user: i64,

    /// JSON lines file of transactions (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON engine configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fuzzy fallback threshold, above 0 and up to 100 (overrides config and environment)
    #[arg(long)]
    threshold: Option<f64>,

    /// Log level (debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = load_config(&args)?;
    let store = SqliteStore::open(&args.db)?;
    let classifier = Classifier::with_config(store, &config);

    let transactions = match &args.input {
        Some(path) => read_transactions(BufReader::new(File::open(path)?))?,
        None => read_transactions(io::stdin().lock())?,
    };
    info!(
        user_id = args.user,
        count = transactions.len(),
        "classifying transactions"
    );

    let results = classifier.classify_batch(args.user, &transactions)?;

    let mut out = BufWriter::new(io::stdout().lock());
    for result in &results {
        serde_json::to_writer(&mut out, result)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(())
}

fn init_logging(log_level: &str) {
    let level = match log_level {
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    // stdout carries the results
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the config file, then environment, then flags
fn load_config(args: &Args) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            EngineConfig::from_json(&json)
                .map_err(|e| format!("invalid config '{}': {}", path.display(), e))?
        }
        None => EngineConfig::default(),
    };
    let mut config = config.with_env_overrides();

    if let Some(threshold) = args.threshold {
        if !FuzzyConfig::is_valid_threshold(threshold) {
            return Err(format!("threshold must be above 0 and at most 100, got {}", threshold).into());
        }
        config.fuzzy.threshold = threshold;
    }

    Ok(config)
}

/// One JSON transaction per line; blank lines are skipped
fn read_transactions(
    reader: impl BufRead,
) -> Result<Vec<TransactionCandidate>, Box<dyn std::error::Error>> {
    let mut transactions = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let txn: TransactionCandidate = serde_json::from_str(&line)
            .map_err(|e| format!("line {}: {}", index + 1, e))?;
        transactions.push(txn);
    }
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_json_lines() {
        let input = concat!(
            r#"{"description": "COMPRA LIDL", "amount": "12.30", "type": "E"}"#,
            "\n\n",
            r#"{"description": "SALARY", "amount": 1500, "type": "income","#,
            r#" "account_to_id": 2}"#,
            "\n",
        );
        let txns = read_transactions(input.as_bytes()).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].account_to_id, Some(2));
        assert_eq!(txns[0].account_from_id, None);
    }

    #[test]
    fn malformed_line_reports_its_number() {
        let input = concat!(
            r#"{"description": "ok", "amount": 1, "type": "E"}"#,
            "\n",
            r#"{"description": "bad", "amount": 1, "type": "X"}"#,
            "\n",
        );
        let err = read_transactions(input.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{err}");
    }

    #[test]
    fn threshold_flag_overrides_config() {
        let args = |threshold: &str| {
            Args::parse_from([
                "tally-import",
                "--db",
                "x.db",
                "--user",
                "1",
                "--threshold",
                threshold,
            ])
        };

        let config = load_config(&args("65")).unwrap();
        assert_eq!(config.fuzzy.threshold, 65.0);

        assert!(load_config(&args("101")).is_err());
        assert!(load_config(&args("0")).is_err());
    }
}
