//! # pairscan
//!
//! Command-line interface for the pair clustering pipeline: build the
//! BTC/ETH feature table, cluster trading days by density, and compare
//! the clustering's noise against the statistical flagger.

use std::fs::File;
use std::path::PathBuf;

use anomaly::{compare_methods, StdDevFlagger};
use clap::{Parser, Subcommand};
use cluster::{run, ExpansionPolicy, LabelAssignment, RunConfig};
use data::{
    build_pair_features, label_from_code, read_close_series, read_feature_table,
    read_labeled_table, write_feature_table, write_labeled_table,
};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "pairscan")]
#[command(about = "Density clustering of crypto pair trading days", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the pair feature table from two daily bar CSV files
    Features {
        /// BTC bar CSV (timestamp and close columns)
        #[arg(long)]
        btc: PathBuf,

        /// ETH bar CSV (timestamp and close columns)
        #[arg(long)]
        eth: PathBuf,

        /// Output CSV for the feature table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Cluster trading days in a feature table
    Cluster {
        /// Input feature-table CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Neighborhood radius (inclusive)
        #[arg(short, long)]
        eps: f64,

        /// Minimum neighborhood size for a core point
        #[arg(short, long)]
        min_pts: usize,

        /// Comma-separated feature columns used for distance
        #[arg(short, long)]
        features: String,

        /// Border re-expansion policy (classic, reexpand)
        #[arg(long, default_value = "classic")]
        policy: String,

        /// Labeled CSV output (feature table plus cluster column)
        #[arg(short, long)]
        labels: Option<PathBuf>,

        /// JSON summary output file (printed to stdout otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare clustering noise with the standard-deviation flagger
    Compare {
        /// Labeled CSV as written by the cluster command
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated feature columns to flag on
        #[arg(short, long)]
        features: String,

        /// Standard-deviation threshold
        #[arg(long, default_value = "2.5")]
        n_std: f64,

        /// JSON report output file (printed to stdout otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download daily crypto bars to CSV
    #[cfg(feature = "fetch")]
    Fetch {
        /// Symbol, e.g. BTC/USD
        #[arg(short, long)]
        symbol: String,

        /// Start date (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Split a comma-separated feature list.
fn parse_features(raw: &str) -> CliResult<Vec<String>> {
    let features: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if features.is_empty() {
        return Err("No feature columns given".to_string());
    }
    Ok(features)
}

fn parse_policy(raw: &str) -> CliResult<ExpansionPolicy> {
    match raw.to_lowercase().as_str() {
        "classic" => Ok(ExpansionPolicy::Classic),
        "reexpand" => Ok(ExpansionPolicy::Reexpand),
        _ => Err(format!(
            "Unknown policy: {}. Use 'classic' or 'reexpand'",
            raw
        )),
    }
}

/// Write a JSON value to a file or stdout.
fn write_json(json: &serde_json::Value, output: Option<&PathBuf>) -> CliResult<()> {
    if let Some(path) = output {
        let mut file = File::create(path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("Results written to {:?}", path);
    } else {
        match serde_json::to_string_pretty(json) {
            Ok(text) => println!("{}", text),
            Err(e) => return Err(format!("Failed to render JSON: {}", e)),
        }
    }
    Ok(())
}

/// Build feature table command
fn run_features(btc: PathBuf, eth: PathBuf, output: PathBuf) -> CliResult<()> {
    let btc_series = read_close_series(&btc).map_err(|e| e.to_string())?;
    let eth_series = read_close_series(&eth).map_err(|e| e.to_string())?;
    println!(
        "Loaded {} BTC and {} ETH daily closes",
        btc_series.len(),
        eth_series.len()
    );

    let table = build_pair_features(&btc_series, &eth_series).map_err(|e| e.to_string())?;
    write_feature_table(&output, &table).map_err(|e| e.to_string())?;
    println!(
        "Wrote {} rows x {} columns to {:?}",
        table.len(),
        table.columns().len(),
        output
    );
    Ok(())
}

/// Run clustering command
#[allow(clippy::too_many_arguments)]
fn run_cluster(
    input: PathBuf,
    eps: f64,
    min_pts: usize,
    features: String,
    policy: String,
    labels: Option<PathBuf>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let table = read_feature_table(&input).map_err(|e| e.to_string())?;
    println!("Loaded {} rows from {:?}", table.len(), input);

    let config = RunConfig::new(eps, min_pts, parse_features(&features)?)
        .with_policy(parse_policy(&policy)?);
    let outcome = run(&table, &config).map_err(|e| e.to_string())?;

    println!("Found {} clusters", outcome.summary.cluster_count);
    println!("Found {} noise days", outcome.summary.noise_count);

    if let Some(path) = labels {
        write_labeled_table(&path, &table, &outcome.assignment).map_err(|e| e.to_string())?;
        println!("Labels written to {:?}", path);
    }

    let cluster_sizes: Vec<serde_json::Value> = outcome
        .assignment
        .clusters()
        .iter()
        .map(|(id, members)| {
            serde_json::json!({
                "id": id,
                "size": members.len(),
                "first": members.first(),
                "last": members.last()
            })
        })
        .collect();

    let json = serde_json::json!({
        "eps": eps,
        "min_pts": min_pts,
        "features": config.features,
        "policy": policy,
        "total_rows": table.len(),
        "cluster_count": outcome.summary.cluster_count,
        "noise_count": outcome.summary.noise_count,
        "noise_keys": outcome.assignment.noise_keys(),
        "clusters": cluster_sizes
    });
    write_json(&json, output.as_ref())
}

/// Run comparison command
fn run_compare(
    input: PathBuf,
    features: String,
    n_std: f64,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let (table, codes) = read_labeled_table(&input).map_err(|e| e.to_string())?;
    println!("Loaded {} labeled rows from {:?}", table.len(), input);

    let mut labels = std::collections::BTreeMap::new();
    for (key, code) in codes {
        let label = label_from_code(code)
            .ok_or_else(|| format!("Invalid cluster code {} at row {}", code, key))?;
        labels.insert(key, label);
    }
    let assignment = LabelAssignment::new(labels);

    let flags = StdDevFlagger::new(n_std)
        .flag(&table, &parse_features(&features)?)
        .map_err(|e| e.to_string())?;
    let report = compare_methods(&table, &flags, &assignment).map_err(|e| e.to_string())?;

    println!("Statistical anomalies: {}", report.statistical_count);
    println!("Clustering noise days: {}", report.cluster_noise_count);
    println!("Flagged by both methods: {}", report.both.len());
    println!("Agreement rate: {:.2}%", report.agreement_rate * 100.0);

    let json = serde_json::json!({
        "n_std": n_std,
        "total_rows": report.total_rows,
        "statistical_count": report.statistical_count,
        "cluster_noise_count": report.cluster_noise_count,
        "both": report.both,
        "statistical_only": report.statistical_only,
        "cluster_only": report.cluster_only,
        "agreement_rate": report.agreement_rate
    });
    write_json(&json, output.as_ref())
}

/// Download bars command
#[cfg(feature = "fetch")]
fn run_fetch(symbol: String, start: String, end: String, output: PathBuf) -> CliResult<()> {
    let client = data::AlpacaClient::from_env().map_err(|e| e.to_string())?;
    let bars = client
        .fetch_blocking(&symbol, &start, &end)
        .map_err(|e| e.to_string())?;
    println!("Fetched {} daily bars for {}", bars.len(), symbol);

    data::write_bars_csv(&output, &bars).map_err(|e| e.to_string())?;
    println!("Bars written to {:?}", output);
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Features { btc, eth, output } => run_features(btc, eth, output),

        Commands::Cluster {
            input,
            eps,
            min_pts,
            features,
            policy,
            labels,
            output,
        } => run_cluster(input, eps, min_pts, features, policy, labels, output),

        Commands::Compare {
            input,
            features,
            n_std,
            output,
        } => run_compare(input, features, n_std, output),

        #[cfg(feature = "fetch")]
        Commands::Fetch {
            symbol,
            start,
            end,
            output,
        } => run_fetch(symbol, start, end, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
