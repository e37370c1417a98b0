//! synth-runner: headless dataset generation for the payments synthesizer.
//!
//! Usage:
//!   synth-runner --seed 42 --transactions 60000 --out-dir ./out
//!   synth-runner --config data/festive_heavy.json --db run.db --verify

use anyhow::{bail, Result};
use chrono::NaiveDate;
use paysynth_core::{
    config::{AllocationPolicy, SynthConfig},
    generator::{Dataset, DatasetGenerator},
    integrity::check_dataset,
    sink::{CsvSink, DatasetSink},
    store::DatasetStore,
    summary::DatasetSummary,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = build_config(&args)?;
    let out_dir = flag_value(&args, "--out-dir").unwrap_or(".");
    let db = flag_value(&args, "--db");
    let summary_json = flag_value(&args, "--summary-json");
    let verify = args.iter().any(|a| a == "--verify");

    println!("Payments dataset synthesizer - synth-runner");
    println!("  seed:          {}", config.random_seed);
    println!("  users:         {}", config.population_size);
    println!("  transactions:  {}", config.transaction_count);
    println!(
        "  date range:    {} to {}",
        config.date_range.start, config.date_range.end
    );
    println!("  allocation:    {:?}", config.allocation);
    println!("  out_dir:       {out_dir}");
    println!();

    let generator = DatasetGenerator::new(config)?;
    let dataset = generator.generate()?;

    let mut csv = CsvSink::create_in(out_dir)?;
    csv.write_dataset(&dataset)?;
    let (users_path, txns_path) = CsvSink::paths_in(out_dir);
    println!("  wrote {}", txns_path.display());
    println!("  wrote {}", users_path.display());

    if let Some(db) = db {
        let seed = generator.config().random_seed;
        let run_id = format!("run-{seed}-{}", chrono_tick());
        let mut store = DatasetStore::open(db)?;
        store.migrate()?;
        store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"))?;
        store.sink(&run_id).write_dataset(&dataset)?;
        println!("  stored run {run_id} in {db}");
    }

    let summary = DatasetSummary::from_dataset(&dataset);
    print_summary(&summary);

    if let Some(path) = summary_json {
        std::fs::write(path, serde_json::to_string_pretty(&summary)?)?;
        println!("  summary json:   {path}");
    }

    if verify {
        verify_dataset(&dataset, generator.config())?;
    }

    Ok(())
}

/// Config file (if any), then command-line overrides.
fn build_config(args: &[String]) -> Result<SynthConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::default(),
    };
    config.random_seed = parse_arg(args, "--seed", config.random_seed);
    config.population_size = parse_arg(args, "--users", config.population_size);
    config.transaction_count = parse_arg(args, "--transactions", config.transaction_count);
    if let Some(start) = flag_value(args, "--start") {
        config.date_range.start = parse_date(start)?;
    }
    if let Some(end) = flag_value(args, "--end") {
        config.date_range.end = parse_date(end)?;
    }
    if args.iter().any(|a| a == "--largest-remainder") {
        config.allocation = AllocationPolicy::LargestRemainder;
    }
    Ok(config)
}

fn verify_dataset(dataset: &Dataset, config: &SynthConfig) -> Result<()> {
    let violations = check_dataset(dataset, config);
    if violations.is_empty() {
        println!("  integrity:      ok");
        return Ok(());
    }
    for v in violations.iter().take(20) {
        log::error!("{:?} on {}: {}", v.kind, v.row_id, v.detail);
    }
    bail!("{} integrity violations", violations.len())
}

fn print_summary(s: &DatasetSummary) {
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  transactions:   {}", s.transaction_count);
    println!("  users:          {}", s.user_count);
    if let (Some(first), Some(last)) = (s.first_datetime, s.last_datetime) {
        println!("  date range:     {first} to {last}");
    }
    println!(
        "  amount:         min {:.2} | median {:.2} | mean {:.2} | max {:.2}",
        s.amount.min, s.amount.median, s.amount.mean, s.amount.max
    );
    println!("  failure rate:   {:.1}%", s.failure_rate() * 100.0);
    println!(
        "  flagged:        {} ({:.1}%)",
        s.flagged_count,
        s.flagged_rate * 100.0
    );
    println!(
        "  refunded:       {} ({:.1}%)",
        s.refunded_count,
        s.refunded_rate * 100.0
    );
    println!(
        "  cashback:       {} txns, Rs.{:.2}",
        s.cashback_count, s.cashback_total
    );
    println!(
        "  discounts:      {} txns, Rs.{:.2}",
        s.discount_count, s.discount_total
    );

    print_counts("STATUS", &s.by_status);
    print_counts("PAYMENT METHOD", &s.by_method);
    print_counts("CATEGORY", &s.by_category);
    print_counts("MONTH", &s.by_month);
    print_counts("USER TIER", &s.users_by_tier);
    print_counts("USER PERSONA", &s.users_by_persona);
}

fn print_counts(title: &str, counts: &std::collections::BTreeMap<String, usize>) {
    println!();
    println!("=== {title} ===");
    for (label, n) in counts {
        println!("  {label:<20} {n}");
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{raw}': {e}"))
}

fn chrono_tick() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
