//! tweetstats - descriptive statistics for tweet length and engagement
//!
//! Loads a record set (the seeded synthetic sample or a file), runs the
//! statistics engine and prints the report as terminal text, Markdown or
//! JSON. Also writes the sample fixture and filtered CSV exports.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/tweetstats/config.toml (~/.config/tweetstats/config.toml)
//! - Fixture: $XDG_DATA_HOME/tweetstats/sample_tweets.csv
//! - Logs: $XDG_STATE_HOME/tweetstats/tweetstats.log

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tweetstats_core::analytics::{FullReport, TimePatterns, TrendOutcome};
use tweetstats_core::ingest::delimited::write_csv_path;
use tweetstats_core::ingest::InputFormat;
use tweetstats_core::{
    generate_report, Config, ExternalSource, RecordFilter, RecordSource, SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(name = "tweetstats")]
#[command(about = "Descriptive statistics for tweet length and engagement")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a record set and print the full report
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// Only analyse posts by this user
        #[arg(long, conflicts_with = "live")]
        user: Option<String>,

        /// Output format (text, md, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Generate the synthetic sample and write it as CSV
    Generate {
        /// RNG seed (default: from config)
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (default: sample_tweets.csv in the data dir)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Write a filtered selection of records as CSV
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Only export posts by this user
        #[arg(long, conflicts_with = "live")]
        user: Option<String>,

        /// Only export posts from this year (repeatable)
        #[arg(long = "year", value_name = "YEAR")]
        years: Vec<i32>,

        /// Minimum word count
        #[arg(long)]
        min_words: Option<u32>,

        /// Maximum word count
        #[arg(long)]
        max_words: Option<u32>,

        /// Output file
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
}

/// Where records come from. The synthetic sample is the default.
#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// Use the built-in synthetic sample
    #[arg(long, conflicts_with_all = ["input", "live"])]
    sample: bool,

    /// Read records from a CSV, JSON or JSON Lines file
    #[arg(long, value_name = "FILE", conflicts_with = "live")]
    input: Option<PathBuf>,

    /// Format of --input (csv, json, jsonl); inferred from the extension otherwise
    #[arg(long, requires = "input")]
    input_format: Option<String>,

    /// Collect posts for a user (live collection is unavailable; uses the synthetic sample)
    #[arg(long, value_name = "USER")]
    live: Option<String>,

    /// First year to collect with --live
    #[arg(long, requires = "live")]
    from: Option<i32>,

    /// Last year to collect with --live
    #[arg(long, requires = "live")]
    to: Option<i32>,

    /// Seed for the synthetic sample (default: from config)
    #[arg(long, conflicts_with = "input")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = tweetstats_core::logging::init(&config.logging).ok();

    match cli.command {
        Command::Report {
            source,
            user,
            format,
        } => cmd_report(&config, &source, user, &format),
        Command::Generate { seed, out } => cmd_generate(&config, seed, out),
        Command::Export {
            source,
            user,
            years,
            min_words,
            max_words,
            out,
        } => {
            let mut filter = RecordFilter::new()
                .with_years(years)
                .with_word_range(min_words, max_words);
            filter.username = user;
            cmd_export(&config, &source, filter, &out)
        }
    }
}

fn build_source(
    config: &Config,
    args: &SourceArgs,
    mut filter: RecordFilter,
) -> Result<Box<dyn RecordSource>> {
    if let (Some(path), false) = (&args.input, args.sample) {
        let mut source = ExternalSource::new(path).with_filter(filter);
        if let Some(fmt) = &args.input_format {
            let format: InputFormat = fmt.parse().map_err(anyhow::Error::msg)?;
            source = source.with_format(format);
        }
        return Ok(Box::new(source));
    }

    let mut synthetic = SyntheticSource::from_config(&config.generator);
    if let Some(seed) = args.seed {
        synthetic = synthetic.with_seed(seed);
    }

    if let Some(user) = &args.live {
        let from = args.from.unwrap_or(config.generator.start_year);
        let to = args.to.unwrap_or(config.generator.end_year);
        if from > to {
            anyhow::bail!("--from ({from}) must not be after --to ({to})");
        }
        eprintln!(
            "Note: live collection is not available. Showing synthetic sample data for @{user}."
        );
        filter = filter.with_username(user.clone());
        if args.from.is_some() || args.to.is_some() {
            filter = filter.with_years(from..=to);
        }
    }

    Ok(Box::new(synthetic.with_filter(filter)))
}

fn cmd_report(
    config: &Config,
    args: &SourceArgs,
    user: Option<String>,
    format: &str,
) -> Result<()> {
    if !matches!(format, "text" | "md" | "json") {
        anyhow::bail!("Unknown format: {}. Use 'text', 'md' or 'json'", format);
    }

    let mut filter = RecordFilter::new();
    filter.username = user;
    let source = build_source(config, args, filter)?;
    tracing::info!(source = %source.describe(), format, "Generating report");
    let set = source
        .load()
        .with_context(|| format!("failed to load records from {}", source.describe()))?;
    let report = generate_report(&set, &config.analysis).context("failed to generate report")?;

    match format {
        "json" => print_json(&report)?,
        "md" => print_markdown(&report, &source.describe()),
        _ => print_terminal(&report, &source.describe()),
    }
    Ok(())
}

fn cmd_generate(config: &Config, seed: Option<u64>, out: Option<PathBuf>) -> Result<()> {
    let mut source = SyntheticSource::from_config(&config.generator);
    if let Some(seed) = seed {
        source = source.with_seed(seed);
    }
    let path = out.unwrap_or_else(|| config.generator.fixture_path());

    let set = source.generate();
    write_csv_path(&set, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "Generated {} sample tweets (seed {}) -> {}",
        set.len(),
        source.seed(),
        path.display()
    );
    Ok(())
}

fn cmd_export(config: &Config, args: &SourceArgs, filter: RecordFilter, out: &Path) -> Result<()> {
    let source = build_source(config, args, filter)?;
    let set = source
        .load()
        .with_context(|| format!("failed to load records from {}", source.describe()))?;
    write_csv_path(&set, out)
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(records = set.len(), path = %out.display(), "Exported records");

    println!("Exported {} records to {}", set.len(), out.display());
    Ok(())
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

fn print_terminal(report: &FullReport, source: &str) {
    let info = &report.dataset_info;

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", "TWEET LENGTH STATISTICS");
    println!("╰{}╯", "─".repeat(60));
    println!();

    println!("DATASET");
    println!("   Source:       {} ({})", source, info.source);
    println!(
        "   Tweets:       {} total, {} after outlier removal",
        info.total_tweets, info.clean_tweets
    );
    println!(
        "   Date range:   {} to {}",
        info.date_range.start.as_deref().unwrap_or("n/a"),
        info.date_range.end.as_deref().unwrap_or("n/a")
    );
    println!("   Users:        {}", info.unique_users);
    println!();

    let Some(stats) = &report.overall_stats else {
        println!("  No records left after outlier removal.");
        println!();
        return;
    };

    println!("OVERALL");
    println!(
        "   Mean:   {:<10.2} Median: {:<10} Mode: {}",
        stats.mean, stats.median, stats.mode
    );
    println!(
        "   Std:    {:<10} Var:    {:<10} CV:   {}%",
        fmt_opt(stats.std, 2),
        fmt_opt(stats.variance, 2),
        fmt_opt(stats.cv, 2)
    );
    let [min, q1, median, q3, max] = stats.five_number_summary();
    println!("   Five-number: {min} / {q1} / {median} / {q3} / {max}");
    println!(
        "   Skew:   {:<10} Kurt:   {}",
        fmt_opt(stats.skewness, 3),
        fmt_opt(stats.kurtosis, 3)
    );
    println!();

    if let Some(insights) = &report.insights {
        println!("INSIGHTS");
        println!("   Distribution: {:?}-skewed", insights.skew_direction);
        println!(
            "   Variability:  {:?} (CV {}%)",
            insights.variability,
            fmt_opt(insights.cv, 1)
        );
        println!(
            "   Typical:      {:.0}-{:.0} words (IQR)",
            insights.typical_range.0, insights.typical_range.1
        );
        println!("   Shape:        {}", insights.shape.as_str());
        println!();
    }

    if !report.yearly_stats.is_empty() {
        println!("BY YEAR");
        println!(
            "   {:<6} {:>7} {:>8} {:>8} {:>8}",
            "Year", "Tweets", "Mean", "Median", "Std"
        );
        for row in &report.yearly_stats {
            println!(
                "   {:<6} {:>7} {:>8.2} {:>8} {:>8}",
                row.year,
                row.tweet_count,
                row.stats.mean,
                row.stats.median,
                fmt_opt(row.stats.std, 2)
            );
        }
        println!();
    }

    println!("TRENDS");
    match &report.trends {
        TrendOutcome::Insufficient { message } => println!("   {}", message),
        TrendOutcome::Detected(trend) => {
            println!(
                "   {} -> {}: mean {:+.1}%, volatility {}",
                trend.first_year,
                trend.last_year,
                trend.mean_trend,
                trend
                    .volatility_trend
                    .map(|v| format!("{:+.1}%", v))
                    .unwrap_or_else(|| "n/a".to_string())
            );
            if let (Some(p), Some(significant)) = (trend.p_value, trend.significant_change) {
                println!(
                    "   p-value {:.4} ({})",
                    p,
                    if significant {
                        "significant"
                    } else {
                        "not significant"
                    }
                );
            }
            for line in &trend.description {
                println!("   - {}", line);
            }
        }
    }
    println!();

    if let Some(dist) = &report.distribution {
        println!("DISTRIBUTION");
        println!("   Type: {}", dist.distribution_type.as_str());
        let cells: Vec<String> = dist
            .percentiles
            .iter()
            .map(|p| format!("{}={}", p.label, p.value))
            .collect();
        println!("   {}", cells.join("  "));
        println!();
    }

    if !report.engagement.is_empty() {
        println!("ENGAGEMENT CORRELATION");
        for (metric, r) in &report.engagement {
            println!("   {:<14} {}", metric, fmt_opt(*r, 3));
        }
        println!();
    }

    if !report.user_comparison.is_empty() {
        println!("USERS");
        for user in &report.user_comparison {
            println!(
                "   @{:<16} {:>6} tweets  mean {:>6.2}  std {:>6}  engagement {}",
                user.username,
                user.tweet_count,
                user.stats.mean,
                fmt_opt(user.stats.std, 2),
                user.total_engagement
            );
        }
        println!();
    }

    if !report.industry_comparison.is_empty() {
        println!("INDUSTRIES");
        for row in &report.industry_comparison {
            println!(
                "   {:<12} {:>3} users {:>7} tweets  avg words {:>6.2}",
                row.industry, row.user_count, row.tweet_count, row.avg_words
            );
        }
        println!();
    }

    println!("TIME PATTERNS");
    println!(
        "   Peak hour:    {}",
        TimePatterns::hour_display(report.time_patterns.peak_hour)
    );
    println!(
        "   Busiest day:  {}",
        TimePatterns::day_name(report.time_patterns.busiest_day)
    );
    println!("   Months shown: {}", report.monthly_stats.len());
    println!();
}

fn print_markdown(report: &FullReport, source: &str) {
    let info = &report.dataset_info;

    println!("# Tweet Length Statistics");
    println!();
    println!("*Source: {} ({})*", source, info.source);
    println!();

    println!("## Dataset");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Total tweets | {} |", info.total_tweets);
    println!("| Clean tweets | {} |", info.clean_tweets);
    println!(
        "| Date range | {} to {} |",
        info.date_range.start.as_deref().unwrap_or("n/a"),
        info.date_range.end.as_deref().unwrap_or("n/a")
    );
    println!("| Unique users | {} |", info.unique_users);
    println!();

    if let Some(stats) = &report.overall_stats {
        println!("## Overall Statistics");
        println!();
        println!("| Statistic | Words |");
        println!("|-----------|-------|");
        println!("| Mean | {:.2} |", stats.mean);
        println!("| Median | {} |", stats.median);
        println!("| Mode | {} |", stats.mode);
        println!("| Std | {} |", fmt_opt(stats.std, 2));
        println!("| Variance | {} |", fmt_opt(stats.variance, 2));
        println!("| Min | {} |", stats.min);
        println!("| Q1 | {} |", stats.q1);
        println!("| Q3 | {} |", stats.q3);
        println!("| Max | {} |", stats.max);
        println!("| IQR | {} |", stats.iqr);
        println!("| Skewness | {} |", fmt_opt(stats.skewness, 3));
        println!("| Kurtosis | {} |", fmt_opt(stats.kurtosis, 3));
        println!("| CV | {}% |", fmt_opt(stats.cv, 2));
        println!();
    }

    if !report.yearly_stats.is_empty() {
        println!("## By Year");
        println!();
        println!("| Year | Tweets | Mean | Median | Std |");
        println!("|------|--------|------|--------|-----|");
        for row in &report.yearly_stats {
            println!(
                "| {} | {} | {:.2} | {} | {} |",
                row.year,
                row.tweet_count,
                row.stats.mean,
                row.stats.median,
                fmt_opt(row.stats.std, 2)
            );
        }
        println!();
    }

    println!("## Trends");
    println!();
    match &report.trends {
        TrendOutcome::Insufficient { message } => println!("*{}*", message),
        TrendOutcome::Detected(trend) => {
            println!("- **Period:** {} to {}", trend.first_year, trend.last_year);
            println!("- **Mean change:** {:+.1}%", trend.mean_trend);
            if let Some(v) = trend.volatility_trend {
                println!("- **Volatility change:** {:+.1}%", v);
            }
            if let Some(p) = trend.p_value {
                println!("- **p-value:** {:.4}", p);
            }
            for line in &trend.description {
                println!("- {}", line);
            }
        }
    }
    println!();

    if !report.user_comparison.is_empty() {
        println!("## Users");
        println!();
        println!("| User | Tweets | Mean | Std | Engagement |");
        println!("|------|--------|------|-----|------------|");
        for user in &report.user_comparison {
            println!(
                "| {} | {} | {:.2} | {} | {} |",
                user.displayname,
                user.tweet_count,
                user.stats.mean,
                fmt_opt(user.stats.std, 2),
                user.total_engagement
            );
        }
        println!();
    }

    println!("---");
    println!("*Generated by tweetstats*");
}

fn print_json(report: &FullReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
