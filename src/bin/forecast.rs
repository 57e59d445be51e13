//! Command-line front end for the forecasting engine
//!
//! Usage:
//! ```
//! stock-forecast --data-dir data forecast AAPL --days 7 --sentiment 0.3
//! stock-forecast --data-dir data indicators MSFT
//! stock-forecast --data-dir data --sentiment-dir replies compare AAPL MSFT --days 30
//! stock-forecast risk 2 3 1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use stock_rnn::analysis::{analyze_symbol, analyze_symbols, compare, SymbolAnalysis};
use stock_rnn::data::{FileHistoryProvider, HistoryProvider};
use stock_rnn::forecast::{ForecastEngine, ForecastResult, Verdict};
use stock_rnn::indicators::IndicatorSet;
use stock_rnn::risk::{assess_risk, QUESTIONS};
use stock_rnn::sentiment::{
    ReplyFileSentimentProvider, SentimentProvider, SentimentSignal, StaticSentimentProvider,
};
use stock_rnn::utils::{init_logging, load_config, save_forecast_csv, EngineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "LSTM stock forecasting with sentiment drift")]
struct Cli {
    /// Engine configuration (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory with <SYMBOL>.json or <SYMBOL>.csv price history
    #[arg(short, long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Directory with stored sentiment replies (<SYMBOL>.txt)
    #[arg(long, global = true)]
    sentiment_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Print JSON instead of a report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a model and forecast one symbol
    Forecast {
        symbol: String,

        /// Days to predict
        #[arg(short = 'n', long, default_value = "7")]
        days: usize,

        /// Sentiment score in [-1, 1], overrides the sentiment directory
        #[arg(short, long, allow_hyphen_values = true)]
        sentiment: Option<f64>,

        /// Fixed seed for reproducible training
        #[arg(long)]
        seed: Option<u64>,

        /// Show a training progress bar
        #[arg(long)]
        progress: bool,

        /// Write the forecast as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Technical indicators of one symbol
    Indicators { symbol: String },
    /// Forecast two symbols in parallel and compare them
    Compare {
        first: String,
        second: String,

        #[arg(short = 'n', long, default_value = "7")]
        days: usize,
    },
    /// Score the risk questionnaire (three answers, each 1-3)
    Risk {
        #[arg(num_args = 3, value_parser = clap::value_parser!(u8).range(1..=3))]
        answers: Vec<u8>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match &cli.command {
        Command::Forecast {
            symbol,
            days,
            sentiment,
            seed,
            progress,
            output,
        } => {
            let mut config = config;
            if seed.is_some() {
                config.model.seed = *seed;
            }
            config.model.show_progress = *progress && !cli.json;
            let engine = ForecastEngine::new(config)?;

            let history = FileHistoryProvider::new(&cli.data_dir);
            let provider = sentiment_provider(&cli, symbol, *sentiment)?;
            let cancel = engine.config().cancel_token();
            let analysis =
                analyze_symbol(&engine, &history, provider.as_ref(), symbol, *days, &cancel)?;

            if let Some(path) = output {
                save_forecast_csv(&analysis.forecast, path)?;
                if !cli.json {
                    println!("{} {}", "Saved forecast to".green(), path.display());
                }
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }
        Command::Indicators { symbol } => {
            let engine = ForecastEngine::new(config)?;
            let series = FileHistoryProvider::new(&cli.data_dir).fetch_history(symbol)?;
            let indicators = engine.compute_indicators(&series)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&indicators)?);
            } else {
                print_header(&format!("{} indicators", series.symbol()));
                print_indicators(&indicators);
                if let Some(total) = series.total_return_pct() {
                    println!(
                        "{:<18} {:+.2}% over {} closes",
                        "Total return:",
                        total,
                        series.len()
                    );
                }
            }
        }
        Command::Compare {
            first,
            second,
            days,
        } => {
            let engine = ForecastEngine::new(config)?;
            let history = FileHistoryProvider::new(&cli.data_dir);
            let provider = sentiment_provider(&cli, first, None)?;

            let symbols = vec![first.clone(), second.clone()];
            let mut results = analyze_symbols(&engine, &history, provider.as_ref(), &symbols, *days);
            let (_, b) = results.pop().context("missing second analysis")?;
            let (_, a) = results.pop().context("missing first analysis")?;
            let (a, b) = (a?, b?);
            let comparison = compare(&a, &b);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                print_analysis(&a);
                print_analysis(&b);
                print_header("Comparison");
                println!(
                    "{:<22} {}",
                    "Stronger forecast:",
                    comparison.stronger_forecast.bold()
                );
                match &comparison.more_volatile {
                    Some(symbol) => println!("{:<22} {}", "More volatile:", symbol.bold()),
                    None => println!("{:<22} {}", "More volatile:", "n/a (short history)".dimmed()),
                }
            }
        }
        Command::Risk { answers } => {
            let assessment = assess_risk(answers)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                print_header("Risk profile");
                for (question, &answer) in QUESTIONS.iter().zip(answers.iter()) {
                    println!("{}", question.text);
                    println!("  -> {}", question.options[answer as usize - 1].cyan());
                }
                println!();
                println!("{:<12} {}", "Profile:", assessment.profile.to_string().bold());
                println!("{:<12} {}", "", assessment.profile.description());
                println!(
                    "{:<12} {}% bonds / {}% stocks",
                    "Portfolio:", assessment.bonds_pct, assessment.stocks_pct
                );
            }
        }
    }

    Ok(())
}

/// Explicit score, stored replies, or a neutral fallback
fn sentiment_provider(
    cli: &Cli,
    symbol: &str,
    score: Option<f64>,
) -> Result<Box<dyn SentimentProvider>> {
    if let Some(score) = score {
        let signal = SentimentSignal::new(score, "Provided on the command line")?;
        return Ok(Box::new(
            StaticSentimentProvider::new().with_signal(symbol, signal),
        ));
    }
    Ok(match &cli.sentiment_dir {
        Some(dir) => Box::new(ReplyFileSentimentProvider::new(dir)),
        None => Box::new(StaticSentimentProvider::new()),
    })
}

fn print_header(title: &str) {
    println!("\n{}", "=".repeat(60).blue());
    println!("{}", title.bold().blue());
    println!("{}", "=".repeat(60).blue());
}

fn print_indicators(indicators: &IndicatorSet) {
    let fmt_opt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));

    println!("{:<18} {:.2}", "Current price:", indicators.current_price);
    println!("{:<18} {}", "SMA short:", fmt_opt(indicators.sma_short));
    println!("{:<18} {}", "SMA long:", fmt_opt(indicators.sma_long));
    println!("{:<18} {:.2}", "RSI:", indicators.rsi);
    println!(
        "{:<18} {}",
        "Volatility:",
        indicators
            .volatility
            .map_or_else(|| "n/a".to_string(), |v| format!("{:.1}%", v * 100.0))
    );
    println!("{:<18} {}", "Signals:", indicators.summary());
}

fn print_forecast(forecast: &ForecastResult) {
    println!("\n{:>4} {:>12} {:>12}", "Day", "Date", "Price");
    println!("{}", "-".repeat(30));
    for (i, point) in forecast.points.iter().enumerate() {
        println!("{:>4} {:>12} {:>12.2}", i + 1, point.date, point.price);
    }

    let verdict = match forecast.verdict {
        Verdict::Buy => forecast.verdict.to_string().green().bold(),
        Verdict::Sell => forecast.verdict.to_string().red().bold(),
        Verdict::Hold => forecast.verdict.to_string().yellow().bold(),
    };

    println!();
    println!(
        "{:<18} {} ({}% confidence, heuristic)",
        "Verdict:", verdict, forecast.confidence
    );
    println!("{:<18} {:+.2}%", "Predicted move:", forecast.percent_change);
    println!(
        "{:<18} {:.6} (in-sample RMSE {:.4})",
        "Training loss:", forecast.training.final_loss, forecast.training.in_sample_rmse
    );
    if forecast.degenerate {
        println!("{}", "Flat price history: forecast repeats the last close".dimmed());
    }
}

fn print_analysis(analysis: &SymbolAnalysis) {
    print_header(&format!("{} forecast", analysis.symbol));
    match &analysis.indicators {
        Some(indicators) => print_indicators(indicators),
        None => println!("{}", "Indicators unavailable: history too short".dimmed()),
    }

    let sentiment = format!("{:+.2}", analysis.sentiment.score);
    let sentiment = if analysis.sentiment.score > 0.0 {
        sentiment.green()
    } else if analysis.sentiment.score < 0.0 {
        sentiment.red()
    } else {
        sentiment.normal()
    };
    println!("{:<18} {}", "Sentiment:", sentiment);
    if !analysis.sentiment.rationale.is_empty() {
        println!("{:<18} {}", "", analysis.sentiment.rationale.dimmed());
    }

    print_forecast(&analysis.forecast);
}
