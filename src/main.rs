use clap::Parser;
use std::{error::Error, path::PathBuf, process};
use tracing::{debug, error, Level};
use tracing_subscriber::FmtSubscriber;
use typetrend::{
    config::{ChartConfig, ConfigStore, FileConfigStore},
    pipeline, util,
};

/// daily typing performance trends from a csv session log
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reads a csv log of typing-test sessions (timestamp, wpm, acc), averages them per day and writes a daily trend chart, a wpm histogram and a wpm vs accuracy scatter plot."
)]
pub struct Cli {
    /// csv log with timestamp (ms since epoch), wpm and acc columns
    #[clap(default_value = "results.csv")]
    file: PathBuf,

    /// directory to write the charts into
    #[clap(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// number of histogram buckets, 1 to 1000 (overrides the saved config)
    #[clap(short = 'b', long, value_parser = clap::value_parser!(u16).range(1..=util::MAX_BINS as i64))]
    bins: Option<u16>,

    /// persist the effective chart settings as the new defaults
    #[clap(long)]
    save_config: bool,

    /// log every skipped cell and dropped row
    #[clap(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// only log errors
    #[clap(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::INFO
        }
    }

    /// Overlay command line settings on the stored config
    fn to_chart_config(&self, stored: ChartConfig) -> ChartConfig {
        ChartConfig {
            histogram_bins: self
                .bins
                .map_or(stored.histogram_bins, usize::from)
                .clamp(1, util::MAX_BINS),
            ..stored
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    debug!("arguments: {:?}", cli);

    let store = FileConfigStore::new();
    let cfg = cli.to_chart_config(store.load());

    if cli.save_config {
        store.save(&cfg)?;
        debug!(path = %store.path().display(), "saved chart config");
    }

    match pipeline::run(&cli.file, &cli.output_dir, &cfg) {
        Ok(report) => {
            println!("{}", report.summary);
            for path in &report.outputs {
                println!("wrote {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
