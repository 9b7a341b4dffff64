use jobcard_exporter_lib::{chrome, config, logger, snapshot, PageDriver, RunError, Runner, ScrapeConfig};

use log::{error, info, warn};
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    info!("Starting Job Card Exporter...");

    let mut config_path = config::DEFAULT_CONFIG_FILE.to_string();
    let mut overrides = Overrides::default();
    if !parse_args(std::env::args().skip(1), &mut config_path, &mut overrides) {
        return Ok(());
    }

    let mut config = ScrapeConfig::load(&config_path);
    overrides.apply(&mut config);

    let mut driver: Box<dyn PageDriver> = if let Some(dir) = &config.snapshot_dir {
        info!("Replaying snapshots from {:?}", dir);
        Box::new(snapshot::SnapshotDriver::open(dir)?)
    } else if let Some(url) = &config.target_url {
        info!("Driving {} (headless: {})", url, config.headless);
        Box::new(chrome::ChromeDriver::launch(url, config.headless)?)
    } else {
        error!("Nothing to scrape: set target_url or snapshot_dir in {}", config_path);
        return Ok(());
    };

    let runner = Runner::new(config);
    match runner.run(driver.as_mut()) {
        Ok(summary) => {
            info!("Run complete: {} records exported.", summary.count);
            if !summary.errors.is_empty() {
                warn!("{} records came back without detail fields.", summary.errors.len());
            }
            Ok(())
        }
        Err(RunError::EmptyResult) => {
            // User-visible outcome, not a process failure.
            error!("No data found. Check your selectors.");
            Ok(())
        }
        Err(e) => {
            error!("Export failed: {}", e);
            Err(e.into())
        }
    }
}

#[derive(Default)]
struct Overrides {
    url: Option<String>,
    output: Option<PathBuf>,
    max_items: Option<usize>,
    settle_ms: Option<u64>,
    dry_run: bool,
}

impl Overrides {
    fn apply(&self, config: &mut ScrapeConfig) {
        if let Some(url) = &self.url {
            config.target_url = Some(url.clone());
            config.snapshot_dir = None;
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(max_items) = self.max_items {
            // 0 means "no cap".
            config.max_items = if max_items == 0 { None } else { Some(max_items) };
        }
        if let Some(settle_ms) = self.settle_ms {
            config.settle_ms = settle_ms;
        }
        if self.dry_run {
            config.dry_run = true;
        }
    }
}

/// Hand-rolled flag parsing; the surface is small enough not to need more.
/// Returns false when the arguments were bad and usage was printed.
fn parse_args<I: Iterator<Item = String>>(
    mut args: I,
    config_path: &mut String,
    overrides: &mut Overrides,
) -> bool {
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dry-run" => overrides.dry_run = true,
            "--url" => match args.next() {
                Some(url) => overrides.url = Some(url),
                None => return usage("--url needs a value"),
            },
            "--output" => match args.next() {
                Some(path) => overrides.output = Some(PathBuf::from(path)),
                None => return usage("--output needs a value"),
            },
            "--max-items" => match args.next().and_then(|v| v.parse().ok()) {
                Some(n) => overrides.max_items = Some(n),
                None => return usage("--max-items needs a number"),
            },
            "--settle-ms" => match args.next().and_then(|v| v.parse().ok()) {
                Some(ms) => overrides.settle_ms = Some(ms),
                None => return usage("--settle-ms needs a number"),
            },
            flag if flag.starts_with("--") => return usage(&format!("unknown flag {}", flag)),
            path => *config_path = path.to_string(),
        }
    }
    true
}

fn usage(problem: &str) -> bool {
    error!("{}", problem);
    eprintln!(
        "Usage: jobcard_exporter [CONFIG.json] [--url URL] [--output PATH] \
         [--max-items N] [--settle-ms MS] [--dry-run]"
    );
    false
}
