//! CLI binary for lorem-press.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GenerationConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use lorem_press::{
    generate, BatchResult, GenerationConfig, GenerationProgressCallback, ProgressCallback,
};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use url::Url;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a log line per
/// item. Items finish in any order.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-item wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} posts  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Generating");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn elapsed_secs(&self, item: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&item)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {total} posts…"))
        ));
    }

    fn on_item_start(&self, item: usize, _total: usize) {
        self.start_times
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(item, Instant::now());
    }

    fn on_item_complete(&self, item: usize, total: usize, path: &Path) {
        let secs = self.elapsed_secs(item);
        self.bar.println(format!(
            "  {} Post {:>3}/{:<3}  {}  {}",
            green("✓"),
            item,
            total,
            path.display(),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, item: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(item);
        // Keep long transport errors on one line.
        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Post {:>3}/{:<3}  {}  {}",
            red("✗"),
            item,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let failed = total.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} posts written",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} posts written  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # 20 posts into ./posts
  lorempress

  # 100 posts into a Hugo content directory
  lorempress -n 100 -o site/content/posts

  # Custom taxonomy
  lorempress --tags rust,async --categories notes

  # Machine-readable result
  lorempress -n 5 --json > result.json

ENVIRONMENT VARIABLES:
  LOREMPRESS_COUNT    Default for --count
  LOREMPRESS_OUTPUT   Default for --output
  LOREMPRESS_SOURCE   Default for --source
  RUST_LOG            Log filter (overrides --verbose / --quiet)
"#;

/// Generate synthetic Markdown blog posts for static site generators.
#[derive(Parser, Debug)]
#[command(
    name = "lorempress",
    version,
    about = "Generate synthetic Markdown blog posts for static site generators",
    long_about = "Fetches random lorem-markdownum documents concurrently, turns the first \
top-level heading into the post title, places a placeholder image above every sub-heading \
and writes each post with YAML front matter as <output>/<slug>.md.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Number of posts to generate.
    #[arg(short = 'n', long, env = "LOREMPRESS_COUNT", default_value_t = 20)]
    count: usize,

    /// Directory the posts are written into.
    #[arg(short, long, env = "LOREMPRESS_OUTPUT", default_value = "./posts")]
    output: PathBuf,

    /// Markdown source URL.
    #[arg(long, env = "LOREMPRESS_SOURCE")]
    source: Option<Url>,

    /// Comma-separated tags for every post.
    #[arg(long, env = "LOREMPRESS_TAGS", value_delimiter = ',')]
    tags: Option<Vec<String>>,

    /// Comma-separated categories for every post.
    #[arg(long, env = "LOREMPRESS_CATEGORIES", value_delimiter = ',')]
    categories: Option<Vec<String>>,

    /// Per-request fetch timeout in seconds.
    #[arg(long, env = "LOREMPRESS_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Fail instead of creating a missing output directory.
    #[arg(long)]
    no_create: bool,

    /// Print the batch result as JSON on stdout.
    #[arg(long, env = "LOREMPRESS_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "LOREMPRESS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LOREMPRESS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LOREMPRESS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs are suppressed while the progress bar is up.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn GenerationProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run batch ────────────────────────────────────────────────────────
    let start = Instant::now();
    let result = generate(cli.count, &cli.output, &config)
        .await
        .context("Generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
    } else {
        match &result {
            BatchResult::Success(paths) => {
                for path in paths {
                    println!("{}", path.display());
                }
            }
            BatchResult::Failure(errors) => {
                for error in errors {
                    eprintln!("{} {}", red("error:"), error);
                }
            }
        }
    }

    // The callback already printed the summary when the bar was shown.
    if !cli.quiet && !show_progress && !cli.json {
        eprintln!(
            "{} {}/{} posts in {}ms  →  {}",
            if result.is_success() { green("✔") } else { red("✘") },
            match &result {
                BatchResult::Success(paths) => paths.len(),
                BatchResult::Failure(errors) => cli.count.saturating_sub(errors.len()),
            },
            cli.count,
            start.elapsed().as_millis(),
            bold(&cli.output.display().to_string()),
        );
    }

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

/// Map CLI args to `GenerationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .fetch_timeout_secs(cli.timeout)
        .create_destination(!cli.no_create);

    if let Some(ref url) = cli.source {
        builder = builder.source_url(url.clone());
    }
    if let Some(ref tags) = cli.tags {
        builder = builder.tags(tags.iter().map(|t| t.trim()));
    }
    if let Some(ref categories) = cli.categories {
        builder = builder.categories(categories.iter().map(|c| c.trim()));
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
