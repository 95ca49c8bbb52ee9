//! # lorem-press
//!
//! Generate batches of synthetic Markdown blog posts for exercising static
//! site generators, themes and content pipelines.
//!
//! ## Pipeline Overview
//!
//! Each item in a batch runs its own pipeline, all N concurrently:
//!
//! ```text
//! lorem-markdownum
//!  │
//!  ├─ 1. Fetch      GET one random markdown document
//!  ├─ 2. Decode     bytes → UTF-8
//!  ├─ 3. Transform  first `# ` heading → title, image embed above every sub-heading
//!  ├─ 4. Assemble   YAML front matter (title, tags, categories, cover image, date)
//!  ├─ 5. Write      <destination>/<slug>.md
//!  └─ 6. Report     one outcome to the batch aggregator
//! ```
//!
//! The batch reports once, after the last pipeline: `Success` with every
//! written path, or `Failure` with every error if any item failed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lorem_press::{generate, BatchResult, GenerationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerationConfig::default();
//!     match generate(20, "site/posts", &config).await? {
//!         BatchResult::Success(paths) => println!("{} posts written", paths.len()),
//!         BatchResult::Failure(errors) => eprintln!("{} items failed", errors.len()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Callback API
//!
//! [`BatchCoordinator::start`] returns immediately and invokes a callback
//! exactly once when the batch is done; in the meantime
//! [`BatchCoordinator::run_state`] reports whether the batch is still busy.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `lorempress` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod entry;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use aggregate::ResultAggregator;
pub use batch::BatchCoordinator;
pub use config::{GenerationConfig, GenerationConfigBuilder, ImageTemplate};
pub use entry::{ContentEntry, FrontMatter};
pub use error::{ItemError, LoremPressError};
pub use generate::{generate, generate_sync};
pub use output::{BatchResult, ItemOutcome, RunState};
pub use pipeline::fetch::{FetchError, HttpSource, MarkdownSource};
pub use pipeline::item::{ItemControl, PipelineContext};
pub use pipeline::write::{EntryStore, FsStore};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{generate_stream, OutcomeStream};
