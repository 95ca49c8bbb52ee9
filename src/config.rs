//! Configuration types for batch generation.
//!
//! All generation behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. The config is cheap to clone and is
//! shared by every pipeline in a batch.

use crate::error::LoremPressError;
use crate::pipeline::fetch::MarkdownSource;
use crate::pipeline::write::EntryStore;
use crate::progress::ProgressCallback;
use once_cell::sync::Lazy;
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Endpoint serving a freshly generated lorem-ipsum Markdown document per request.
pub const DEFAULT_SOURCE_URL: &str = "https://jaspervdj.be/lorem-markdownum/markdown.txt";

/// Placeholder image service used for cover images and heading embeds.
pub const DEFAULT_IMAGE_BASE: &str = "https://picsum.photos";

static DEFAULT_SOURCE: Lazy<Url> = Lazy::new(|| Url::parse(DEFAULT_SOURCE_URL).unwrap());
static DEFAULT_IMAGE: Lazy<Url> = Lazy::new(|| Url::parse(DEFAULT_IMAGE_BASE).unwrap());

/// Configuration for a generation batch.
///
/// Built via [`GenerationConfig::builder()`] or using
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use lorem_press::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .tags(["rust", "async"])
///     .fetch_timeout_secs(10)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// URL every pipeline fetches its raw markdown from.
    pub source_url: Url,

    /// Template for random placeholder image URLs.
    pub image_template: ImageTemplate,

    /// Tags written into every entry's front matter. Default: `["a", "b", "c"]`.
    pub tags: Vec<String>,

    /// Categories written into every entry's front matter. Default: `["a", "b", "c"]`.
    pub categories: Vec<String>,

    /// Per-request timeout for the default HTTP source in seconds. Default: 60.
    ///
    /// A timed-out request surfaces as an `ItemError::Transport` for that
    /// item only.
    pub fetch_timeout_secs: u64,

    /// Create the destination directory (and parents) before starting. Default: true.
    pub create_destination: bool,

    /// Pre-constructed markdown source. Takes precedence over the HTTP default.
    pub source: Option<Arc<dyn MarkdownSource>>,

    /// Pre-constructed entry store. Takes precedence over the file-system default.
    pub store: Option<Arc<dyn EntryStore>>,

    /// Receives per-item progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE.clone(),
            image_template: ImageTemplate::default(),
            tags: placeholder_terms(),
            categories: placeholder_terms(),
            fetch_timeout_secs: 60,
            create_destination: true,
            source: None,
            store: None,
            progress_callback: None,
        }
    }
}

fn placeholder_terms() -> Vec<String> {
    ["a", "b", "c"].iter().map(|s| s.to_string()).collect()
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("source_url", &self.source_url.as_str())
            .field("image_template", &self.image_template)
            .field("tags", &self.tags)
            .field("categories", &self.categories)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("create_destination", &self.create_destination)
            .field("source", &self.source.as_ref().map(|_| "<dyn MarkdownSource>"))
            .field("store", &self.store.as_ref().map(|_| "<dyn EntryStore>"))
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn source_url(mut self, url: Url) -> Self {
        self.config.source_url = url;
        self
    }

    pub fn image_template(mut self, template: ImageTemplate) -> Self {
        self.config.image_template = template;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn create_destination(mut self, v: bool) -> Self {
        self.config.create_destination = v;
        self
    }

    pub fn source(mut self, source: Arc<dyn MarkdownSource>) -> Self {
        self.config.source = Some(source);
        self
    }

    pub fn store(mut self, store: Arc<dyn EntryStore>) -> Self {
        self.config.store = Some(store);
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, LoremPressError> {
        let c = &self.config;
        if c.fetch_timeout_secs == 0 {
            return Err(LoremPressError::InvalidConfig(
                "Fetch timeout must be ≥ 1 second".into(),
            ));
        }
        if !matches!(c.source_url.scheme(), "http" | "https") {
            return Err(LoremPressError::InvalidConfig(format!(
                "Source URL must be http(s), got '{}'",
                c.source_url
            )));
        }
        c.image_template.validate()?;
        Ok(self.config)
    }
}

// ── Image template ───────────────────────────────────────────────────────

/// Builds `<base>/id/<n>/<width>/<height>` placeholder image URLs.
///
/// `n` is drawn uniformly from `1..=max_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTemplate {
    pub base: Url,
    pub width: u32,
    pub height: u32,
    pub max_id: u32,
}

impl Default for ImageTemplate {
    fn default() -> Self {
        Self {
            base: DEFAULT_IMAGE.clone(),
            width: 1920,
            height: 960,
            max_id: 1000,
        }
    }
}

impl ImageTemplate {
    /// URL for a specific image identifier.
    pub fn url_for(&self, id: u32) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "id".to_string(),
                id.to_string(),
                self.width.to_string(),
                self.height.to_string(),
            ]);
        }
        url
    }

    /// URL for a random identifier in `1..=max_id`.
    pub fn random_url<R: Rng + ?Sized>(&self, rng: &mut R) -> Url {
        self.url_for(rng.gen_range(1..=self.max_id))
    }

    fn validate(&self) -> Result<(), LoremPressError> {
        if self.base.cannot_be_a_base() {
            return Err(LoremPressError::InvalidConfig(format!(
                "Image base '{}' cannot carry a path",
                self.base
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(LoremPressError::InvalidConfig(format!(
                "Image dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_id == 0 {
            return Err(LoremPressError::InvalidConfig(
                "Image id range must be ≥ 1".into(),
            ));
        }
        Ok(())
    }
}
