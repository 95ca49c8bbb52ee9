//! Generated blog entries: YAML front matter plus a Markdown body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Metadata header written at the top of every generated entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    title: String,
    tags: Vec<String>,
    categories: Vec<String>,
    cover_image: Url,
    date: DateTime<Utc>,
}

impl FrontMatter {
    /// Front matter dated now.
    pub fn new(
        title: impl Into<String>,
        tags: Vec<String>,
        categories: Vec<String>,
        cover_image: Url,
    ) -> Self {
        Self::with_date(title, tags, categories, cover_image, Utc::now())
    }

    pub fn with_date(
        title: impl Into<String>,
        tags: Vec<String>,
        categories: Vec<String>,
        cover_image: Url,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            tags,
            categories,
            cover_image,
            date,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn cover_image(&self) -> &Url {
        &self.cover_image
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Serialise as a YAML mapping (no `---` delimiters, trailing newline).
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// One generated post and the file it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    front_matter: FrontMatter,
    body: String,
    destination: PathBuf,
}

impl ContentEntry {
    pub fn new(front_matter: FrontMatter, body: impl Into<String>, destination: PathBuf) -> Self {
        Self {
            front_matter,
            body: body.into(),
            destination,
        }
    }

    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// File contents: `---`, front matter, `---`, then the trimmed body.
    pub fn rendered_text(&self) -> Result<String, serde_yaml::Error> {
        let yaml = self.front_matter.to_yaml()?;
        let yaml = yaml.strip_prefix("---\n").unwrap_or(&yaml);
        let mut text = String::with_capacity(yaml.len() + self.body.len() + 8);
        text.push_str("---\n");
        text.push_str(yaml);
        if !yaml.ends_with('\n') {
            text.push('\n');
        }
        text.push_str("---\n");
        text.push_str(self.body.trim());
        Ok(text)
    }
}
