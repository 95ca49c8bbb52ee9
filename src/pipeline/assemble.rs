//! Assemble stage: title + rewritten body → [`ContentEntry`].

use crate::config::GenerationConfig;
use crate::entry::{ContentEntry, FrontMatter};
use crate::pipeline::transform::Rewritten;
use rand::Rng;
use std::path::{Path, PathBuf};

/// File stem used when a title slugifies to nothing (e.g. only punctuation).
pub const FALLBACK_SLUG: &str = "untitled";

/// Filesystem-safe, lowercase, dash-separated form of `title`.
pub fn slugify_title(title: &str) -> String {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `<destination>/<slug>.md`.
pub fn entry_path(destination: &Path, title: &str) -> PathBuf {
    destination.join(format!("{}.md", slugify_title(title)))
}

/// Build the entry with configured tags and categories, a random cover
/// image and the current time.
pub fn assemble_entry<R: Rng + ?Sized>(
    rewritten: Rewritten,
    destination: &Path,
    config: &GenerationConfig,
    rng: &mut R,
) -> ContentEntry {
    let path = entry_path(destination, &rewritten.title);
    let front_matter = FrontMatter::new(
        rewritten.title,
        config.tags.clone(),
        config.categories.clone(),
        config.image_template.random_url(rng),
    );
    ContentEntry::new(front_matter, rewritten.markdown, path)
}
