//! Heading rewrite: pull out the title, illustrate every sub-heading.
//!
//! The first `# ` heading becomes the entry title and its line is dropped
//! from the body (the title lives in the front matter instead). Every deeper
//! heading (`## `, `### `, …) gets a placeholder image embed on the lines
//! right above it, captioned with the heading text.
//!
//! ## Edit order
//!
//! All heading spans are located up front against the unmodified text, then
//! edited in place from the last match to the first. An edit only shifts the
//! bytes that come after it, so every span still waiting to be visited keeps
//! its original offsets.
//!
//! Walking backwards also decides which level-1 heading wins: each one
//! overwrites the recorded title, so the earliest in the document is the
//! last written.

use crate::config::ImageTemplate;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use std::ops::Range;
use thiserror::Error;
use tracing::debug;

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#+) ([^\r\n]+)\r?$").unwrap());

/// The markdown has no level-1 heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("markdown has no top-level heading")]
pub struct MissingTitle;

/// Result of a successful rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub title: String,
    pub markdown: String,
}

/// One located heading, all spans in bytes of the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeadingSpan {
    /// The whole line including its line terminator when there is one.
    line: Range<usize>,
    marker: Range<usize>,
    text: Range<usize>,
}

impl HeadingSpan {
    fn level(&self) -> usize {
        self.marker.len()
    }
}

fn locate_headings(markdown: &str) -> Vec<HeadingSpan> {
    RE_HEADING
        .captures_iter(markdown)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let marker = caps.get(1)?;
            let text = caps.get(2)?;
            let end = if markdown[whole.end()..].starts_with('\n') {
                whole.end() + 1
            } else {
                whole.end()
            };
            Some(HeadingSpan {
                line: whole.start()..end,
                marker: marker.range(),
                text: text.range(),
            })
        })
        .collect()
}

/// Rewrite `markdown` using `images` for the embeds and `rng` for image ids.
pub fn rewrite_headings<R: Rng + ?Sized>(
    markdown: &str,
    images: &ImageTemplate,
    rng: &mut R,
) -> Result<Rewritten, MissingTitle> {
    let spans = locate_headings(markdown);
    let mut output = markdown.to_string();
    let mut title: Option<String> = None;

    for span in spans.iter().rev() {
        let caption = markdown[span.text.clone()].trim();
        if span.level() == 1 {
            title = Some(caption.to_string());
            output.replace_range(span.line.clone(), "");
        } else {
            let embed = format!("![{}]({})\n\n", caption, images.random_url(rng));
            output.insert_str(span.line.start, &embed);
        }
    }

    let title = title.ok_or(MissingTitle)?;
    debug!("Rewrote {} headings, title {:?}", spans.len(), title);
    Ok(Rewritten {
        title,
        markdown: output,
    })
}
