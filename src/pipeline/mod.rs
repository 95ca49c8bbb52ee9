//! Pipeline stages for generating one entry.
//!
//! Each submodule implements exactly one step, and [`item`] chains them.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ decode ──▶ transform ──▶ assemble ──▶ write
//! (HTTP)    (UTF-8)    (headings)    (front matter) (<slug>.md)
//! ```
//!
//! 1. [`fetch`]: the [`fetch::MarkdownSource`] seam and its `reqwest` implementation
//! 2. [`decode`]: strict UTF-8 decoding
//! 3. [`transform`]: title extraction and sub-heading image embeds
//! 4. [`assemble`]: slug, destination path and front matter
//! 5. [`write`]: the [`write::EntryStore`] seam and its file-system implementation
//! 6. [`item`]: runs 1-5 for one item and maps every failure to an `ItemError`

pub mod assemble;
pub mod decode;
pub mod fetch;
pub mod item;
pub mod transform;
pub mod write;
