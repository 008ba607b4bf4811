#[cfg(feature = "serde")]
use serde::Serialize;

use crate::config::CONTENT_MEDIA_TYPES;
use crate::error::{Error, Result};
use crate::util::sanitize::sanitize_content;
use crate::util::zip_util::sealed::Sealed;
use crate::util::zip_util::{ArchiveEntry, ArchiveFile};

/// A parsed book. Metadata fields are empty when the package document does
/// not declare them.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Book {
    pub title: String,
    /// text of the first `dc:creator`
    pub author: String,
    pub language: String,
    pub identifier: String,
    pub publisher: String,
    pub description: String,
    pub subject: String,
    pub date: String,
    /// chapters in spine order
    pub chapters: Vec<Chapter>,
    /// manifest items found in the archive, in declaration order
    pub manifest_items: Vec<ManifestItem>,
}

impl Book {
    /// Number of chapters the table of contents refers to.
    pub fn toc_chapter_count(&self) -> usize {
        self.chapters.iter().filter(|chapter| chapter.has_toc).count()
    }
}

/// One spine item, annotated with its table of contents entry if it has one.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Chapter {
    /// `idref` of the spine item
    pub id: String,
    /// `navLabel` text of the matching `navPoint`, empty without one
    pub title: String,
    /// href as declared in the manifest
    pub href: String,
    pub media_type: String,
    pub has_toc: bool,
    /// `playOrder` of the matching `navPoint`, 0 without one
    pub order: u32,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) entry: ArchiveEntry,
}

impl Chapter {
    /// Chapter markup with scripts, styles and event handlers stripped.
    ///
    /// Only XHTML and SVG chapters have content; anything else fails with
    /// [`Error::UnsupportedMediaType`]. Use [`ArchiveFile::raw_content`] for
    /// the unfiltered bytes.
    pub fn content(&self) -> Result<String> {
        if !CONTENT_MEDIA_TYPES.contains(&self.media_type.as_str()) {
            return Err(Error::UnsupportedMediaType(self.media_type.clone()));
        }

        let raw = self.raw_content()?;

        Ok(sanitize_content(&String::from_utf8_lossy(&raw)))
    }
}

impl Sealed for Chapter {}

impl ArchiveFile for Chapter {
    fn entry(&self) -> &ArchiveEntry {
        &self.entry
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ManifestItem {
    pub id: String,
    /// href as declared in the manifest
    pub href: String,
    /// path of the entry inside the archive
    pub real_path: String,
    pub media_type: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) entry: ArchiveEntry,
}

impl Sealed for ManifestItem {}

impl ArchiveFile for ManifestItem {
    fn entry(&self) -> &ArchiveEntry {
        &self.entry
    }
}
