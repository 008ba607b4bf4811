//! Format constants and parser settings.

/// Content of the `mimetype` entry of every EPUB archive.
pub const EPUB_MIMETYPE: &str = "application/epub+zip";
/// Name of the archive entry holding [`EPUB_MIMETYPE`].
pub const MIMETYPE_PATH: &str = "mimetype";
/// Container document, matched case-insensitively.
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";
pub const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";
/// Fallback for NCX files declared with a wrong media type.
pub const NCX_FILE_EXT: &str = ".ncx";

/// Media types [`Chapter::content`](crate::Chapter::content) accepts.
pub const CONTENT_MEDIA_TYPES: [&str; 2] = [XHTML_MEDIA_TYPE, SVG_MEDIA_TYPE];

const DEFAULT_MAX_TOC_DEPTH: usize = 64;

/// Settings applied while a [`Parser`](crate::Parser) resolves a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest `navPoint` nesting walked in the NCX. Deeper nodes are
    /// skipped with a warning.
    pub max_toc_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_toc_depth: DEFAULT_MAX_TOC_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn with_max_toc_depth(mut self, max_toc_depth: usize) -> Self {
        self.max_toc_depth = max_toc_depth;
        self
    }
}
