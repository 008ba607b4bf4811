//! Read the structure of EPUB books.
//!
//! [`Parser`] opens a zip archive, checks that it is an EPUB, and resolves
//! the container, package document and NCX table of contents into a [`Book`]:
//! metadata, chapters in spine order, and every manifest item that exists in
//! the archive. Chapter and manifest content is read lazily from the archive.
//!
//! ```no_run
//! use pamphlet::Parser;
//!
//! let mut parser = Parser::open("book.epub")?;
//! for chapter in &parser.book().chapters {
//!     println!("{} ({})", chapter.title, chapter.href);
//!     let _html = chapter.content()?;
//! }
//! parser.close()?;
//! # Ok::<(), pamphlet::Error>(())
//! ```

mod book;
pub mod config;
mod error;
mod parser;
mod util;

pub use crate::book::{Book, Chapter, ManifestItem};
pub use crate::config::ParseOptions;
pub use crate::error::{Error, Result};
pub use crate::parser::Parser;
pub use crate::util::sanitize::sanitize_content;
pub use crate::util::zip_util::{ArchiveEntry, ArchiveFile};
