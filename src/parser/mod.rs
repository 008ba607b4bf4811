use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use log::debug;

use crate::book::Book;
use crate::config::ParseOptions;
use crate::error::{Error, Result};
use crate::parser::chapters::{assemble_chapters, assemble_manifest};
use crate::parser::container::resolve_root_file;
use crate::parser::manifest::ManifestIndex;
use crate::parser::package_document::read_package_document;
use crate::parser::toc::Toc;
use crate::util::zip_util::{Archive, SharedArchive};

mod chapters;
mod container;
mod manifest;
mod mimetype;
mod package_document;
mod toc;

/// An opened EPUB and the [`Book`] resolved from it.
///
/// The whole book structure is resolved when the parser is opened. Chapter
/// and manifest content stays in the archive until it is read, and can no
/// longer be read once the parser is closed.
///
/// Chapters and manifest items share the parser's archive, so a parsed
/// [`Book`] stays on the thread that opened it: it is neither `Send` nor
/// `Sync`.
///
/// ```compile_fail
/// fn send<T: Send>() {}
/// send::<pamphlet::Book>();
/// ```
#[derive(Debug)]
pub struct Parser {
    archive: SharedArchive,
    book: Book,
}

impl Parser {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Parser> {
        Self::open_with_options(path, ParseOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Parser> {
        let path = path.as_ref();
        let archive = File::open(path)
            .map_err(anyhow::Error::from)
            .and_then(Archive::from_file)
            .with_context(|| format!("failed to open `{}`", path.display()))
            .map_err(Error::OpenFailed)?;

        Self::parse(archive, &options)
    }

    #[deprecated(note = "use `Parser::open`")]
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Parser> {
        Self::open(path)
    }

    /// Opens an EPUB held in memory.
    pub fn open_bytes(bytes: impl Into<Vec<u8>>) -> Result<Parser> {
        Self::open_bytes_with_options(bytes, ParseOptions::default())
    }

    pub fn open_bytes_with_options(
        bytes: impl Into<Vec<u8>>,
        options: ParseOptions,
    ) -> Result<Parser> {
        let archive = Archive::from_bytes(bytes.into()).map_err(Error::OpenFailed)?;

        Self::parse(archive, &options)
    }

    /// Reads `file` to the end and opens it as an in-memory EPUB.
    pub fn open_file<R: Read>(file: R) -> Result<Parser> {
        Self::open_file_with_options(file, ParseOptions::default())
    }

    pub fn open_file_with_options<R: Read>(mut file: R, options: ParseOptions) -> Result<Parser> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|err| Error::OpenFailed(err.into()))?;

        Self::open_bytes_with_options(bytes, options)
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Takes the book out of the parser. Its chapters can still be read
    /// until the archive is dropped.
    pub fn into_book(self) -> Book {
        self.book
    }

    /// Releases the archive. Content reads through any chapter or manifest
    /// item of this book fail afterwards; metadata stays available.
    pub fn close(&mut self) -> Result<()> {
        self.archive
            .try_borrow_mut()
            .map_err(|_| Error::ReadFailed(anyhow::anyhow!("archive is being read")))?
            .close();

        Ok(())
    }

    fn parse(archive: Archive, options: &ParseOptions) -> Result<Parser> {
        let archive = archive.into_shared();

        let (root_file, package) = {
            let mut zip = archive.borrow_mut();
            if !mimetype::is_epub(&mut zip) {
                return Err(Error::NotEpub);
            }

            let root_file = resolve_root_file(&mut zip).map_err(Error::RootFileNotFound)?;
            let package = read_package_document(&mut zip, &root_file.full_path)
                .map_err(Error::OpfNotFound)?;

            (root_file, package)
        };

        let index = ManifestIndex::build(
            &package.manifest,
            &archive,
            root_file.manifest_base_path(),
        );
        let toc = Toc::resolve(&index, options);
        if let Some(declared) = &package.spine.toc {
            debug!("spine declares table of contents `{}`", declared);
        }

        let chapters = assemble_chapters(&package.spine, &index, &toc);
        let manifest_items = assemble_manifest(&index);

        let metadata = package.metadata;
        let book = Book {
            title: metadata.title,
            author: metadata.creator,
            language: metadata.language,
            identifier: metadata.identifier,
            publisher: metadata.publisher,
            description: metadata.description,
            subject: metadata.subject,
            date: metadata.date,
            chapters,
            manifest_items,
        };

        Ok(Parser { archive, book })
    }
}
