use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use zip::ZipArchive;

use crate::error::Error;

/// Archive shared by the parser and every entry handle it gives out.
pub(crate) type SharedArchive = Rc<RefCell<Archive>>;

enum ZipSource {
    File(ZipArchive<File>),
    Memory(ZipArchive<Cursor<Vec<u8>>>),
}

/// An opened zip archive, either on disk or in memory.
///
/// Entry names are captured when the archive is opened and stay available
/// after [`Archive::close`]; entry content does not.
pub(crate) struct Archive {
    source: Option<ZipSource>,
    names: Vec<String>,
}

impl Archive {
    pub fn from_file(file: File) -> Result<Archive> {
        let zip = ZipArchive::new(file)?;
        let names = entry_names(&zip);
        Ok(Archive {
            source: Some(ZipSource::File(zip)),
            names,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Archive> {
        let zip = ZipArchive::new(Cursor::new(bytes))?;
        let names = entry_names(&zip);
        Ok(Archive {
            source: Some(ZipSource::Memory(zip)),
            names,
        })
    }

    pub fn into_shared(self) -> SharedArchive {
        Rc::new(RefCell::new(self))
    }

    /// Entry names in central directory order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|entry| entry == name)
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    pub fn close(&mut self) {
        self.source = None;
    }

    /// Runs `read` over a decompressing reader for one entry. The reader is
    /// dropped before this returns, whatever `read` does.
    pub fn with_entry<T>(
        &mut self,
        index: usize,
        read: impl FnOnce(&mut dyn Read) -> io::Result<T>,
    ) -> Result<T> {
        let name = self
            .names
            .get(index)
            .ok_or(anyhow!("no entry at index {}", index))?
            .clone();

        let result = match self.source.as_mut() {
            Some(ZipSource::File(zip)) => read_entry(zip, index, read),
            Some(ZipSource::Memory(zip)) => read_entry(zip, index, read),
            None => Err(anyhow!("archive is closed")),
        };

        result.with_context(|| format!("failed to read `{}`", name))
    }
}

impl fmt::Debug for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archive")
            .field("entries", &self.names.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn entry_names<R: Read + Seek>(zip: &ZipArchive<R>) -> Vec<String> {
    (0..zip.len())
        .map(|index| zip.name_for_index(index).unwrap_or_default().to_string())
        .collect()
}

fn read_entry<R: Read + Seek, T>(
    zip: &mut ZipArchive<R>,
    index: usize,
    read: impl FnOnce(&mut dyn Read) -> io::Result<T>,
) -> Result<T> {
    let mut file = zip.by_index(index)?;

    Ok(read(&mut file)?)
}

pub(crate) fn read_binary_file(archive: &mut Archive, path: &str) -> Result<Vec<u8>> {
    let index = archive
        .index_of(path)
        .ok_or(anyhow!("no entry named `{}`", path))?;

    archive.with_entry(index, |file| {
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}

pub(crate) fn read_text_file(archive: &mut Archive, path: &str) -> Result<String> {
    let buffer = read_binary_file(archive, path)?;

    String::from_utf8(buffer).with_context(|| format!("`{}` is not valid UTF-8", path))
}

/// Lazy handle to one archive entry. Nothing is decompressed until the
/// entry is read.
#[derive(Clone)]
pub struct ArchiveEntry {
    archive: SharedArchive,
    index: usize,
    name: String,
}

impl ArchiveEntry {
    pub(crate) fn new(archive: &SharedArchive, index: usize, name: &str) -> ArchiveEntry {
        ArchiveEntry {
            archive: Rc::clone(archive),
            index,
            name: name.to_string(),
        }
    }
}

impl fmt::Debug for ArchiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("index", &self.index)
            .field("name", &self.name)
            .finish()
    }
}

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Read access to a file stored in the book's archive.
///
/// Every read decompresses the entry again; nothing is cached. Reads fail
/// with [`Error::ReadFailed`] once the owning parser has been closed.
///
/// Implemented by [`Chapter`](crate::Chapter), [`ManifestItem`](crate::ManifestItem)
/// and [`ArchiveEntry`]; it cannot be implemented outside this crate.
///
/// ```compile_fail
/// use pamphlet::{ArchiveEntry, ArchiveFile};
///
/// struct Elsewhere(ArchiveEntry);
///
/// impl ArchiveFile for Elsewhere {
///     fn entry(&self) -> &ArchiveEntry {
///         &self.0
///     }
/// }
/// ```
pub trait ArchiveFile: sealed::Sealed {
    fn entry(&self) -> &ArchiveEntry;

    /// Path of the entry inside the archive.
    fn path(&self) -> &str {
        &self.entry().name
    }

    /// Streams the entry through `read`. The underlying decompressor is
    /// released when `read` returns.
    fn open<T, F>(&self, read: F) -> crate::Result<T>
    where
        F: FnOnce(&mut dyn Read) -> io::Result<T>,
    {
        let entry = self.entry();
        let mut archive = entry
            .archive
            .try_borrow_mut()
            .map_err(|_| Error::ReadFailed(anyhow!("archive is busy reading another entry")))?;

        archive
            .with_entry(entry.index, read)
            .map_err(Error::ReadFailed)
    }

    /// Full decompressed bytes of the entry.
    fn raw_content(&self) -> crate::Result<Vec<u8>> {
        self.open(|file| {
            let mut buffer = Vec::new();
            file.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    }
}

impl sealed::Sealed for ArchiveEntry {}

impl ArchiveFile for ArchiveEntry {
    fn entry(&self) -> &ArchiveEntry {
        self
    }
}

#[cfg(test)]
pub(crate) fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
pub(crate) fn test_archive(files: &[(&str, &str)]) -> Archive {
    Archive::from_bytes(zip_bytes(files)).unwrap()
}
