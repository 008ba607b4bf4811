use log::warn;

use crate::config::{EPUB_MIMETYPE, MIMETYPE_PATH};
use crate::util::zip_util::{read_text_file, Archive};

/// Whether the archive carries a `mimetype` entry reading `application/epub+zip`.
pub(crate) fn is_epub(archive: &mut Archive) -> bool {
    if archive.index_of(MIMETYPE_PATH).is_none() {
        warn!("archive has no `{}` entry", MIMETYPE_PATH);
        return false;
    }

    match read_text_file(archive, MIMETYPE_PATH) {
        Ok(mimetype) => mimetype.trim() == EPUB_MIMETYPE,
        Err(err) => {
            warn!("{:#}", err);
            false
        }
    }
}
