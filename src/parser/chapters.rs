use log::{debug, warn};

use crate::book::{Chapter, ManifestItem};
use crate::parser::manifest::ManifestIndex;
use crate::parser::package_document::Spine;
use crate::parser::toc::Toc;
use crate::util::zip_util::ArchiveFile;

/// One chapter per spine itemref that resolves to an archive entry, in
/// spine order. The table of contents only supplies titles and play order.
pub(crate) fn assemble_chapters(spine: &Spine, index: &ManifestIndex, toc: &Toc) -> Vec<Chapter> {
    let chapters: Vec<Chapter> = spine
        .item_refs
        .iter()
        .filter_map(|idref| {
            let Some(file) = index.get(idref) else {
                warn!("spine itemref `{}` has no resolved manifest item", idref);
                return None;
            };
            let toc_entry = toc.get(&file.href);

            Some(Chapter {
                id: idref.clone(),
                title: toc_entry.map(|entry| entry.title.clone()).unwrap_or_default(),
                href: file.href.clone(),
                media_type: file.media_type.clone(),
                has_toc: toc_entry.is_some(),
                order: toc_entry.map_or(0, |entry| entry.play_order),
                entry: file.entry.clone(),
            })
        })
        .collect();

    debug!(
        "{} chapters, {} in the table of contents",
        chapters.len(),
        chapters.iter().filter(|chapter| chapter.has_toc).count()
    );

    chapters
}

pub(crate) fn assemble_manifest(index: &ManifestIndex) -> Vec<ManifestItem> {
    index
        .files()
        .iter()
        .map(|file| ManifestItem {
            id: file.id.clone(),
            href: file.href.clone(),
            real_path: file.entry.path().to_string(),
            media_type: file.media_type.clone(),
            entry: file.entry.clone(),
        })
        .collect()
}
