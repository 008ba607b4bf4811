use std::collections::HashMap;

use log::{debug, warn};

use crate::parser::package_document::ManifestEntry;
use crate::util::zip_util::{ArchiveEntry, SharedArchive};

/// A manifest item bound to the archive entry its href resolves to.
#[derive(Debug, Clone)]
pub(crate) struct ManifestFile {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub entry: ArchiveEntry,
}

/// Manifest items that exist in the archive, keyed by id.
#[derive(Debug, Default)]
pub(crate) struct ManifestIndex {
    files: Vec<ManifestFile>,
    by_id: HashMap<String, usize>,
}

impl ManifestIndex {
    /// Resolves every manifest href against the archive. Items whose path is
    /// not an archive entry are left out.
    pub fn build(
        items: &[ManifestEntry],
        archive: &SharedArchive,
        base_path: Option<&str>,
    ) -> ManifestIndex {
        let zip = archive.borrow();
        let mut entries: HashMap<&str, usize> = HashMap::with_capacity(zip.names().len());
        for (index, name) in zip.names().iter().enumerate() {
            entries.entry(name.as_str()).or_insert(index);
        }

        let mut manifest = ManifestIndex::default();
        for item in items {
            let path = archive_path(base_path, &item.href);
            let Some(&index) = entries.get(path.as_str()) else {
                warn!("manifest item `{}`: `{}` is not in the archive", item.id, path);
                continue;
            };
            if manifest.by_id.contains_key(&item.id) {
                warn!("manifest item `{}` declared twice, keeping the first", item.id);
                continue;
            }

            manifest.by_id.insert(item.id.clone(), manifest.files.len());
            manifest.files.push(ManifestFile {
                id: item.id.clone(),
                href: item.href.clone(),
                media_type: item.media_type.clone(),
                entry: ArchiveEntry::new(archive, index, &path),
            });
        }

        debug!("{} of {} manifest items resolved", manifest.len(), items.len());

        manifest
    }

    pub fn get(&self, id: &str) -> Option<&ManifestFile> {
        self.by_id.get(id).map(|&index| &self.files[index])
    }

    /// Resolved items in declaration order.
    pub fn files(&self) -> &[ManifestFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Archive path of a manifest href.
pub(crate) fn archive_path(base_path: Option<&str>, href: &str) -> String {
    match base_path {
        Some(base_path) => format!("{}/{}", base_path, href),
        None => href.to_string(),
    }
}
