use anyhow::{anyhow, Result};
use log::debug;

use crate::config::CONTAINER_PATH;
use crate::util::xml_util::parse_document;
use crate::util::zip_util::{read_text_file, Archive};

#[derive(Debug, PartialEq)]
pub(crate) struct Container {
    pub root_files: Vec<RootFile>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

impl Container {
    pub fn from(doc: &str) -> Result<Container> {
        let doc = parse_document(doc)?;
        let root_files: Vec<RootFile> = doc
            .descendants()
            .filter(|node| node.has_tag_name("rootfile"))
            .map(|node| RootFile {
                full_path: node.attribute("full-path").unwrap_or_default().to_string(),
                media_type: node.attribute("media-type").unwrap_or_default().to_string(),
            })
            .collect();

        Ok(Container { root_files })
    }
}

impl RootFile {
    /// Directory manifest hrefs are resolved against: the first segment of
    /// the root file path, if the root file is not at the archive root.
    pub fn manifest_base_path(&self) -> Option<&str> {
        match self.full_path.split_once('/') {
            Some((base_path, _)) if !base_path.is_empty() => Some(base_path),
            _ => None,
        }
    }
}

/// Finds the package document named by the first `rootfile` of
/// `META-INF/container.xml`.
pub(crate) fn resolve_root_file(archive: &mut Archive) -> Result<RootFile> {
    let path = archive
        .names()
        .iter()
        .find(|name| name.eq_ignore_ascii_case(CONTAINER_PATH))
        .cloned()
        .ok_or(anyhow!("`{}` not found", CONTAINER_PATH))?;

    let container = read_text_file(archive, &path)?;
    let root_file = Container::from(&container)?
        .root_files
        .into_iter()
        .next()
        .ok_or(anyhow!("no `rootfile` found"))?;

    if root_file.full_path.is_empty() {
        return Err(anyhow!("`rootfile` has no `full-path`"));
    }

    debug!(
        "package document at `{}` ({})",
        root_file.full_path, root_file.media_type
    );

    Ok(root_file)
}
