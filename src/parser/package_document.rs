use anyhow::{anyhow, Result};
use log::debug;
use roxmltree::Node;

use crate::util::xml_util::{child, parse_document};
use crate::util::zip_util::{read_text_file, Archive};

#[derive(Debug, Default, PartialEq)]
pub(crate) struct PackageDocument {
    pub metadata: Metadata,
    /// items in declaration order
    pub manifest: Vec<ManifestEntry>,
    pub spine: Spine,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Metadata {
    pub title: String,
    pub creator: String,
    pub language: String,
    pub identifier: String,
    pub publisher: String,
    pub description: String,
    pub subject: String,
    pub date: String,
}

#[derive(Debug, PartialEq)]
pub(crate) struct ManifestEntry {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Spine {
    /// manifest id of the NCX, as declared by the `toc` attribute
    pub toc: Option<String>,
    /// `idref`s in reading order
    pub item_refs: Vec<String>,
}

impl PackageDocument {
    pub fn from(doc: &str) -> Result<PackageDocument> {
        let doc = parse_document(doc)?;
        let package_elem = doc.root_element();
        if !package_elem.has_tag_name("package") {
            return Err(anyhow!(
                "expected `package` root element, found `{}`",
                package_elem.tag_name().name()
            ));
        }

        let metadata = child(&package_elem, "metadata")
            .map(|metadata_elem| Self::parse_metadata(&metadata_elem))
            .unwrap_or_default();

        let manifest = child(&package_elem, "manifest")
            .map(|manifest_elem| Self::parse_manifest(&manifest_elem))
            .unwrap_or_default();

        let spine = child(&package_elem, "spine")
            .map(|spine_elem| Self::parse_spine(&spine_elem))
            .unwrap_or_default();

        Ok(PackageDocument {
            metadata,
            manifest,
            spine,
        })
    }

    fn parse_metadata(metadata_elem: &Node) -> Metadata {
        let text = |name: &str| {
            child(metadata_elem, name)
                .map(|node| node.text().unwrap_or_default().trim())
                .unwrap_or_default()
                .to_string()
        };

        Metadata {
            title: text("title"),
            creator: text("creator"),
            language: text("language"),
            identifier: text("identifier"),
            publisher: text("publisher"),
            description: text("description"),
            subject: text("subject"),
            date: text("date"),
        }
    }

    fn parse_manifest(manifest_elem: &Node) -> Vec<ManifestEntry> {
        manifest_elem
            .children()
            .filter(|node| node.has_tag_name("item"))
            .filter_map(|node| {
                Some(ManifestEntry {
                    id: node.attribute("id")?.to_string(),
                    href: node.attribute("href")?.to_string(),
                    media_type: node.attribute("media-type").unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    fn parse_spine(spine_elem: &Node) -> Spine {
        let toc = spine_elem.attribute("toc").map(str::to_string);
        let item_refs = spine_elem
            .children()
            .filter(|node| node.has_tag_name("itemref"))
            .filter_map(|node| node.attribute("idref"))
            .map(str::to_string)
            .collect();

        Spine { toc, item_refs }
    }
}

/// Reads and decodes the package document at `path`.
pub(crate) fn read_package_document(archive: &mut Archive, path: &str) -> Result<PackageDocument> {
    let doc = read_text_file(archive, path)?;
    let package = PackageDocument::from(&doc)?;

    debug!(
        "`{}`: {} manifest items, {} spine items",
        path,
        package.manifest.len(),
        package.spine.item_refs.len()
    );

    Ok(package)
}
