use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use roxmltree::Node;

use crate::config::{ParseOptions, NCX_FILE_EXT, NCX_MEDIA_TYPE};
use crate::parser::manifest::{ManifestFile, ManifestIndex};
use crate::util::xml_util::{child, parse_document, text_norm};
use crate::util::zip_util::ArchiveFile;

/// Title and play order of the first `navPoint` pointing at a file.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TocEntry {
    pub title: String,
    pub play_order: u32,
}

/// Flattened NCX, keyed by `content/src` without its fragment.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Toc {
    entries: HashMap<String, TocEntry>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct NavPoint {
    pub id: String,
    pub play_order: u32,
    pub title: String,
    pub src: Option<String>,
    pub children: Vec<NavPoint>,
}

/// A way of recognising the NCX among the manifest items.
pub(crate) struct TocRule {
    pub name: &'static str,
    pub matches: fn(&ManifestFile) -> bool,
}

/// Tried in order; the first rule matching any manifest item wins.
pub(crate) const TOC_RULES: [TocRule; 2] = [
    TocRule {
        name: "media type",
        matches: has_ncx_media_type,
    },
    TocRule {
        name: "file extension",
        matches: has_ncx_extension,
    },
];

fn has_ncx_media_type(file: &ManifestFile) -> bool {
    file.media_type == NCX_MEDIA_TYPE
}

fn has_ncx_extension(file: &ManifestFile) -> bool {
    file.href.ends_with(NCX_FILE_EXT)
}

pub(crate) fn find_toc_file(index: &ManifestIndex) -> Option<&ManifestFile> {
    TOC_RULES.iter().find_map(|rule| {
        let file = index.files().iter().find(|file| (rule.matches)(file))?;
        debug!("table of contents `{}` found by {}", file.href, rule.name);
        Some(file)
    })
}

impl Toc {
    /// Reads the book's NCX. A book without one, or with one that cannot be
    /// decoded, gets an empty table of contents.
    pub fn resolve(index: &ManifestIndex, options: &ParseOptions) -> Toc {
        let Some(file) = find_toc_file(index) else {
            debug!("no table of contents");
            return Toc::default();
        };

        match Self::read(file, options) {
            Ok(toc) => {
                debug!("{} table of contents entries", toc.len());
                toc
            }
            Err(err) => {
                warn!("ignoring table of contents `{}`: {:#}", file.href, err);
                Toc::default()
            }
        }
    }

    fn read(file: &ManifestFile, options: &ParseOptions) -> Result<Toc> {
        let raw = file.entry.raw_content()?;
        let doc = String::from_utf8(raw).context("not valid UTF-8")?;
        let nav_points = ncx::parse(&doc, options.max_toc_depth)?;

        Ok(Toc::flatten(&nav_points))
    }

    /// Walks the tree in preorder. When several points share a path, the
    /// first one visited is kept.
    pub fn flatten(nav_points: &[NavPoint]) -> Toc {
        let mut entries = HashMap::new();
        let mut pending: Vec<&NavPoint> = nav_points.iter().rev().collect();

        while let Some(nav_point) = pending.pop() {
            match &nav_point.src {
                Some(src) => {
                    entries
                        .entry(strip_fragment(src).to_string())
                        .or_insert_with(|| TocEntry {
                            title: nav_point.title.clone(),
                            play_order: nav_point.play_order,
                        });
                }
                None => debug!("navPoint `{}` has no content", nav_point.id),
            }
            pending.extend(nav_point.children.iter().rev());
        }

        Toc { entries }
    }

    pub fn get(&self, href: &str) -> Option<&TocEntry> {
        self.entries.get(href)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn strip_fragment(src: &str) -> &str {
    src.split_once('#').map_or(src, |(path, _)| path)
}

mod ncx {
    use super::*;

    pub fn parse(doc: &str, max_depth: usize) -> Result<Vec<NavPoint>> {
        let doc = parse_document(doc)?;
        let ncx_elem = doc.root_element();
        if !ncx_elem.has_tag_name("ncx") {
            return Err(anyhow!(
                "expected `ncx` root element, found `{}`",
                ncx_elem.tag_name().name()
            ));
        }

        let Some(nav_map_elem) = child(&ncx_elem, "navMap") else {
            return Ok(Vec::new());
        };

        let mut truncated = false;
        let nav_points = parse_nav_points(&nav_map_elem, 1, max_depth, &mut truncated);
        if truncated {
            warn!("table of contents nested deeper than {} levels, skipping the rest", max_depth);
        }

        Ok(nav_points)
    }

    fn parse_nav_points(
        parent_elem: &Node,
        depth: usize,
        max_depth: usize,
        truncated: &mut bool,
    ) -> Vec<NavPoint> {
        let nav_point_elems = parent_elem
            .children()
            .filter(|node| node.has_tag_name("navPoint"));

        if depth > max_depth {
            *truncated |= nav_point_elems.count() > 0;
            return Vec::new();
        }

        nav_point_elems
            .map(|node| parse_nav_point(&node, depth, max_depth, truncated))
            .collect()
    }

    fn parse_nav_point(
        nav_point_elem: &Node,
        depth: usize,
        max_depth: usize,
        truncated: &mut bool,
    ) -> NavPoint {
        let title = child(nav_point_elem, "navLabel")
            .and_then(|nav_label_elem| child(&nav_label_elem, "text"))
            .map(|text_elem| text_norm(&text_elem))
            .unwrap_or_default();

        let src = child(nav_point_elem, "content")
            .and_then(|content_elem| content_elem.attribute("src"))
            .map(str::to_string);

        let play_order = nav_point_elem
            .attribute("playOrder")
            .and_then(|order| order.trim().parse().ok())
            .unwrap_or(0);

        NavPoint {
            id: nav_point_elem.attribute("id").unwrap_or_default().to_string(),
            play_order,
            title,
            src,
            children: parse_nav_points(nav_point_elem, depth + 1, max_depth, truncated),
        }
    }

}
