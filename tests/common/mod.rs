#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const OPF_PATH: &str = "OEBPS/content.opf";

/// Builds EPUB archives in memory, one entry at a time.
pub struct EpubBuilder {
    files: Vec<(String, Vec<u8>)>,
}

impl EpubBuilder {
    pub fn empty() -> EpubBuilder {
        EpubBuilder { files: Vec::new() }
    }

    /// `mimetype` plus a container pointing at [`OPF_PATH`].
    pub fn new() -> EpubBuilder {
        EpubBuilder::empty()
            .file("mimetype", "application/epub+zip")
            .file("META-INF/container.xml", container(OPF_PATH))
    }

    pub fn file(mut self, name: &str, content: impl AsRef<[u8]>) -> EpubBuilder {
        self.files.retain(|(existing, _)| existing != name);
        self.files.push((name.to_string(), content.as_ref().to_vec()));
        self
    }

    pub fn without(mut self, name: &str) -> EpubBuilder {
        self.files.retain(|(existing, _)| existing != name);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in &self.files {
            let options = if name == "mimetype" {
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
            } else {
                SimpleFileOptions::default()
            };
            writer.start_file(name.as_str(), options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}

/// Flips the first bytes of `name`'s stored data, leaving every header intact.
pub fn corrupt_entry(epub: &mut [u8], name: &str) {
    const LOCAL_HEADER: &[u8] = b"PK\x03\x04";
    const LOCAL_HEADER_LEN: usize = 30;

    let header = (0..epub.len() - LOCAL_HEADER_LEN)
        .find(|&at| {
            epub[at..].starts_with(LOCAL_HEADER)
                && epub[at + LOCAL_HEADER_LEN..].starts_with(name.as_bytes())
        })
        .expect("entry not found");
    let name_len = u16::from_le_bytes([epub[header + 26], epub[header + 27]]) as usize;
    let extra_len = u16::from_le_bytes([epub[header + 28], epub[header + 29]]) as usize;
    let data = header + LOCAL_HEADER_LEN + name_len + extra_len;

    for byte in &mut epub[data..data + 20] {
        *byte ^= 0xff;
    }
}

pub fn container(full_path: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="{}" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#,
        full_path
    )
}

/// Package document with the given `(id, href, media-type)` manifest and spine.
pub fn opf(items: &[(&str, &str, &str)], spine: &[&str]) -> String {
    let items: String = items
        .iter()
        .map(|(id, href, media_type)| {
            format!(
                "        <item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
                id, href, media_type
            )
        })
        .collect();
    let itemrefs: String = spine
        .iter()
        .map(|idref| format!("        <itemref idref=\"{}\"/>\n", idref))
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="bookid" version="2.0">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
        <dc:title>normal book</dc:title>
        <dc:creator opf:role="aut">timsims</dc:creator>
        <dc:language>en</dc:language>
        <dc:identifier id="bookid">urn:uuid:7d1c36a4-3f6b-4a4e-9c59-1c1e0e6a2b11</dc:identifier>
        <dc:publisher>Pamphlet Press</dc:publisher>
        <dc:description>A book for tests.</dc:description>
        <dc:subject>Testing</dc:subject>
        <dc:date>2024-01-01</dc:date>
    </metadata>
    <manifest>
{}    </manifest>
    <spine toc="ncx">
{}    </spine>
</package>"#,
        items, itemrefs
    )
}

/// NCX wrapping the given `navPoint` markup.
pub fn ncx(nav_points: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
    <head><meta name="dtb:uid" content="urn:uuid:7d1c36a4-3f6b-4a4e-9c59-1c1e0e6a2b11"/></head>
    <docTitle><text>normal book</text></docTitle>
    <navMap>
{}
    </navMap>
</ncx>"#,
        nav_points
    )
}

pub fn nav_point(id: &str, play_order: u32, title: &str, src: &str, children: &str) -> String {
    format!(
        r#"<navPoint id="{}" playOrder="{}"><navLabel><text>{}</text></navLabel><content src="{}"/>{}</navPoint>"#,
        id, play_order, title, src, children
    )
}

pub fn xhtml(title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>{}</title></head>
<body>{}</body>
</html>"#,
        title, body
    )
}

/// A three chapter book with a cover page the NCX leaves out.
pub fn normal_epub() -> Vec<u8> {
    EpubBuilder::new()
        .file(
            OPF_PATH,
            opf(
                &[
                    ("ncx", "toc.ncx", "application/x-dtbncx+xml"),
                    ("css", "css/style.css", "text/css"),
                    ("cover", "text/cover.xhtml", "application/xhtml+xml"),
                    ("ch1", "text/ch1.xhtml", "application/xhtml+xml"),
                    ("ch2", "text/ch2.xhtml", "application/xhtml+xml"),
                    ("ch3", "text/ch3.xhtml", "application/xhtml+xml"),
                ],
                &["cover", "ch1", "ch2", "ch3"],
            ),
        )
        .file(
            "OEBPS/toc.ncx",
            ncx(&[
                nav_point("np-1", 1, "Chapter One", "text/ch1.xhtml", ""),
                nav_point("np-2", 2, "Chapter Two", "text/ch2.xhtml#start", ""),
                nav_point("np-3", 3, "Chapter Three", "text/ch3.xhtml", ""),
            ]
            .concat()),
        )
        .file("OEBPS/css/style.css", "p { margin: 0 }")
        .file("OEBPS/text/cover.xhtml", xhtml("Cover", "<p>cover</p>"))
        .file(
            "OEBPS/text/ch1.xhtml",
            xhtml(
                "One",
                "<p>It was a bright cold day.</p><script type=\"text/javascript\">alert(1)</script>",
            ),
        )
        .file("OEBPS/text/ch2.xhtml", xhtml("Two", "<p>Second.</p>"))
        .file("OEBPS/text/ch3.xhtml", xhtml("Three", "<p>Third.</p>"))
        .build()
}
