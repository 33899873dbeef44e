//! Byte-to-text decoding for uploaded documents and fetched pages.
//!
//! Every supported format ends up as plain UTF-8 text. Layout is preserved
//! only as far as sentence segmentation needs it: DOCX paragraphs are
//! separated by a blank line and HTML block elements by line breaks.

use std::io::{Cursor, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CanonicalError;

/// MIME type of Office Open XML word-processing documents.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Maximum decompressed bytes read from `word/document.xml` (zip-bomb guard).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Line width handed to the HTML renderer; wide enough that it never wraps prose.
const HTML_RENDER_WIDTH: usize = 10_000;

/// Format of an input payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    PlainText,
    Pdf,
    Docx,
    Html,
    /// Anything else, carrying the extension or content type that was seen.
    Unsupported(String),
}

impl MediaType {
    /// Picks a media type from an upload's file name and declared content type.
    ///
    /// The extension wins when present; an unknown extension is
    /// [`MediaType::Unsupported`]. Without an extension the declared content
    /// type is consulted, and with neither the payload is read as plain text.
    ///
    /// ```rust
    /// use canonical::MediaType;
    ///
    /// assert_eq!(MediaType::infer(Some("essay.PDF"), None), MediaType::Pdf);
    /// assert_eq!(MediaType::infer(Some("notes"), Some("text/plain")), MediaType::PlainText);
    /// assert_eq!(MediaType::infer(None, None), MediaType::PlainText);
    /// assert!(matches!(MediaType::infer(Some("photo.png"), None), MediaType::Unsupported(_)));
    /// ```
    pub fn infer(file_name: Option<&str>, content_type: Option<&str>) -> Self {
        let extension = file_name
            .map(Path::new)
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str());
        if let Some(ext) = extension {
            return Self::from_extension(ext);
        }
        content_type
            .and_then(Self::from_content_type)
            .unwrap_or(MediaType::PlainText)
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" | "md" | "csv" => MediaType::PlainText,
            "pdf" => MediaType::Pdf,
            "docx" => MediaType::Docx,
            "html" | "htm" => MediaType::Html,
            other => MediaType::Unsupported(format!(".{other}")),
        }
    }

    /// Maps a declared content type. Generic binary types yield `None` so the
    /// caller can fall back to another signal.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "" | "application/octet-stream" => None,
            "text/html" | "application/xhtml+xml" => Some(MediaType::Html),
            "application/pdf" => Some(MediaType::Pdf),
            MIME_DOCX => Some(MediaType::Docx),
            other if other.starts_with("text/") => Some(MediaType::PlainText),
            other => Some(MediaType::Unsupported(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaType::PlainText => "text/plain",
            MediaType::Pdf => "application/pdf",
            MediaType::Docx => MIME_DOCX,
            MediaType::Html => "text/html",
            MediaType::Unsupported(name) => name,
        }
    }
}

/// Decodes `bytes` to text according to `media_type`.
pub fn decode(bytes: &[u8], media_type: &MediaType) -> Result<String, CanonicalError> {
    let text = match media_type {
        MediaType::PlainText => decode_plain(bytes)?,
        MediaType::Pdf => decode_pdf(bytes)?,
        MediaType::Docx => decode_docx(bytes)?,
        MediaType::Html => decode_html(bytes)?,
        MediaType::Unsupported(name) => {
            return Err(CanonicalError::UnsupportedMediaType(name.clone()))
        }
    };
    debug!(
        media_type = media_type.as_str(),
        input_bytes = bytes.len(),
        text_bytes = text.len(),
        "decoded payload"
    );
    Ok(text)
}

fn decode_plain(bytes: &[u8]) -> Result<String, CanonicalError> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => utf8(rest),
        [0xFF, 0xFE, rest @ ..] => utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => utf16(rest, u16::from_be_bytes),
        _ => utf8(bytes),
    }
}

fn utf8(bytes: &[u8]) -> Result<String, CanonicalError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| CanonicalError::Decoding(format!("invalid UTF-8: {e}")))
}

fn utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, CanonicalError> {
    if bytes.len() % 2 != 0 {
        return Err(CanonicalError::Decoding(
            "UTF-16 payload has an odd number of bytes".into(),
        ));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| CanonicalError::Decoding(format!("invalid UTF-16: {e}")))
}

fn decode_pdf(bytes: &[u8]) -> Result<String, CanonicalError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| CanonicalError::Decoding(format!("PDF extraction failed: {e}")))?;
    if text.trim().is_empty() {
        return Err(CanonicalError::Decoding(
            "PDF has no extractable text layer".into(),
        ));
    }
    Ok(text)
}

fn decode_docx(bytes: &[u8]) -> Result<String, CanonicalError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| CanonicalError::Decoding(format!("DOCX is not a zip archive: {e}")))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| CanonicalError::Decoding(format!("word/document.xml: {e}")))?;
    let mut xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| CanonicalError::Decoding(e.to_string()))?;
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(CanonicalError::Decoding(
            "word/document.xml exceeds size limit".into(),
        ));
    }
    docx_paragraphs(&xml)
}

fn docx_paragraphs(xml: &[u8]) -> Result<String, CanonicalError> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push_str("\n\n"),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(te)) if in_text => {
                let text = te
                    .unescape()
                    .map_err(|e| CanonicalError::Decoding(format!("DOCX text run: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CanonicalError::Decoding(format!("DOCX XML: {e}"))),
            _ => {}
        }
        buf.clear();
    }
    Ok(out.trim_end().to_string())
}

fn decode_html(bytes: &[u8]) -> Result<String, CanonicalError> {
    html2text::from_read(Cursor::new(bytes), HTML_RENDER_WIDTH)
        .map_err(|e| CanonicalError::Decoding(format!("HTML rendering failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_with(body: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file(
                "word/document.xml",
                zip::write::SimpleFileOptions::default(),
            )
            .expect("start entry");
            let xml = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
            );
            zip.write_all(xml.as_bytes()).expect("write entry");
            zip.finish().expect("finish zip");
        }
        buf
    }

    #[test]
    fn utf8_bom_stripped() {
        let text = decode(b"\xEF\xBB\xBFhello", &MediaType::PlainText).expect("decode");
        assert_eq!(text, "hello");
    }

    #[test]
    fn utf16_le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Hi \u{00E9}".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let text = decode(&bytes, &MediaType::PlainText).expect("decode");
        assert_eq!(text, "Hi \u{00E9}");
    }

    #[test]
    fn utf16_be_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "ok".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode(&bytes, &MediaType::PlainText).expect("decode"), "ok");
    }

    #[test]
    fn invalid_utf8_rejected() {
        let res = decode(&[0xFF, 0xFE, 0x6f], &MediaType::PlainText);
        assert!(matches!(res, Err(CanonicalError::Decoding(_))));
        let res = decode(&[0x66, 0x6f, 0xc3, 0x28], &MediaType::PlainText);
        assert!(matches!(res, Err(CanonicalError::Decoding(_))));
    }

    #[test]
    fn docx_paragraphs_split_by_blank_line() {
        let bytes = docx_with(
            "<w:p><w:r><w:t>First </w:t></w:r><w:r><w:t>paragraph</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second &amp; last</w:t></w:r></w:p>",
        );
        let text = decode(&bytes, &MediaType::Docx).expect("decode docx");
        assert_eq!(text, "First paragraph\n\nSecond & last");
    }

    #[test]
    fn docx_without_document_part_fails() {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            zip.start_file("other.xml", zip::write::SimpleFileOptions::default())
                .expect("start entry");
            zip.write_all(b"<x/>").expect("write");
            zip.finish().expect("finish");
        }
        assert!(matches!(
            decode(&buf, &MediaType::Docx),
            Err(CanonicalError::Decoding(_))
        ));
    }

    #[test]
    fn garbage_pdf_fails_cleanly() {
        let res = decode(b"not a pdf at all", &MediaType::Pdf);
        assert!(matches!(res, Err(CanonicalError::Decoding(_))));
    }

    #[test]
    fn html_markup_removed() {
        let text = decode(
            b"<html><body><h1>Title</h1><p>Some <b>bold</b> text.</p><script>var x;</script></body></html>",
            &MediaType::Html,
        )
        .expect("decode html");
        assert!(text.contains("Title"));
        assert!(text.contains("bold"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn unsupported_type_rejected() {
        let res = decode(b"\x89PNG", &MediaType::Unsupported(".png".into()));
        assert_eq!(
            res,
            Err(CanonicalError::UnsupportedMediaType(".png".into()))
        );
    }

    #[test]
    fn content_type_parameters_ignored() {
        assert_eq!(
            MediaType::from_content_type("text/html; charset=utf-8"),
            Some(MediaType::Html)
        );
        assert_eq!(MediaType::from_content_type("application/octet-stream"), None);
        assert_eq!(
            MediaType::infer(Some("report.docx"), Some("application/octet-stream")),
            MediaType::Docx
        );
    }
}
