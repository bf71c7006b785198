//! Document loading and text extraction.
//!
//! Each submitted file is dispatched on its extension to a format parser. A
//! file that cannot be handled is skipped with a [`LoadWarning`]; the batch
//! only fails when nothing at all could be loaded.

use crate::types::{
    DocumentFormat, DocumentRecord, LoadReport, LoadWarning, LoadWarningKind, SourceFile,
};
use docqa_core::{AppError, AppResult};
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};

/// Maximum decompressed bytes read from the DOCX body (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

const UTF8_BOM: char = '\u{feff}';

/// Load every file, collecting per-file warnings.
///
/// Fails with `NoDocumentsLoaded` only when no file produced a record.
pub fn load(files: &[SourceFile]) -> AppResult<LoadReport> {
    let mut report = LoadReport::default();

    for file in files {
        match load_file(file) {
            Ok(record) => {
                tracing::debug!(
                    "Loaded {} as {} ({} bytes of text)",
                    record.source_identifier,
                    record.format.as_str(),
                    record.raw_text.len()
                );
                report.documents.push(record);
            }
            Err(kind) => {
                let warning = LoadWarning {
                    file: file.name.clone(),
                    kind,
                };
                tracing::warn!("Skipping {}", warning);
                report.warnings.push(warning);
            }
        }
    }

    if report.documents.is_empty() {
        return Err(AppError::NoDocumentsLoaded(summarize_failures(
            files.len(),
            &report.warnings,
        )));
    }

    Ok(report)
}

fn summarize_failures(submitted: usize, warnings: &[LoadWarning]) -> String {
    if submitted == 0 {
        return "no files were submitted".to_string();
    }

    let reasons: Vec<String> = warnings.iter().map(|w| w.to_string()).collect();
    format!(
        "all {} submitted file(s) were skipped: {}",
        submitted,
        reasons.join("; ")
    )
}

/// Parse one file into a record, or say why it was skipped.
pub fn load_file(file: &SourceFile) -> Result<DocumentRecord, LoadWarningKind> {
    let extension = file.extension();
    let format = DocumentFormat::from_extension(&extension)
        .ok_or(LoadWarningKind::UnsupportedFormat { extension })?;

    let raw_text = extract_text(format, &file.bytes)
        .map_err(|reason| LoadWarningKind::ParseFailure { reason })?;

    Ok(DocumentRecord {
        source_identifier: file.name.clone(),
        raw_text,
        format,
    })
}

/// Extract plain text from raw bytes of a known format.
pub fn extract_text(format: DocumentFormat, bytes: &[u8]) -> Result<String, String> {
    match format {
        DocumentFormat::PlainText => decode_utf8(bytes),
        DocumentFormat::Markdown => decode_utf8(bytes).map(|text| clean_markdown(&text)),
        DocumentFormat::Html => decode_utf8(bytes).map(|text| clean_html(&text)),
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::WordProcessor => extract_docx(bytes),
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {}", e))?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
}

fn extract_pdf(bytes: &[u8]) -> Result<String, String> {
    // pdf-extract panics on some malformed inputs
    let result =
        panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("PDF extraction failed: {}", e)),
        Err(_) => Err("PDF extraction failed: malformed document".to_string()),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| format!("not a DOCX archive: {}", e))?;

    let entry = archive
        .by_name("word/document.xml")
        .map_err(|_| "word/document.xml not found".to_string())?;

    let mut doc_xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut doc_xml)
        .map_err(|e| e.to_string())?;
    if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err("word/document.xml exceeds size limit".to_string());
    }

    extract_w_t_elements(&doc_xml)
}

/// Collect `<w:t>` run text, one line per `<w:p>` paragraph.
fn extract_w_t_elements(xml: &[u8]) -> Result<String, String> {
    use quick_xml::events::Event;

    let mut out = String::new();
    let mut reader = quick_xml::Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text = true;
                }
            }
            Ok(Event::Text(te)) if in_text => {
                let text = te.unescape().map_err(|e| e.to_string())?;
                out.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("malformed document XML: {}", e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(out.trim_end().to_string())
}

/// Clean markdown by removing formatting syntax.
fn clean_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        // Remove markdown headers
        let trimmed = line.trim_start_matches('#').trim();

        // Skip horizontal rules and code fences
        if is_rule(trimmed) || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        let content = strip_list_marker(trimmed);
        let content = strip_links(content)
            .replace("**", "")
            .replace("__", "")
            .replace('`', "");

        // Keep content
        if !content.trim().is_empty() {
            result.push_str(content.trim());
            result.push('\n');
        }
    }

    result.trim().to_string()
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && (compact.chars().all(|c| c == '-')
            || compact.chars().all(|c| c == '*')
            || compact.chars().all(|c| c == '_'))
}

fn strip_list_marker(line: &str) -> &str {
    for marker in ["- ", "* ", "+ ", "> "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest;
        }
    }
    line
}

/// Replace `[label](target)` and `![alt](target)` with their text.
fn strip_links(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('[') {
        let after_open = &rest[open + 1..];
        let link = after_open.find(']').and_then(|close| {
            let target = after_open[close + 1..].strip_prefix('(')?;
            target
                .find(')')
                .map(|end| (&after_open[..close], &target[end + 1..]))
        });

        match link {
            Some((label, remainder)) => {
                let before = &rest[..open];
                out.push_str(before.strip_suffix('!').unwrap_or(before));
                out.push_str(label);
                rest = remainder;
            }
            None => {
                out.push_str(&rest[..=open]);
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Tags that separate blocks of text.
const BLOCK_TAGS: [&str; 18] = [
    "p", "div", "br", "li", "ul", "ol", "tr", "td", "th", "table", "h1", "h2", "h3", "h4", "h5",
    "h6", "section", "article",
];

/// Clean HTML by stripping tags, scripts and styles.
fn clean_html(text: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let lower = text.to_ascii_lowercase();
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    let mut skip_until: Option<&str> = None;

    for (i, ch) in text.char_indices() {
        if let Some(closing) = skip_until {
            if lower[i..].starts_with(closing) {
                skip_until = None;
                in_tag = true;
            }
            continue;
        }

        match ch {
            '<' => {
                in_tag = true;
                let tag = &lower[i + 1..];
                if tag.starts_with("script") {
                    skip_until = Some("</script");
                } else if tag.starts_with("style") {
                    skip_until = Some("</style");
                } else if BLOCK_TAGS.contains(&tag_name(tag)) {
                    result.push('\n');
                }
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    let decoded = decode_entities(&result);

    // Collapse whitespace
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name of the tag starting right after `<`, without a leading `/`.
fn tag_name(tag: &str) -> &str {
    let tag = tag.strip_prefix('/').unwrap_or(tag);
    let end = tag
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(tag.len());
    &tag[..end]
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_plain_text_strips_bom() {
        let file = SourceFile::new("notes.txt", "\u{feff}The meeting is on March 3rd.");
        let record = load_file(&file).unwrap();
        assert_eq!(record.raw_text, "The meeting is on March 3rd.");
        assert_eq!(record.format, DocumentFormat::PlainText);
    }

    #[test]
    fn test_invalid_utf8_is_parse_failure() {
        let file = SourceFile::new("broken.txt", vec![0xff, 0xfe, 0x00, 0xc3]);
        assert!(matches!(
            load_file(&file),
            Err(LoadWarningKind::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let file = SourceFile::new("table.CSV", "a,b");
        assert_eq!(
            load_file(&file),
            Err(LoadWarningKind::UnsupportedFormat {
                extension: "csv".to_string()
            })
        );
    }

    #[test]
    fn test_uppercase_extension_is_recognized() {
        let file = SourceFile::new("README.MD", "# Title\n\nBody");
        assert_eq!(load_file(&file).unwrap().format, DocumentFormat::Markdown);
    }

    #[test]
    fn test_clean_markdown() {
        let input = "# Header\n\nSome **bold** text\n\n```rust\ncode\n```\n\n---\n- item with [a link](http://x.y)\n![logo](logo.png) More text";
        let output = clean_markdown(input);
        assert!(output.contains("Header"));
        assert!(output.contains("Some bold text"));
        assert!(output.contains("code"));
        assert!(output.contains("item with a link"));
        assert!(output.contains("logo More text"));
        assert!(!output.contains("```"));
        assert!(!output.contains("---"));
        assert!(!output.contains("http://x.y"));
    }

    #[test]
    fn test_strip_links_keeps_plain_brackets() {
        assert_eq!(strip_links("see [1] and [docs](u)!"), "see [1] and docs!");
    }

    #[test]
    fn test_clean_html() {
        let input = "<html><body><p>Hello <b>world</b></p></body></html>";
        assert_eq!(clean_html(input), "Hello world");
    }

    #[test]
    fn test_clean_html_skips_scripts_and_decodes_entities() {
        let input = "<HTML><head><STYLE>p { color: red }</STYLE><script>var a = '<b>';</script></head>\
                     <body><h1>Q&amp;A</h1><p>Caf\u{e9} &lt;open&gt;</p></body></HTML>";
        let output = clean_html(input);
        assert_eq!(output, "Q&A Caf\u{e9} <open>");
    }

    #[test]
    fn test_clean_html_block_tags_separate_words() {
        assert_eq!(clean_html("<li>one</li><li>two</li>"), "one two");
    }

    #[test]
    fn test_docx_extraction() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t xml:space="preserve">The meeting </w:t></w:r><w:r><w:t>is on March 3rd.</w:t></w:r></w:p>
    <w:p><w:r><w:t>Bring &amp; share notes.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let file = SourceFile::new("minutes.docx", docx_bytes(xml));
        let record = load_file(&file).unwrap();
        assert_eq!(record.format, DocumentFormat::WordProcessor);
        assert_eq!(
            record.raw_text,
            "The meeting is on March 3rd.\nBring & share notes."
        );
    }

    #[test]
    fn test_docx_without_body_is_parse_failure() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut cursor);
            writer
                .start_file("docProps/app.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"<Properties/>").unwrap();
            writer.finish().unwrap();
        }

        let file = SourceFile::new("empty.docx", cursor.into_inner());
        assert!(matches!(
            load_file(&file),
            Err(LoadWarningKind::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_failure() {
        let file = SourceFile::new("scan.pdf", b"%PDF-1.4 this is not really a pdf".to_vec());
        assert!(matches!(
            load_file(&file),
            Err(LoadWarningKind::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_load_reports_all_skipped() {
        let files = vec![
            SourceFile::new("a.csv", "x"),
            SourceFile::new("b.pdf", b"garbage".to_vec()),
        ];

        match load(&files) {
            Err(AppError::NoDocumentsLoaded(summary)) => {
                assert!(summary.contains("a.csv"));
                assert!(summary.contains("b.pdf"));
            }
            other => panic!("expected NoDocumentsLoaded, got {:?}", other),
        }
    }

    #[test]
    fn test_load_empty_batch() {
        assert!(matches!(load(&[]), Err(AppError::NoDocumentsLoaded(_))));
    }
}
