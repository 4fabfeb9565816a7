use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::errors::DocumentError;
use crate::translation::formatting::FormattingRemapper;

// @module: DOCX reading and writing with formatting preservation

/// WordprocessingML namespace
const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Static package part: content types manifest
const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

/// Static package part: package relationships
const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Static package part: document relationships
const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// @struct: Single text segment with consistent formatting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    // @field: Text content
    pub text: String,

    // @field: Bold flag
    pub bold: bool,

    // @field: Italic flag
    pub italic: bool,
}

impl Run {
    /// Create a new run with the given text and formatting flags
    pub fn new(text: impl Into<String>, bold: bool, italic: bool) -> Self {
        Run {
            text: text.into(),
            bold,
            italic,
        }
    }

    /// Create an unformatted run
    pub fn plain(text: impl Into<String>) -> Self {
        Run::new(text, false, false)
    }
}

// @struct: A paragraph containing an ordered sequence of runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    // @field: Ordered runs
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Create a paragraph from runs
    pub fn new(runs: Vec<Run>) -> Self {
        Paragraph { runs }
    }

    /// Full text of the paragraph (run texts concatenated)
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether the paragraph has no text content (whitespace-only counts as empty)
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }
}

/// Output document settings applied to every run
#[derive(Debug, Clone)]
pub struct OutputStyle {
    /// Font for Latin text
    pub latin_font: String,

    /// Font for East Asian text
    pub east_asian_font: String,

    /// Font size in points
    pub font_size_pt: u32,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            latin_font: "Microsoft YaHei".to_string(),
            east_asian_font: "Microsoft YaHei".to_string(),
            font_size_pt: 14,
        }
    }
}

/// Read a DOCX file and extract paragraphs with formatting.
///
/// Paragraphs are returned in document order; empty paragraphs are kept so
/// the positional index stays aligned with the source document.
pub fn read_docx(path: &Path) -> Result<Vec<Paragraph>> {
    let file = File::open(path)
        .map_err(|e| DocumentError::Read(format!("{}: {}", path.display(), e)))?;

    let mut archive = ZipArchive::new(file)
        .map_err(|e| DocumentError::Read(format!("not a DOCX package: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DocumentError::Read(format!("missing word/document.xml: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::Read(e.to_string()))?;

    parse_document_xml(&xml)
}

/// Parse the body of a WordprocessingML document into paragraphs.
///
/// Only run text and the bold/italic run properties are extracted; everything
/// else in the markup is ignored.
pub fn parse_document_xml(xml: &str) -> Result<Vec<Paragraph>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current_runs: Option<Vec<Run>> = None;
    let mut current_run: Option<Run> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current_runs = Some(Vec::new()),
                b"w:r" => {
                    if current_runs.is_some() {
                        current_run = Some(Run::default());
                    }
                }
                b"w:t" => in_text = current_run.is_some(),
                b"w:b" => {
                    if let Some(run) = current_run.as_mut() {
                        run.bold = toggle_value(&e);
                    }
                }
                b"w:i" => {
                    if let Some(run) = current_run.as_mut() {
                        run.italic = toggle_value(&e);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // Self-closing empty paragraph, kept for positional alignment
                b"w:p" => paragraphs.push(Paragraph::default()),
                b"w:b" => {
                    if let Some(run) = current_run.as_mut() {
                        run.bold = toggle_value(&e);
                    }
                }
                b"w:i" => {
                    if let Some(run) = current_run.as_mut() {
                        run.italic = toggle_value(&e);
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if in_text {
                    if let Some(run) = current_run.as_mut() {
                        let text = t
                            .unescape()
                            .map_err(|e| DocumentError::Parse(e.to_string()))?;
                        run.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => {
                    if let (Some(runs), Some(run)) = (current_runs.as_mut(), current_run.take()) {
                        // Only keep non-empty runs
                        if !run.text.is_empty() {
                            runs.push(run);
                        }
                    }
                }
                b"w:p" => {
                    if let Some(runs) = current_runs.take() {
                        paragraphs.push(Paragraph::new(runs));
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocumentError::Parse(e.to_string()).into()),
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Read a WordprocessingML on/off toggle attribute (`w:val`).
///
/// An absent attribute means the property is switched on.
fn toggle_value(element: &BytesStart) -> bool {
    for attr in element.attributes().flatten() {
        if attr.key.as_ref() == b"w:val" {
            if let Ok(value) = attr.unescape_value() {
                return !matches!(value.as_ref(), "false" | "0" | "none");
            }
        }
    }
    true
}

/// Write translated content to a DOCX file, preserving formatting.
///
/// The run layout for each paragraph comes from [`FormattingRemapper`], which
/// redistributes the original run formatting over the translated text.
/// Paragraphs that are empty on both sides are dropped so the output carries
/// no blank artifacts.
pub fn write_docx(
    paragraphs: &[Paragraph],
    translated_texts: &[String],
    path: &Path,
    style: &OutputStyle,
) -> Result<()> {
    let document_xml = build_document_xml(paragraphs, translated_texts)?;
    let styles_xml = build_styles_xml(style);

    let file = File::create(path)
        .map_err(|e| DocumentError::Write(format!("{}: {}", path.display(), e)))?;

    let mut package = ZipWriter::new(file);
    let options: FileOptions = FileOptions::default();

    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("word/styles.xml", &styles_xml),
        ("word/document.xml", &document_xml),
    ];

    for (name, content) in parts {
        package
            .start_file(name, options)
            .map_err(|e| DocumentError::Write(format!("{}: {}", name, e)))?;
        package
            .write_all(content.as_bytes())
            .map_err(|e| DocumentError::Write(format!("{}: {}", name, e)))?;
    }

    package
        .finish()
        .map_err(|e| DocumentError::Write(e.to_string()))?;

    Ok(())
}

/// Build the main document part from the remapped run layout
fn build_document_xml(paragraphs: &[Paragraph], translated_texts: &[String]) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .context("Failed to write XML declaration")?;

    let mut document = BytesStart::new("w:document");
    document.push_attribute(("xmlns:w", WORD_NS));
    writer.write_event(Event::Start(document))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for (paragraph, translated) in paragraphs.iter().zip(translated_texts.iter()) {
        // Both sides empty: omit the paragraph entirely. A non-empty source
        // whose translation came back empty keeps a blank paragraph slot.
        if paragraph.is_empty() && translated.trim().is_empty() {
            continue;
        }

        let runs = FormattingRemapper::remap(paragraph, translated);

        writer.write_event(Event::Start(BytesStart::new("w:p")))?;
        for run in &runs {
            write_run(&mut writer, run)?;
        }
        writer.write_event(Event::End(BytesStart::new("w:p").to_end()))?;
    }

    writer.write_event(Event::End(BytesStart::new("w:body").to_end()))?;
    writer.write_event(Event::End(BytesStart::new("w:document").to_end()))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).context("Document XML was not valid UTF-8")
}

/// Write a single formatted run element
fn write_run(writer: &mut Writer<Cursor<Vec<u8>>>, run: &Run) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;

    if run.bold || run.italic {
        writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
        if run.bold {
            writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
        }
        if run.italic {
            writer.write_event(Event::Empty(BytesStart::new("w:i")))?;
        }
        writer.write_event(Event::End(BytesStart::new("w:rPr").to_end()))?;
    }

    let mut text = BytesStart::new("w:t");
    text.push_attribute(("xml:space", "preserve"));
    writer.write_event(Event::Start(text))?;
    writer.write_event(Event::Text(BytesText::new(&run.text)))?;
    writer.write_event(Event::End(BytesStart::new("w:t").to_end()))?;

    writer.write_event(Event::End(BytesStart::new("w:r").to_end()))?;
    Ok(())
}

/// Build the styles part, setting the Normal style fonts and size.
///
/// The East Asian font has its own slot so CJK output renders with the
/// configured typeface rather than the Latin fallback.
fn build_styles_xml(style: &OutputStyle) -> String {
    // w:sz is measured in half-points
    let half_points = style.font_size_pt * 2;
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{ns}"><w:style w:type="paragraph" w:styleId="Normal" w:default="1"><w:name w:val="Normal"/><w:rPr><w:rFonts w:ascii="{latin}" w:hAnsi="{latin}" w:eastAsia="{east_asia}"/><w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/></w:rPr></w:style></w:styles>"#,
        ns = WORD_NS,
        latin = escape(&style.latin_font),
        east_asia = escape(&style.east_asian_font),
        sz = half_points,
    )
}
