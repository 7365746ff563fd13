//! DOCX ↔ HTML conversion
//!
//! `DocxConverter` covers the subset of WordprocessingML an edited letter or
//! report needs: paragraphs, headings, bullet and numbered lists, bold/italic/underline
//! runs, line breaks and simple tables.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// DOCX → HTML result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub html: String,
    pub warnings: Vec<String>,
}

/// Stateless document conversion collaborator
pub trait DocumentConverter: Send + Sync {
    /// Fails with `UnsupportedFormat` when the bytes are not a DOCX package
    fn docx_to_html(&self, bytes: &[u8]) -> Result<Conversion, ConvertError>;

    fn html_to_docx(&self, html: &str, title: &str) -> Result<Vec<u8>, ConvertError>;
}

/// Built-in converter over `zip` + `quick-xml` + `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxConverter;

impl DocxConverter {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentConverter for DocxConverter {
    fn docx_to_html(&self, bytes: &[u8]) -> Result<Conversion, ConvertError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|_| ConvertError::UnsupportedFormat("not a zip package".to_string()))?;

        let document = read_part(&mut archive, "word/document.xml")?.ok_or_else(|| {
            ConvertError::UnsupportedFormat("missing word/document.xml".to_string())
        })?;
        let styles = match read_part(&mut archive, "word/styles.xml")? {
            Some(xml) => parse_style_names(&xml)?,
            None => HashMap::new(),
        };
        let numbering = match read_part(&mut archive, "word/numbering.xml")? {
            Some(xml) => parse_numbering(&xml)?,
            None => HashMap::new(),
        };

        DocumentReader::new(&styles, &numbering).convert(&document)
    }

    fn html_to_docx(&self, html: &str, title: &str) -> Result<Vec<u8>, ConvertError> {
        let walked = HtmlWalker::collect(html);
        let body: String = walked.paragraphs.iter().map(DocParagraph::to_xml).collect();
        let document = format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="{ns}"><w:body>{body}"#,
                r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#,
                r#"</w:body></w:document>"#
            ),
            ns = W_NS,
            body = body
        );

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let parts: [(&str, Cow<'_, str>); 7] = [
            ("[Content_Types].xml", Cow::Borrowed(CONTENT_TYPES)),
            ("_rels/.rels", Cow::Borrowed(ROOT_RELS)),
            ("word/_rels/document.xml.rels", Cow::Borrowed(DOCUMENT_RELS)),
            ("word/document.xml", Cow::Owned(document)),
            ("word/styles.xml", Cow::Owned(styles_xml())),
            ("word/numbering.xml", Cow::Owned(numbering_xml(&walked.lists))),
            ("docProps/core.xml", Cow::Owned(core_xml(title))),
        ];
        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

fn read_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ConvertError> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

fn attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    e.try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Toggle properties (`<w:b/>`, `<w:b w:val="0"/>`)
fn toggle_on(e: &BytesStart<'_>) -> bool {
    !matches!(attr(e, "w:val").as_deref(), Some("0") | Some("false") | Some("none"))
}

/// styleId → display name from `word/styles.xml`
fn parse_style_names(xml: &str) -> Result<HashMap<String, String>, ConvertError> {
    let mut reader = Reader::from_str(xml);
    let mut names = HashMap::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:style" => current = attr(&e, "w:styleId"),
                b"w:name" => {
                    if let (Some(id), Some(name)) = (current.as_ref(), attr(&e, "w:val")) {
                        names.insert(id.clone(), name);
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:style" => current = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(names)
}

/// numId → whether the list is ordered, from `word/numbering.xml`
///
/// Only level 0 of each abstract definition decides the list type.
fn parse_numbering(xml: &str) -> Result<HashMap<String, bool>, ConvertError> {
    let mut reader = Reader::from_str(xml);
    let mut abstract_formats: HashMap<String, String> = HashMap::new();
    let mut num_to_abstract: HashMap<String, String> = HashMap::new();
    let mut current_abstract: Option<String> = None;
    let mut current_level: Option<String> = None;
    let mut current_num: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:abstractNum" => current_abstract = attr(&e, "w:abstractNumId"),
                b"w:lvl" => current_level = attr(&e, "w:ilvl"),
                b"w:numFmt" if current_level.as_deref() == Some("0") => {
                    if let (Some(id), Some(format)) = (current_abstract.as_ref(), attr(&e, "w:val")) {
                        abstract_formats.entry(id.clone()).or_insert(format);
                    }
                }
                b"w:num" => current_num = attr(&e, "w:numId"),
                b"w:abstractNumId" => {
                    if let (Some(num), Some(abstract_id)) = (current_num.as_ref(), attr(&e, "w:val")) {
                        num_to_abstract.insert(num.clone(), abstract_id);
                    }
                }
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:abstractNum" => current_abstract = None,
                b"w:lvl" => current_level = None,
                b"w:num" => current_num = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(num_to_abstract
        .into_iter()
        .map(|(num, abstract_id)| {
            let ordered = abstract_formats
                .get(&abstract_id)
                .is_some_and(|format| format != "bullet" && format != "none");
            (num, ordered)
        })
        .collect())
}

/// Characters allowed by the XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphKind {
    Heading(u8),
    ListItem,
    Plain,
}

/// The list an open `<ul>`/`<ol>` belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenList {
    num_id: Option<String>,
    ordered: bool,
}

impl OpenList {
    fn tag(&self) -> &'static str {
        if self.ordered {
            "ol"
        } else {
            "ul"
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct RunFormat {
    bold: bool,
    italic: bool,
    underline: bool,
}

impl RunFormat {
    fn wrap(self, text: &str) -> String {
        let mut html = partial_escape(text).into_owned();
        if self.underline {
            html = format!("<u>{}</u>", html);
        }
        if self.italic {
            html = format!("<em>{}</em>", html);
        }
        if self.bold {
            html = format!("<strong>{}</strong>", html);
        }
        html
    }
}

/// Streaming reader over `word/document.xml`
struct DocumentReader<'a> {
    styles: &'a HashMap<String, String>,
    numbering: &'a HashMap<String, bool>,
    out: String,
    warnings: Vec<String>,
    list: Option<OpenList>,
    in_run: bool,
    in_text: bool,
    run: RunFormat,
    style_id: Option<String>,
    numbered: bool,
    num_id: Option<String>,
    content: String,
}

impl<'a> DocumentReader<'a> {
    fn new(styles: &'a HashMap<String, String>, numbering: &'a HashMap<String, bool>) -> Self {
        Self {
            styles,
            numbering,
            out: String::new(),
            warnings: Vec::new(),
            list: None,
            in_run: false,
            in_text: false,
            run: RunFormat::default(),
            style_id: None,
            numbered: false,
            num_id: None,
            content: String::new(),
        }
    }

    fn convert(mut self, xml: &str) -> Result<Conversion, ConvertError> {
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event()? {
                Event::Start(e) => self.open(&e, false),
                Event::Empty(e) => self.open(&e, true),
                Event::End(e) => match e.name().as_ref() {
                    b"w:p" => self.finish_paragraph(),
                    b"w:r" => self.in_run = false,
                    b"w:t" => self.in_text = false,
                    b"w:tc" => {
                        self.close_list();
                        self.out.push_str("</td>");
                    }
                    b"w:tr" => {
                        self.close_list();
                        self.out.push_str("</tr>");
                    }
                    b"w:tbl" => {
                        self.close_list();
                        self.out.push_str("</table>");
                    }
                    _ => {}
                },
                Event::Text(t) if self.in_text => {
                    let text = t.unescape()?;
                    self.content.push_str(&self.run.wrap(&text));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        self.close_list();
        Ok(Conversion {
            html: self.out,
            warnings: self.warnings,
        })
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) {
        match e.name().as_ref() {
            b"w:p" => {
                self.style_id = None;
                self.numbered = false;
                self.num_id = None;
                self.content.clear();
                if empty {
                    self.finish_paragraph();
                }
            }
            b"w:pStyle" => self.style_id = attr(e, "w:val"),
            b"w:numPr" => self.numbered = true,
            b"w:numId" if self.numbered => self.num_id = attr(e, "w:val"),
            b"w:r" => {
                self.in_run = !empty;
                self.run = RunFormat::default();
            }
            b"w:b" if self.in_run => self.run.bold = toggle_on(e),
            b"w:i" if self.in_run => self.run.italic = toggle_on(e),
            b"w:u" if self.in_run => self.run.underline = toggle_on(e),
            b"w:t" => self.in_text = !empty,
            b"w:br" | b"w:cr" if self.in_run => self.content.push_str("<br />"),
            b"w:tab" if self.in_run => self.content.push('\t'),
            b"w:tbl" => {
                self.close_list();
                self.out.push_str("<table>");
            }
            b"w:tr" => {
                self.close_list();
                self.out.push_str("<tr>");
            }
            b"w:tc" => {
                self.close_list();
                self.out.push_str("<td>");
            }
            _ => {}
        }
    }

    fn classify(&mut self) -> ParagraphKind {
        let Some(id) = self.style_id.clone() else {
            return if self.numbered {
                ParagraphKind::ListItem
            } else {
                ParagraphKind::Plain
            };
        };
        let name = self.styles.get(&id).cloned().unwrap_or_else(|| id.clone());
        let lower = name.to_lowercase();
        let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();

        if compact == "title" {
            return ParagraphKind::Heading(1);
        }
        if let Some(level) = compact.strip_prefix("heading") {
            if let Ok(level) = level.parse::<u8>() {
                return ParagraphKind::Heading(level.clamp(1, 6));
            }
        }
        if compact == "listparagraph" || self.numbered {
            return ParagraphKind::ListItem;
        }
        if compact != "normal" {
            let warning = format!(
                "Unrecognised paragraph style: '{}' (Style ID: {})",
                name, id
            );
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
        ParagraphKind::Plain
    }

    fn finish_paragraph(&mut self) {
        let kind = self.classify();
        let content = std::mem::take(&mut self.content);
        if content.is_empty() {
            return;
        }
        match kind {
            ParagraphKind::ListItem => {
                let wanted = OpenList {
                    ordered: self
                        .num_id
                        .as_ref()
                        .and_then(|id| self.numbering.get(id))
                        .copied()
                        .unwrap_or(false),
                    num_id: self.num_id.clone(),
                };
                if self.list.as_ref() != Some(&wanted) {
                    self.close_list();
                    self.out.push_str(&format!("<{}>", wanted.tag()));
                    self.list = Some(wanted);
                }
                self.out.push_str(&format!("<li>{}</li>", content));
            }
            ParagraphKind::Heading(level) => {
                self.close_list();
                self.out
                    .push_str(&format!("<h{level}>{content}</h{level}>", level = level, content = content));
            }
            ParagraphKind::Plain => {
                self.close_list();
                self.out.push_str(&format!("<p>{}</p>", content));
            }
        }
    }

    fn close_list(&mut self) {
        if let Some(list) = self.list.take() {
            self.out.push_str(&format!("</{}>", list.tag()));
        }
    }
}

// ========== HTML → DOCX ==========

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#,
    r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"</Relationships>"#
);

const DOCUMENT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#,
    r#"</Relationships>"#
);

fn styles_xml() -> String {
    let mut styles = String::from(
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#,
    );
    styles.push_str(
        r#"<w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/><w:pPr><w:ind w:left="720"/></w:pPr></w:style>"#,
    );
    for level in 1..=6u8 {
        let size = 40 - u32::from(level) * 4;
        styles.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:rPr><w:b/><w:sz w:val="{size}"/></w:rPr></w:style>"#,
            level = level,
            size = size
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="{}">{}</w:styles>"#,
        W_NS, styles
    )
}

const BULLET_ABSTRACT_ID: u32 = 0;
const DECIMAL_ABSTRACT_ID: u32 = 1;

/// One numbering instance per HTML list so each `<ol>` restarts at 1.
///
/// `lists[i]` is whether list `numId = i + 1` is ordered.
fn numbering_xml(lists: &[bool]) -> String {
    let level = |format: &str, text: &str| {
        format!(
            concat!(
                r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="{}"/>"#,
                r#"<w:lvlText w:val="{}"/><w:lvlJc w:val="left"/>"#,
                r#"<w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>"#
            ),
            format, text
        )
    };
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:numbering xmlns:w="{}">"#,
        W_NS
    );
    xml.push_str(&format!(
        r#"<w:abstractNum w:abstractNumId="{}">{}</w:abstractNum>"#,
        BULLET_ABSTRACT_ID,
        level("bullet", "•")
    ));
    xml.push_str(&format!(
        r#"<w:abstractNum w:abstractNumId="{}">{}</w:abstractNum>"#,
        DECIMAL_ABSTRACT_ID,
        level("decimal", "%1.")
    ));
    for (index, ordered) in lists.iter().enumerate() {
        let abstract_id = if *ordered {
            DECIMAL_ABSTRACT_ID
        } else {
            BULLET_ABSTRACT_ID
        };
        xml.push_str(&format!(
            concat!(
                r#"<w:num w:numId="{}"><w:abstractNumId w:val="{}"/>"#,
                r#"<w:lvlOverride w:ilvl="0"><w:startOverride w:val="1"/></w:lvlOverride></w:num>"#
            ),
            index + 1,
            abstract_id
        ));
    }
    xml.push_str("</w:numbering>");
    xml
}

fn core_xml(title: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
            r#"<dc:title>{}</dc:title></cp:coreProperties>"#
        ),
        escape(title)
    )
}

#[derive(Debug, Clone, Default, PartialEq)]
struct DocRun {
    text: String,
    bold: bool,
    italic: bool,
    underline: bool,
    line_break: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct DocParagraph {
    style: Option<String>,
    /// `numId` of the list this paragraph is an item of
    num_id: Option<usize>,
    runs: Vec<DocRun>,
}

impl DocParagraph {
    fn is_blank(&self) -> bool {
        self.runs
            .iter()
            .all(|r| !r.line_break && r.text.trim().is_empty())
    }

    fn to_xml(&self) -> String {
        let mut xml = String::from("<w:p>");
        if self.style.is_some() || self.num_id.is_some() {
            xml.push_str("<w:pPr>");
            if let Some(style) = &self.style {
                xml.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, style));
            }
            if let Some(num_id) = self.num_id {
                xml.push_str(&format!(
                    r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="{}"/></w:numPr>"#,
                    num_id
                ));
            }
            xml.push_str("</w:pPr>");
        }
        for run in &self.runs {
            xml.push_str("<w:r>");
            if run.bold || run.italic || run.underline {
                xml.push_str("<w:rPr>");
                if run.bold {
                    xml.push_str("<w:b/>");
                }
                if run.italic {
                    xml.push_str("<w:i/>");
                }
                if run.underline {
                    xml.push_str(r#"<w:u w:val="single"/>"#);
                }
                xml.push_str("</w:rPr>");
            }
            if run.line_break {
                xml.push_str("<w:br/>");
            } else {
                xml.push_str(&format!(
                    r#"<w:t xml:space="preserve">{}</w:t>"#,
                    escape(run.text.as_str())
                ));
            }
            xml.push_str("</w:r>");
        }
        xml.push_str("</w:p>");
        xml
    }
}

/// Paragraphs plus the list instances they refer to
#[derive(Debug, Default)]
struct WalkedHtml {
    paragraphs: Vec<DocParagraph>,
    /// Ordered flag per list, indexed by `numId - 1`
    lists: Vec<bool>,
}

/// Flattens an HTML fragment into DOCX paragraphs
#[derive(Default)]
struct HtmlWalker {
    walked: WalkedHtml,
    current: DocParagraph,
    format: RunFormat,
    /// numIds of the enclosing lists, innermost last
    open_lists: Vec<usize>,
}

impl HtmlWalker {
    fn collect(html: &str) -> WalkedHtml {
        let fragment = Html::parse_fragment(html);
        let mut walker = HtmlWalker::default();
        walker.walk(fragment.root_element());
        walker.flush();
        walker.walked
    }

    fn flush(&mut self) {
        let paragraph = std::mem::take(&mut self.current);
        if !paragraph.is_blank() {
            self.walked.paragraphs.push(paragraph);
        }
    }

    fn push_text(&mut self, text: &str) {
        let text: String = text.chars().filter(|c| is_xml_char(*c)).collect();
        let text = text.as_str();
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !text.is_empty() && !self.current.runs.is_empty() {
                self.push_run(" ".to_string(), false);
            }
            return;
        }
        let mut value = collapsed;
        if text.starts_with(char::is_whitespace) && !self.current.runs.is_empty() {
            value.insert(0, ' ');
        }
        if text.ends_with(char::is_whitespace) {
            value.push(' ');
        }
        self.push_run(value, false);
    }

    fn push_run(&mut self, text: String, line_break: bool) {
        self.current.runs.push(DocRun {
            text,
            bold: self.format.bold,
            italic: self.format.italic,
            underline: self.format.underline,
            line_break,
        });
    }

    fn block(&mut self, element: ElementRef<'_>, style: Option<String>, num_id: Option<usize>) {
        self.flush();
        self.current.style = style;
        self.current.num_id = num_id;
        self.walk(element);
        self.flush();
    }

    fn list(&mut self, element: ElementRef<'_>, ordered: bool) {
        self.walked.lists.push(ordered);
        self.open_lists.push(self.walked.lists.len());
        self.walk(element);
        self.open_lists.pop();
    }

    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                self.element(child_element);
            } else if let Node::Text(text) = child.value() {
                self.push_text(text);
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        match name {
            "script" | "style" | "head" | "title" => {}
            "p" | "div" | "blockquote" | "pre" | "section" | "article" => {
                self.block(element, None, None)
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let style = format!("Heading{}", &name[1..]);
                self.block(element, Some(style), None)
            }
            "ul" => self.list(element, false),
            "ol" => self.list(element, true),
            "li" => {
                let num_id = self.open_lists.last().copied();
                self.block(element, Some("ListParagraph".to_string()), num_id);
            }
            "tr" => {
                self.flush();
                let mut first = true;
                for cell in element
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|c| matches!(c.value().name(), "td" | "th"))
                {
                    if !first {
                        self.push_run("\t".to_string(), false);
                    }
                    first = false;
                    self.walk(cell);
                }
                self.flush();
            }
            "br" => self.push_run(String::new(), true),
            "strong" | "b" => self.styled(element, |f| f.bold = true),
            "em" | "i" => self.styled(element, |f| f.italic = true),
            "u" => self.styled(element, |f| f.underline = true),
            _ => self.walk(element),
        }
    }

    fn styled(&mut self, element: ElementRef<'_>, apply: impl FnOnce(&mut RunFormat)) {
        let saved = self.format;
        apply(&mut self.format);
        self.walk(element);
        self.format = saved;
    }
}
