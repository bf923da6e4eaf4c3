// ABOUTME: PPTX generation module for the deckgen application
// ABOUTME: Holds the in-memory presentation and writes it out as an OOXML package

use crate::errors::{DeckError, Result};
use log::{debug, info};
use quick_xml::escape::escape;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};
use zip::{write::FileOptions, ZipWriter};

/// 4:3 slide, 10in x 7.5in
pub const SLIDE_WIDTH: i64 = 9_144_000;
pub const SLIDE_HEIGHT: i64 = 6_858_000;

const NS_DECLS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.presentationml";

/// Which slide layout a slide is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLayout {
    /// Centred title with a subtitle below it
    Title,
    /// Title with a bulleted content area
    TitleAndContent,
}

impl SlideLayout {
    fn part_number(self) -> usize {
        match self {
            SlideLayout::Title => 1,
            SlideLayout::TitleAndContent => 2,
        }
    }
}

/// Layout placeholder a text shape fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    CenteredTitle,
    Subtitle,
    Title,
    Body,
}

impl PlaceholderKind {
    fn ph_element(self) -> &'static str {
        match self {
            PlaceholderKind::CenteredTitle => r#"<p:ph type="ctrTitle"/>"#,
            PlaceholderKind::Subtitle => r#"<p:ph type="subTitle" idx="1"/>"#,
            PlaceholderKind::Title => r#"<p:ph type="title"/>"#,
            PlaceholderKind::Body => r#"<p:ph idx="1"/>"#,
        }
    }

    fn shape_name(self) -> &'static str {
        match self {
            PlaceholderKind::CenteredTitle | PlaceholderKind::Title => "Title",
            PlaceholderKind::Subtitle => "Subtitle",
            PlaceholderKind::Body => "Content Placeholder",
        }
    }

    pub fn is_title(self) -> bool {
        matches!(self, PlaceholderKind::CenteredTitle | PlaceholderKind::Title)
    }
}

/// A JPEG picture anchored at a fixed position on the slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub data: Vec<u8>,
    pub description: String,
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Placeholder {
        kind: PlaceholderKind,
        paragraphs: Vec<String>,
        /// Run size in hundredths of a point; `None` inherits from the layout
        font_size: Option<u32>,
    },
    Picture(Picture),
}

/// One slide of the presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    layout: SlideLayout,
    shapes: Vec<Shape>,
    notes: Option<String>,
}

impl Slide {
    fn new(layout: SlideLayout) -> Self {
        Self {
            layout,
            shapes: Vec::new(),
            notes: None,
        }
    }

    pub fn layout(&self) -> SlideLayout {
        self.layout
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Fill the title placeholder of this slide's layout
    pub fn set_title(&mut self, title: &str) {
        let kind = match self.layout {
            SlideLayout::Title => PlaceholderKind::CenteredTitle,
            SlideLayout::TitleAndContent => PlaceholderKind::Title,
        };
        self.set_placeholder(kind, vec![title.to_string()], None);
    }

    /// Fill the subtitle (title layout) or body (content layout) with one paragraph per entry
    pub fn set_body<S: AsRef<str>>(&mut self, paragraphs: &[S], font_size: Option<u32>) {
        let kind = match self.layout {
            SlideLayout::Title => PlaceholderKind::Subtitle,
            SlideLayout::TitleAndContent => PlaceholderKind::Body,
        };
        let paragraphs = paragraphs.iter().map(|p| p.as_ref().to_string()).collect();
        self.set_placeholder(kind, paragraphs, font_size);
    }

    fn set_placeholder(
        &mut self,
        kind: PlaceholderKind,
        paragraphs: Vec<String>,
        font_size: Option<u32>,
    ) {
        let shape = Shape::Placeholder {
            kind,
            paragraphs,
            font_size,
        };
        let existing = self
            .shapes
            .iter()
            .position(|s| matches!(s, Shape::Placeholder { kind: k, .. } if *k == kind));
        match existing {
            Some(index) => self.shapes[index] = shape,
            None => self.shapes.push(shape),
        }
    }

    pub fn add_picture(&mut self, picture: Picture) {
        self.shapes.push(Shape::Picture(picture));
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = Some(notes.to_string());
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.shapes.iter().find_map(|shape| match shape {
            Shape::Placeholder {
                kind, paragraphs, ..
            } if kind.is_title() => paragraphs.first().map(String::as_str),
            _ => None,
        })
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Picture(picture) => Some(picture),
            _ => None,
        })
    }

    fn to_xml(&self, language: &str, first_image_rel: usize) -> String {
        let mut xml = String::with_capacity(2048);
        xml.push_str(XML_HEADER);
        xml.push_str(&format!("<p:sld {}>", NS_DECLS));
        xml.push_str("<p:cSld><p:spTree>");
        push_group_header(&mut xml);

        let mut shape_id = 2;
        let mut image_rel = first_image_rel;
        for shape in &self.shapes {
            match shape {
                Shape::Placeholder {
                    kind,
                    paragraphs,
                    font_size,
                } => {
                    xml.push_str(&format!(
                        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name} {n}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr/>"#,
                        id = shape_id,
                        name = kind.shape_name(),
                        n = shape_id - 1,
                        ph = kind.ph_element()
                    ));
                    push_text_body(&mut xml, paragraphs, language, *font_size);
                    xml.push_str("</p:sp>");
                }
                Shape::Picture(picture) => {
                    xml.push_str(&format!(
                        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {n}" descr="{descr}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId{rel}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
                        id = shape_id,
                        n = shape_id - 1,
                        descr = escape(picture.description.as_str()),
                        rel = image_rel,
                        x = picture.x,
                        y = picture.y,
                        cx = picture.cx,
                        cy = picture.cy
                    ));
                    image_rel += 1;
                }
            }
            shape_id += 1;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
        xml
    }

    fn notes_xml(&self, language: &str) -> String {
        let notes = self.notes.as_deref().unwrap_or_default();
        let paragraphs: Vec<&str> = notes.split('\n').collect();

        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_HEADER);
        xml.push_str(&format!("<p:notes {}>", NS_DECLS));
        xml.push_str("<p:cSld><p:spTree>");
        push_group_header(&mut xml);
        xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#);
        xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>"#);
        push_text_body(&mut xml, &paragraphs, language, None);
        xml.push_str("</p:sp></p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
        xml
    }

    fn rels_xml(&self, slide_num: usize, first_media: usize) -> String {
        let mut rels = rels_open();
        push_rel(
            &mut rels,
            1,
            "slideLayout",
            &format!("../slideLayouts/slideLayout{}.xml", self.layout.part_number()),
        );
        push_rel(
            &mut rels,
            2,
            "notesSlide",
            &format!("../notesSlides/notesSlide{}.xml", slide_num),
        );
        for (offset, _) in self.pictures().enumerate() {
            push_rel(
                &mut rels,
                3 + offset,
                "image",
                &format!("../media/image{}.jpg", first_media + offset),
            );
        }
        rels.push_str("</Relationships>");
        rels
    }
}

/// An in-memory presentation, built slide by slide and saved once.
#[derive(Debug, Clone)]
pub struct Presentation {
    title: String,
    language: String,
    slides: Vec<Slide>,
}

impl Presentation {
    pub fn new(title: &str, language: &str) -> Self {
        Self {
            title: title.to_string(),
            language: language.to_string(),
            slides: Vec::new(),
        }
    }

    /// Append a slide using `layout` and return it for filling in
    pub fn add_slide(&mut self, layout: SlideLayout) -> &mut Slide {
        self.slides.push(Slide::new(layout));
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn picture_count(&self) -> usize {
        self.slides.iter().map(|s| s.pictures().count()).sum()
    }

    /// Save the presentation to `path`.
    ///
    /// The package is written to a temporary file next to `path` and renamed into place, so a
    /// failed save never leaves a truncated document behind.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        info!("Saving presentation to {:?}", path);
        let save_error = |source: std::io::Error| DeckError::Save {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staging = tempfile::NamedTempFile::new_in(dir).map_err(save_error)?;
        self.write_to(staging.as_file_mut())
            .map_err(|e| save_failure(path, e))?;
        staging.as_file().sync_all().map_err(save_error)?;
        staging.persist(path).map_err(|e| save_error(e.error))?;

        info!("PPTX file created at {:?}", path);
        Ok(path.to_path_buf())
    }

    /// Write the complete OOXML package to `writer`
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default();
        let slide_count = self.slides.len();

        // Package-level parts
        put(&mut zip, options, "[Content_Types].xml", &self.content_types_xml())?;
        put(&mut zip, options, "_rels/.rels", ROOT_RELS)?;
        put(&mut zip, options, "docProps/app.xml", &self.app_xml())?;
        put(&mut zip, options, "docProps/core.xml", &self.core_xml())?;

        // Presentation part and its relationships
        put(&mut zip, options, "ppt/presentation.xml", &self.presentation_xml())?;
        put(
            &mut zip,
            options,
            "ppt/_rels/presentation.xml.rels",
            &self.presentation_rels_xml(),
        )?;

        // Master, layouts, themes and notes master
        put(&mut zip, options, "ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER)?;
        put(
            &mut zip,
            options,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &master_rels_xml(),
        )?;
        for (num, layout) in [(1, TITLE_LAYOUT), (2, CONTENT_LAYOUT)] {
            put(
                &mut zip,
                options,
                &format!("ppt/slideLayouts/slideLayout{}.xml", num),
                layout,
            )?;
            put(
                &mut zip,
                options,
                &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", num),
                &single_rel_xml("slideMaster", "../slideMasters/slideMaster1.xml"),
            )?;
        }
        put(&mut zip, options, "ppt/theme/theme1.xml", &theme_xml("Office Theme"))?;
        put(&mut zip, options, "ppt/theme/theme2.xml", &theme_xml("Notes Theme"))?;
        put(&mut zip, options, "ppt/notesMasters/notesMaster1.xml", NOTES_MASTER)?;
        put(
            &mut zip,
            options,
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            &single_rel_xml("theme", "../theme/theme2.xml"),
        )?;

        // Slides, their notes and media
        let mut next_media = 1;
        for (i, slide) in self.slides.iter().enumerate() {
            let slide_num = i + 1;
            debug!("Writing slide {} of {}", slide_num, slide_count);

            put(
                &mut zip,
                options,
                &format!("ppt/slides/slide{}.xml", slide_num),
                &slide.to_xml(&self.language, 3),
            )?;
            put(
                &mut zip,
                options,
                &format!("ppt/slides/_rels/slide{}.xml.rels", slide_num),
                &slide.rels_xml(slide_num, next_media),
            )?;
            put(
                &mut zip,
                options,
                &format!("ppt/notesSlides/notesSlide{}.xml", slide_num),
                &slide.notes_xml(&self.language),
            )?;

            let mut notes_rels = rels_open();
            push_rel(&mut notes_rels, 1, "notesMaster", "../notesMasters/notesMaster1.xml");
            push_rel(&mut notes_rels, 2, "slide", &format!("../slides/slide{}.xml", slide_num));
            notes_rels.push_str("</Relationships>");
            put(
                &mut zip,
                options,
                &format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", slide_num),
                &notes_rels,
            )?;

            for picture in slide.pictures() {
                // JPEG data is already compressed
                let stored =
                    FileOptions::default().compression_method(zip::CompressionMethod::Stored);
                zip.start_file(format!("ppt/media/image{}.jpg", next_media), stored)?;
                zip.write_all(&picture.data)?;
                next_media += 1;
            }
        }

        // Finalize the ZIP file
        zip.finish()?;
        Ok(())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::from(XML_HEADER);
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        xml.push_str(r#"<Default Extension="jpg" ContentType="image/jpeg"/>"#);

        let theme = "application/vnd.openxmlformats-officedocument.theme+xml";
        let core = "application/vnd.openxmlformats-package.core-properties+xml";
        let app = "application/vnd.openxmlformats-officedocument.extended-properties+xml";
        let mut overrides = vec![
            (
                "/ppt/presentation.xml".to_string(),
                format!("{}.presentation.main+xml", CT_BASE),
            ),
            (
                "/ppt/slideMasters/slideMaster1.xml".to_string(),
                format!("{}.slideMaster+xml", CT_BASE),
            ),
            (
                "/ppt/slideLayouts/slideLayout1.xml".to_string(),
                format!("{}.slideLayout+xml", CT_BASE),
            ),
            (
                "/ppt/slideLayouts/slideLayout2.xml".to_string(),
                format!("{}.slideLayout+xml", CT_BASE),
            ),
            (
                "/ppt/notesMasters/notesMaster1.xml".to_string(),
                format!("{}.notesMaster+xml", CT_BASE),
            ),
            ("/ppt/theme/theme1.xml".to_string(), theme.to_string()),
            ("/ppt/theme/theme2.xml".to_string(), theme.to_string()),
            ("/docProps/core.xml".to_string(), core.to_string()),
            ("/docProps/app.xml".to_string(), app.to_string()),
        ];
        for num in 1..=self.slides.len() {
            overrides.push((
                format!("/ppt/slides/slide{}.xml", num),
                format!("{}.slide+xml", CT_BASE),
            ));
            overrides.push((
                format!("/ppt/notesSlides/notesSlide{}.xml", num),
                format!("{}.notesSlide+xml", CT_BASE),
            ));
        }

        for (part, content_type) in overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn app_xml(&self) -> String {
        format!(
            r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>deckgen</Application><Slides>{}</Slides><Notes>{}</Notes></Properties>"#,
            XML_HEADER,
            self.slides.len(),
            self.slides.iter().filter(|s| s.notes.is_some()).count()
        )
    }

    fn core_xml(&self) -> String {
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        format!(
            r#"{}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>deckgen</dc:creator><dc:language>{}</dc:language><dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified><cp:revision>1</cp:revision></cp:coreProperties>"#,
            XML_HEADER,
            escape(self.title.as_str()),
            escape(self.language.as_str()),
            now,
            now
        )
    }

    // Slides take rId1..rIdN; master, notes master and theme follow.
    fn presentation_xml(&self) -> String {
        let n = self.slides.len();
        let slide_ids: String = (0..n)
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 1))
            .collect();
        format!(
            r#"{header}<p:presentation {ns} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId{master}"/></p:sldMasterIdLst><p:notesMasterIdLst><p:notesMasterId r:id="rId{notes}"/></p:notesMasterIdLst><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="{cx}" cy="{cy}" type="screen4x3"/><p:notesSz cx="{cy}" cy="{cx}"/></p:presentation>"#,
            header = XML_HEADER,
            ns = NS_DECLS,
            master = n + 1,
            notes = n + 2,
            slide_ids = slide_ids,
            cx = SLIDE_WIDTH,
            cy = SLIDE_HEIGHT
        )
    }

    fn presentation_rels_xml(&self) -> String {
        let n = self.slides.len();
        let mut rels = rels_open();
        for i in 1..=n {
            push_rel(&mut rels, i, "slide", &format!("slides/slide{}.xml", i));
        }
        push_rel(&mut rels, n + 1, "slideMaster", "slideMasters/slideMaster1.xml");
        push_rel(&mut rels, n + 2, "notesMaster", "notesMasters/notesMaster1.xml");
        push_rel(&mut rels, n + 3, "theme", "theme/theme1.xml");
        rels.push_str("</Relationships>");
        rels
    }
}

// Any failure while writing the package is reported against the target path.
pub(crate) fn save_failure(path: &Path, error: DeckError) -> DeckError {
    let source = match error {
        DeckError::Io(source) => source,
        DeckError::Save { source, .. } => source,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    };
    DeckError::Save {
        path: path.to_path_buf(),
        source,
    }
}

fn put<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    name: &str,
    content: &str,
) -> Result<()> {
    debug!("Adding part {}", name);
    zip.start_file(name, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn push_group_header(xml: &mut String) {
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);
}

fn push_text_body<S: AsRef<str>>(
    xml: &mut String,
    paragraphs: &[S],
    language: &str,
    font_size: Option<u32>,
) {
    let lang = escape(language);
    let size = font_size.map(|sz| format!(r#" sz="{}""#, sz)).unwrap_or_default();

    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    for paragraph in paragraphs {
        let text = paragraph.as_ref();
        xml.push_str("<a:p>");
        if font_size.is_some() {
            xml.push_str(r#"<a:pPr lvl="0"/>"#);
        }
        if !text.is_empty() {
            xml.push_str(&format!(
                r#"<a:r><a:rPr lang="{}"{} dirty="0"/><a:t>{}</a:t></a:r>"#,
                lang,
                size,
                escape(text)
            ));
        }
        xml.push_str(&format!(
            r#"<a:endParaRPr lang="{}"{} dirty="0"/>"#,
            lang, size
        ));
        xml.push_str("</a:p>");
    }
    if paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    xml.push_str("</p:txBody>");
}

fn rels_open() -> String {
    format!(
        r#"{}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        XML_HEADER
    )
}

fn push_rel(rels: &mut String, id: usize, kind: &str, target: &str) {
    rels.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="{}/{}" Target="{}"/>"#,
        id, REL_BASE, kind, target
    ));
}

fn single_rel_xml(kind: &str, target: &str) -> String {
    let mut rels = rels_open();
    push_rel(&mut rels, 1, kind, target);
    rels.push_str("</Relationships>");
    rels
}

fn master_rels_xml() -> String {
    let mut rels = rels_open();
    push_rel(&mut rels, 1, "slideLayout", "../slideLayouts/slideLayout1.xml");
    push_rel(&mut rels, 2, "slideLayout", "../slideLayouts/slideLayout2.xml");
    push_rel(&mut rels, 3, "theme", "../theme/theme1.xml");
    rels.push_str("</Relationships>");
    rels
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const SLIDE_MASTER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>"#,
    r#"<p:spPr><a:xfrm><a:off x="457200" y="274638"/><a:ext cx="8229600" cy="1143000"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
    r#"<p:txBody><a:bodyPr vert="horz" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0" anchor="ctr"><a:normAutofit/></a:bodyPr><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Text Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>"#,
    r#"<p:spPr><a:xfrm><a:off x="457200" y="1600200"/><a:ext cx="8229600" cy="4525963"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
    r#"<p:txBody><a:bodyPr vert="horz" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/><a:p><a:pPr lvl="0"/><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"</p:spTree></p:cSld>"#,
    r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
    r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/><p:sldLayoutId id="2147483650" r:id="rId2"/></p:sldLayoutIdLst>"#,
    r#"<p:txStyles>"#,
    r#"<p:titleStyle><a:lvl1pPr algn="ctr" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/><a:defRPr sz="4400" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr></p:titleStyle>"#,
    r#"<p:bodyStyle><a:lvl1pPr marL="342900" indent="-342900" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:spcBef><a:spcPct val="20000"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/><a:defRPr sz="3200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:bodyStyle>"#,
    r#"<p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr><a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:defRPr sz="1800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:otherStyle>"#,
    r#"</p:txStyles></p:sldMaster>"#
);

const TITLE_LAYOUT: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="title" preserve="1">"#,
    r#"<p:cSld name="Title Slide"><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="ctrTitle"/></p:nvPr></p:nvSpPr>"#,
    r#"<p:spPr><a:xfrm><a:off x="685800" y="2130425"/><a:ext cx="7772400" cy="1470025"/></a:xfrm></p:spPr>"#,
    r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Subtitle 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="subTitle" idx="1"/></p:nvPr></p:nvSpPr>"#,
    r#"<p:spPr><a:xfrm><a:off x="1371600" y="3886200"/><a:ext cx="6400800" cy="1752600"/></a:xfrm></p:spPr>"#,
    r#"<p:txBody><a:bodyPr/><a:lstStyle><a:lvl1pPr marL="0" indent="0" algn="ctr"><a:buNone/><a:defRPr><a:solidFill><a:schemeClr val="tx1"><a:tint val="75000"/></a:schemeClr></a:solidFill></a:defRPr></a:lvl1pPr></a:lstStyle><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
);

const CONTENT_LAYOUT: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="obj" preserve="1">"#,
    r#"<p:cSld name="Title and Content"><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/>"#,
    r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>"#,
    r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:pPr lvl="0"/><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
);

const NOTES_MASTER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<p:notesMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
    r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#,
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg" idx="2"/></p:nvPr></p:nvSpPr>"#,
    r#"<p:spPr><a:xfrm><a:off x="1143000" y="685800"/><a:ext cx="4572000" cy="3429000"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/><a:ln w="12700"><a:solidFill><a:prstClr val="black"/></a:solidFill></a:ln></p:spPr></p:sp>"#,
    r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" sz="quarter" idx="3"/></p:nvPr></p:nvSpPr>"#,
    r#"<p:spPr><a:xfrm><a:off x="685800" y="4343400"/><a:ext cx="5486400" cy="4114800"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
    r#"<p:txBody><a:bodyPr vert="horz" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0"/><a:lstStyle/><a:p><a:pPr lvl="0"/><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
    r#"</p:spTree></p:cSld>"#,
    r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
    r#"<p:notesStyle><a:lvl1pPr marL="0" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:defRPr sz="1200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl1pPr></p:notesStyle>"#,
    r#"</p:notesMaster>"#
);

fn theme_xml(name: &str) -> String {
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = |w: u32| {
        format!(
            r#"<a:ln w="{}" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/></a:ln>"#,
            w
        )
    };
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    let mut xml = String::from(XML_HEADER);
    xml.push_str(&format!(
        r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="{}"><a:themeElements>"#,
        escape(name)
    ));
    xml.push_str(concat!(
        r#"<a:clrScheme name="Office">"#,
        r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
        r#"<a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2>"#,
        r#"<a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2>"#,
        r#"<a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4>"#,
        r#"<a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6>"#,
        r#"<a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink>"#,
        r#"</a:clrScheme>"#,
        r#"<a:fontScheme name="Office">"#,
        r#"<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
        r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
        r#"</a:fontScheme>"#
    ));
    xml.push_str(r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#);
    for _ in 0..3 {
        xml.push_str(solid);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for w in [9525, 25400, 38100] {
        xml.push_str(&line(w));
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str(effect);
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(solid);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    xml
}
