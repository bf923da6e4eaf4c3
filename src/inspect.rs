// ABOUTME: Inspection module for the deckgen application
// ABOUTME: Reads a written PPTX back into a per-slide text and picture outline

use crate::errors::{DeckError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Position and size of a picture, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureFrame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// What a reader of the deck sees on one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideOutline {
    pub title: String,
    /// Paragraphs of the subtitle or body placeholder
    pub body: Vec<String>,
    pub notes: String,
    pub pictures: Vec<PictureFrame>,
}

/// Read the outline of every slide in the PPTX at `path`, in presentation order.
pub fn read_outline(path: &Path) -> Result<Vec<SlideOutline>> {
    if !path.exists() {
        return Err(DeckError::PathNotFound(path.to_path_buf()));
    }
    let mut archive = ZipArchive::new(File::open(path)?)?;

    let mut outlines = Vec::new();
    for slide_path in slide_order(&mut archive)? {
        let slide_xml = read_part(&mut archive, &slide_path)?;
        let mut outline = parse_slide(&slide_xml)?;

        let rels_path = rels_path_for(&slide_path);
        let slide_rels = read_part(&mut archive, &rels_path)?;
        if let Some(notes_target) = find_rel_target(&slide_rels, "/notesSlide")? {
            let notes_path = resolve_target(&slide_path, &notes_target);
            outline.notes = parse_notes(&read_part(&mut archive, &notes_path)?)?;
        }

        outlines.push(outline);
    }
    Ok(outlines)
}

/// Read a single part of the package as UTF-8 text
pub fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| DeckError::Pptx(format!("missing part {}: {}", name, e)))?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

// Slide part paths in the order of p:sldIdLst.
fn slide_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let rels = read_part(archive, "ppt/_rels/presentation.xml.rels")?;
    let presentation = read_part(archive, "ppt/presentation.xml")?;

    let targets = relationships(&rels)?;
    let mut order = Vec::new();
    let mut reader = Reader::from_str(&presentation);
    loop {
        match reader.read_event()? {
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"p:sldId" => {
                let rel_id = attribute(e, b"r:id")?
                    .ok_or_else(|| DeckError::Pptx("slide id without relationship".to_string()))?;
                let target = targets
                    .iter()
                    .find(|(id, _, _)| *id == rel_id)
                    .map(|(_, _, target)| target.clone())
                    .ok_or_else(|| {
                        DeckError::Pptx(format!("dangling slide relationship {}", rel_id))
                    })?;
                order.push(resolve_target("ppt/presentation.xml", &target));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(order)
}

// (Id, Type, Target) of every relationship in a .rels part.
fn relationships(xml: &str) -> Result<Vec<(String, String, String)>> {
    let mut reader = Reader::from_str(xml);
    let mut rels = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"Relationship" => {
                let id = attribute(e, b"Id")?.unwrap_or_default();
                let rel_type = attribute(e, b"Type")?.unwrap_or_default();
                let target = attribute(e, b"Target")?.unwrap_or_default();
                rels.push((id, rel_type, target));
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

fn find_rel_target(xml: &str, type_suffix: &str) -> Result<Option<String>> {
    Ok(relationships(xml)?
        .into_iter()
        .find(|(_, rel_type, _)| rel_type.ends_with(type_suffix))
        .map(|(_, _, target)| target))
}

fn attribute(element: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| DeckError::Xml(e.to_string()))?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

// Resolve a relationship target relative to the part that owns the relationship.
fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = source_part.split('/').collect();
    segments.pop();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    Title,
    Body,
    Other,
}

fn parse_slide(xml: &str) -> Result<SlideOutline> {
    let mut reader = Reader::from_str(xml);
    let mut outline = SlideOutline::default();

    let mut target = TextTarget::Other;
    let mut in_pic = false;
    let mut in_text = false;
    let mut paragraph: Option<String> = None;
    let mut frame = PictureFrame { x: 0, y: 0, cx: 0, cy: 0 };

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"p:sp" => target = TextTarget::Other,
                b"p:pic" => {
                    in_pic = true;
                    frame = PictureFrame { x: 0, y: 0, cx: 0, cy: 0 };
                }
                b"a:p" => paragraph = Some(String::new()),
                b"a:t" => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"p:ph" => {
                    target = match attribute(e, b"type")?.as_deref() {
                        Some("title") | Some("ctrTitle") => TextTarget::Title,
                        _ => TextTarget::Body,
                    };
                }
                b"a:off" if in_pic => {
                    frame.x = emu(e, b"x")?;
                    frame.y = emu(e, b"y")?;
                }
                b"a:ext" if in_pic => {
                    frame.cx = emu(e, b"cx")?;
                    frame.cy = emu(e, b"cy")?;
                }
                b"a:p" if target != TextTarget::Other => {
                    if target == TextTarget::Body {
                        outline.body.push(String::new());
                    }
                }
                _ => {}
            },
            Event::Text(ref t) if in_text => {
                if let Some(p) = paragraph.as_mut() {
                    p.push_str(&t.unescape()?);
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    let text = paragraph.take().unwrap_or_default();
                    match target {
                        TextTarget::Title if outline.title.is_empty() => outline.title = text,
                        TextTarget::Title => {
                            outline.title.push('\n');
                            outline.title.push_str(&text);
                        }
                        TextTarget::Body => outline.body.push(text),
                        TextTarget::Other => {}
                    }
                }
                b"p:sp" => target = TextTarget::Other,
                b"p:pic" => {
                    in_pic = false;
                    outline.pictures.push(frame);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(outline)
}

fn parse_notes(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut in_body = false;
    let mut in_text = false;
    let mut paragraphs: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"p:sp" => in_body = false,
                b"a:p" if in_body => paragraphs.push(String::new()),
                b"a:t" => in_text = true,
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"p:ph" => in_body = attribute(e, b"type")?.as_deref() == Some("body"),
                b"a:p" if in_body => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(ref t) if in_text && in_body => {
                if let Some(p) = paragraphs.last_mut() {
                    p.push_str(&t.unescape()?);
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"a:t" => in_text = false,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs.join("\n"))
}

fn emu(element: &BytesStart, key: &[u8]) -> Result<i64> {
    let value = attribute(element, key)?.unwrap_or_default();
    value
        .parse()
        .map_err(|_| DeckError::Xml(format!("invalid EMU value {:?}", value)))
}
