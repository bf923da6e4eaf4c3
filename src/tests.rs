use super::*;
use crate::pptx::{PlaceholderKind, Shape};
use crate::resources::ImageSource;
use std::fs;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::ImageBuffer::from_fn(width, height, |x, _| {
        image::Rgb([(x % 255) as u8, 0u8, 128u8])
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .expect("Failed to encode PNG");
    bytes
}

fn temp_images_in(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("tmp_") && name.ends_with(".jpg"))
        .collect()
}

#[test]
fn test_builtin_deck_shape() {
    let deck = Deck::builtin().expect("Built-in deck should be valid");

    assert_eq!(deck.slides.len(), 12);
    assert_eq!(deck.images.len(), 3);
    assert!(deck.file_name.ends_with(".pptx"));

    let with_images: Vec<(usize, &str)> = deck
        .slides
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.image.as_deref().map(|name| (i, name)))
        .collect();
    assert_eq!(
        with_images,
        vec![(3, "pet_structure"), (5, "enzyme_schematic"), (6, "process_flow")]
    );
    assert_eq!(deck.slides[3].title, "技术原理：PET 与 PETase");
}

#[test]
fn test_deck_validation_rejects_bad_content() {
    let deck = Deck::builtin().unwrap();

    let mut short = deck.clone();
    short.slides.pop();
    assert!(matches!(short.validate(), Err(DeckError::Content(_))));

    let mut unknown = deck.clone();
    unknown.slides[4].image = Some("missing".to_string());
    let err = unknown.validate().unwrap_err();
    assert!(err.to_string().contains("missing"));

    let mut title_image = deck.clone();
    title_image.slides[0].image = Some("pet_structure".to_string());
    assert!(title_image.validate().is_err());

    let mut duplicate = deck.clone();
    duplicate.images.push(duplicate.images[0].clone());
    assert!(duplicate.validate().is_err());

    let mut nested = deck;
    nested.file_name = "out/deck.pptx".to_string();
    assert!(nested.validate().is_err());
}

#[test]
fn test_deck_validation_rejects_path_like_image_names() {
    for name in ["../escape", "nested/name", "back\\slash", ".."] {
        let mut deck = Deck::builtin().unwrap();
        deck.images[0].name = name.to_string();
        deck.slides[3].image = Some(name.to_string());

        let err = deck.validate().unwrap_err();
        assert!(err.to_string().contains("path components"), "{}: {}", name, err);
    }
}

#[test]
fn test_deck_json_round_trip_keeps_image_field_optional() {
    let deck = Deck::builtin().unwrap();
    let json = serde_json::to_string(&deck).unwrap();

    // Slides without an image do not serialize the field at all
    assert_eq!(json.matches("\"image\"").count(), 3);
    assert_eq!(Deck::from_json(&json).unwrap(), deck);
}

#[test]
fn test_image_source_classification() {
    assert!(ImageSource::new("https://example.com/a.png").is_remote());
    assert!(ImageSource::new("http://example.com/a.png").is_remote());
    assert!(!ImageSource::new("/tmp/a.png").is_remote());
    assert!(!ImageSource::new("C:\\images\\a.png").is_remote());
    assert!(!ImageSource::new("file:///tmp/a.png").is_remote());
}

#[test]
fn test_resolver_stages_jpegs_and_cleans_up() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let fetcher = |_: &str| -> Result<Vec<u8>> { Ok(png_bytes(40, 20)) };
    let resources = Deck::builtin().unwrap().images;

    let mut images = ImageResolver::new(&fetcher, dir.path(), 85).resolve(&resources);

    assert_eq!(images.resolved_count(), 3);
    assert!(images.failures().is_empty());
    let staged = images.path("pet_structure").expect("Image should be resolved").to_path_buf();
    assert!(staged.exists());
    assert_eq!(image::image_dimensions(&staged).unwrap(), (40, 20));
    assert_eq!(
        image::ImageFormat::from_path(&staged).unwrap(),
        image::ImageFormat::Jpeg
    );
    assert_eq!(temp_images_in(dir.path()).len(), 3);

    images.cleanup();
    assert!(temp_images_in(dir.path()).is_empty());
    // A second cleanup is a no-op
    images.cleanup();
}

#[test]
fn test_resolver_failures_leave_names_absent() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let fetcher = |url: &str| -> Result<Vec<u8>> {
        if url.contains("Protein_domain") {
            Ok(b"this is not an image".to_vec())
        } else if url.contains("Recycle") {
            Err(DeckError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
        } else {
            Ok(png_bytes(10, 10))
        }
    };
    let resources = Deck::builtin().unwrap().images;

    let images = ImageResolver::new(&fetcher, dir.path(), 85).resolve(&resources);

    assert!(images.path("pet_structure").is_some());
    assert!(images.path("enzyme_schematic").is_none());
    assert!(images.path("process_flow").is_none());
    assert!(images.contains("process_flow"));
    assert_eq!(images.failures().len(), 2);
    assert!(images.failures().iter().any(|(_, reason)| reason.contains("404")));
}

#[test]
fn test_resolver_repeated_name_keeps_one_temp_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let fetcher = |_: &str| -> Result<Vec<u8>> { Ok(png_bytes(6, 6)) };
    let resource = ImageResource {
        name: "twice".to_string(),
        source: "https://example.com/twice.png".to_string(),
    };

    let mut images =
        ImageResolver::new(&fetcher, dir.path(), 85).resolve(&[resource.clone(), resource]);

    assert_eq!(images.resolved_count(), 1);
    let staged = temp_images_in(dir.path());
    assert_eq!(staged.len(), 1);
    assert!(images.path("twice").unwrap().ends_with(&staged[0]));

    images.cleanup();
    assert!(temp_images_in(dir.path()).is_empty());
}

#[test]
fn test_resolved_images_removed_on_drop() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let fetcher = |_: &str| -> Result<Vec<u8>> { Ok(png_bytes(8, 8)) };
    let resources = Deck::builtin().unwrap().images;

    {
        let _images = ImageResolver::new(&fetcher, dir.path(), 85).resolve(&resources);
        assert_eq!(temp_images_in(dir.path()).len(), 3);
    }
    assert!(temp_images_in(dir.path()).is_empty());
}

#[test]
fn test_local_image_source() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let local = dir.path().join("local.png");
    fs::write(&local, png_bytes(12, 6)).unwrap();

    let fetcher = |_: &str| -> Result<Vec<u8>> { panic!("Local sources must not hit the network") };
    let resources = vec![
        ImageResource {
            name: "local".to_string(),
            source: local.to_string_lossy().to_string(),
        },
        ImageResource {
            name: "gone".to_string(),
            source: dir.path().join("gone.png").to_string_lossy().to_string(),
        },
    ];

    let images = ImageResolver::new(&fetcher, dir.path(), 85).resolve(&resources);
    assert!(images.path("local").is_some());
    assert!(images.path("gone").is_none());
}

#[test]
fn test_default_picture_placement() {
    let placement = PicturePlacement::default();
    assert_eq!(placement.left, 5_486_400);
    assert_eq!(placement.top, 1_097_280);
    assert_eq!(placement.height, 3_200_400);
    assert_eq!(Config::default().body_font_size(), 1800);
}

#[test]
fn test_assemble_places_picture_on_technical_principle_slide() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let fetcher = |_: &str| -> Result<Vec<u8>> { Ok(png_bytes(40, 20)) };
    let deck = Deck::builtin().unwrap();
    let config = Config::default();
    let images = ImageResolver::new(&fetcher, dir.path(), 85).resolve(&deck.images);

    let (presentation, warnings) = assemble(&deck, &images, &config);

    assert!(warnings.is_empty());
    assert_eq!(presentation.slide_count(), 12);
    assert_eq!(presentation.picture_count(), 3);

    let slide = &presentation.slides()[3];
    assert_eq!(slide.layout(), SlideLayout::TitleAndContent);
    assert_eq!(slide.title(), Some("技术原理：PET 与 PETase"));
    assert_eq!(slide.shapes().len(), 3);

    let pictures: Vec<_> = slide.pictures().collect();
    assert_eq!(pictures.len(), 1);
    assert_eq!(pictures[0].x, 5_486_400);
    assert_eq!(pictures[0].y, 1_097_280);
    assert_eq!(pictures[0].cy, 3_200_400);
    assert_eq!(pictures[0].cx, 6_400_800);

    match &slide.shapes()[1] {
        Shape::Placeholder {
            kind,
            paragraphs,
            font_size,
        } => {
            assert_eq!(*kind, PlaceholderKind::Body);
            assert_eq!(paragraphs, &deck.slides[3].bullets);
            assert_eq!(*font_size, Some(1800));
        }
        other => panic!("Expected body placeholder, got {:?}", other),
    }
}

#[test]
fn test_assemble_title_slide() {
    let deck = Deck::builtin().unwrap();
    let (presentation, _) = assemble(&deck, &ResolvedImages::default(), &Config::default());

    let title = &presentation.slides()[0];
    assert_eq!(title.layout(), SlideLayout::Title);
    assert_eq!(title.title(), Some(deck.slides[0].title.as_str()));
    assert_eq!(title.notes(), Some("开场：介绍主题、目的与总体结构。"));
    match &title.shapes()[1] {
        Shape::Placeholder {
            kind,
            paragraphs,
            font_size,
        } => {
            assert_eq!(*kind, PlaceholderKind::Subtitle);
            assert_eq!(paragraphs.len(), 2);
            assert_eq!(*font_size, None);
        }
        other => panic!("Expected subtitle placeholder, got {:?}", other),
    }
}

#[test]
fn test_assemble_without_images_is_not_an_error() {
    let deck = Deck::builtin().unwrap();
    let (presentation, warnings) = assemble(&deck, &ResolvedImages::default(), &Config::default());

    assert!(warnings.is_empty());
    assert_eq!(presentation.slide_count(), 12);
    assert_eq!(presentation.picture_count(), 0);
    for (slide, spec) in presentation.slides().iter().zip(&deck.slides) {
        assert_eq!(slide.title(), Some(spec.title.as_str()));
        assert_eq!(slide.notes(), Some(spec.notes.as_str()));
    }
}

#[test]
fn test_corrupt_staged_image_only_degrades_its_slide() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let fetcher = |_: &str| -> Result<Vec<u8>> { Ok(png_bytes(16, 16)) };
    let deck = Deck::builtin().unwrap();
    let images = ImageResolver::new(&fetcher, dir.path(), 85).resolve(&deck.images);

    fs::write(images.path("enzyme_schematic").unwrap(), b"corrupt").unwrap();

    let (presentation, warnings) = assemble(&deck, &images, &Config::default());

    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("enzyme_schematic"));
    assert_eq!(presentation.slide_count(), 12);
    assert_eq!(presentation.picture_count(), 2);

    let degraded = &presentation.slides()[5];
    assert_eq!(degraded.pictures().count(), 0);
    assert_eq!(degraded.shapes().len(), 2);
    assert_eq!(degraded.notes(), Some(deck.slides[5].notes.as_str()));
}

#[test]
fn test_load_picture_keeps_aspect_ratio() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("tall.png");
    fs::write(&path, png_bytes(30, 60)).unwrap();

    let placement = PicturePlacement::default();
    let picture = builder::load_picture(&path, "tall", placement).unwrap();

    assert_eq!(picture.cy, placement.height);
    assert_eq!(picture.cx, placement.height / 2);
    assert_eq!(picture.description, "tall");
}

#[test]
fn test_presentation_package_parts() {
    let mut presentation = Presentation::new("A & B", "en-US");
    let slide = presentation.add_slide(SlideLayout::Title);
    slide.set_title("Fish <&> Chips");
    slide.set_body(&["one", "two"], None);
    slide.set_notes("first\nsecond");
    let slide = presentation.add_slide(SlideLayout::TitleAndContent);
    slide.set_title("Second");
    slide.set_body(&["bullet"], Some(1800));

    let mut buffer = Cursor::new(Vec::new());
    presentation.write_to(&mut buffer).unwrap();

    let mut archive = zip::ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "ppt/presentation.xml",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout2.xml",
        "ppt/notesMasters/notesMaster1.xml",
        "ppt/theme/theme2.xml",
        "ppt/slides/slide2.xml",
        "ppt/notesSlides/notesSlide2.xml",
    ] {
        assert!(archive.by_name(part).is_ok(), "Missing part {}", part);
    }

    let mut slide_xml = String::new();
    archive
        .by_name("ppt/slides/slide1.xml")
        .unwrap()
        .read_to_string(&mut slide_xml)
        .unwrap();
    assert!(slide_xml.contains("Fish &lt;&amp;&gt; Chips"));
    assert!(slide_xml.contains(r#"<p:ph type="ctrTitle"/>"#));

    let mut rels = String::new();
    archive
        .by_name("ppt/slides/_rels/slide2.xml.rels")
        .unwrap()
        .read_to_string(&mut rels)
        .unwrap();
    assert!(rels.contains("../slideLayouts/slideLayout2.xml"));
    assert!(rels.contains("../notesSlides/notesSlide2.xml"));
    assert!(!rels.contains("/image\""));
}

#[test]
fn test_outline_reads_back_written_deck() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut presentation = Presentation::new("Outline", "en-US");
    let slide = presentation.add_slide(SlideLayout::Title);
    slide.set_title("Opening");
    slide.set_body(&["Speaker", "Date"], None);
    slide.set_notes("Say hello\nThen start");
    let slide = presentation.add_slide(SlideLayout::TitleAndContent);
    slide.set_title("Content");
    slide.set_body(&["a < b", "c"], Some(1800));
    slide.add_picture(crate::pptx::Picture {
        data: png_bytes(4, 4),
        description: "p".to_string(),
        x: 10,
        y: 20,
        cx: 30,
        cy: 40,
    });
    slide.set_notes("Notes");

    let path = presentation.save(&dir.path().join("outline.pptx")).unwrap();
    let outline = read_outline(&path).unwrap();

    assert_eq!(outline.len(), 2);
    assert_eq!(outline[0].title, "Opening");
    assert_eq!(outline[0].body, vec!["Speaker", "Date"]);
    assert_eq!(outline[0].notes, "Say hello\nThen start");
    assert!(outline[0].pictures.is_empty());
    assert_eq!(outline[1].body, vec!["a < b", "c"]);
    assert_eq!(outline[1].pictures.len(), 1);
    assert_eq!(outline[1].pictures[0].x, 10);
    assert_eq!(outline[1].pictures[0].cy, 40);
}

#[test]
fn test_save_failure_leaves_no_output() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let target = dir.path().join("deck.pptx");
    // A directory in the way makes the final rename fail
    fs::create_dir(&target).unwrap();

    let mut presentation = Presentation::new("T", "en-US");
    presentation.add_slide(SlideLayout::Title).set_title("T");

    let err = presentation.save(&target).unwrap_err();
    assert!(matches!(err, DeckError::Save { .. }));
    assert!(target.is_dir());

    // Only the blocking directory remains; the staging file is gone
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

// Rejects every write, as a full disk would.
struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FullDisk {
    fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
        Ok(0)
    }
}

#[test]
fn test_package_write_failure_is_a_save_error() {
    let mut presentation = Presentation::new("T", "en-US");
    presentation.add_slide(SlideLayout::Title).set_title("T");
    let target = std::path::Path::new("out/deck.pptx");

    let err = presentation.write_to(FullDisk).unwrap_err();
    match crate::pptx::save_failure(target, err) {
        DeckError::Save { path, source } => {
            assert_eq!(path, target);
            assert!(source.to_string().contains("no space left"));
        }
        other => panic!("Expected a save error, got {:?}", other),
    }

    let io_err = DeckError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
    match crate::pptx::save_failure(target, io_err) {
        DeckError::Save { source, .. } => {
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied)
        }
        other => panic!("Expected a save error, got {:?}", other),
    }
}

// Serves /image.png, stalls on /stall and answers 404 to everything else.
fn serve_images(png: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let address = listener.local_addr().expect("Failed to read server address");
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let png = png.clone();
            thread::spawn(move || answer_request(stream, &png));
        }
    });
    format!("http://{}", address)
}

fn answer_request(mut stream: TcpStream, png: &[u8]) {
    let Ok(clone) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(clone);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header == "\r\n" => break,
            Ok(_) => {}
        }
    }

    match request_line.split_whitespace().nth(1).unwrap_or("/") {
        "/image.png" => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                png.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(png);
        }
        "/stall" => thread::sleep(Duration::from_secs(5)),
        _ => {
            let _ = stream.write_all(
                b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
    }
}

#[test]
fn test_http_fetcher_status_timeout_and_success() {
    let base = serve_images(png_bytes(16, 8));
    let config = Config {
        image_timeout_ms: 300,
        ..Config::default()
    };
    let fetcher = HttpFetcher::new(&config).expect("Failed to build HTTP client");

    match fetcher.fetch(&format!("{}/missing.png", base)) {
        Err(DeckError::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("Expected HTTP 404, got {:?}", other),
    }

    let started = Instant::now();
    let err = fetcher.fetch(&format!("{}/stall", base)).unwrap_err();
    let waited = started.elapsed();
    assert!(matches!(err, DeckError::Fetch(_)), "unexpected error: {}", err);
    assert!(waited >= Duration::from_millis(200), "gave up after {:?}", waited);
    assert!(waited < Duration::from_secs(3), "waited {:?}", waited);

    let dir = TempDir::new().expect("Failed to create temp dir");
    let resources = vec![
        ImageResource {
            name: "ok".to_string(),
            source: format!("{}/image.png", base),
        },
        ImageResource {
            name: "gone".to_string(),
            source: format!("{}/gone.png", base),
        },
    ];
    let images = ImageResolver::new(&fetcher, dir.path(), 85).resolve(&resources);

    let staged = images.path("ok").expect("Served image should be staged");
    let file_name = staged.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("tmp_ok_") && file_name.ends_with(".jpg"));
    assert_eq!(image::image_dimensions(staged).unwrap(), (16, 8));
    assert!(images.path("gone").is_none());
    assert_eq!(images.failures().len(), 1);
    assert!(images.failures()[0].1.contains("404"));
}
