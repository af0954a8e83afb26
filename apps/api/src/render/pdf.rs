//! PDF emission on top of lopdf: a per-page drawing canvas and the document
//! writer that assembles pages, fonts and the header image XObject.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::assets::HeaderImage;
use crate::layout::{get_metrics, FontFace, PageGeometry};
use crate::render::blocks::{Rgb, TextStyle};
use crate::render::RenderError;

const IMAGE_RESOURCE: &str = "Im1";

/// Drawing operations for one page, in paint order.
#[derive(Debug, Default)]
pub struct PdfCanvas {
    operations: Vec<Operation>,
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let [r, g, b] = color.components();
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line: f32, color: Rgb) {
        let [r, g, b] = color.components();
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![line.into()]),
            Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), line: f32, color: Rgb) {
        let [r, g, b] = color.components();
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![line.into()]),
            Operation::new("m", vec![from.0.into(), from.1.into()]),
            Operation::new("l", vec![to.0.into(), to.1.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    /// One line of text with its baseline at `(x, y)`.
    pub fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle) {
        let [r, g, b] = style.color.components();
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(style.face.resource_name().as_bytes().to_vec()),
                    style.size.into(),
                ],
            ),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ]);

        if style.underline {
            let width = get_metrics(style.face).width_pt(text, style.size);
            let offset = style.size * 0.12;
            self.line(
                (x, y - offset),
                (x + width, y - offset),
                (style.size / 20.0).max(0.5),
                style.color,
            );
        }
    }

    /// Paints the shared header image into the given box.
    pub fn image(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn encode(self) -> Result<Vec<u8>, RenderError> {
        Ok(Content {
            operations: self.operations,
        }
        .encode()?)
    }
}

/// Assembles pages into a complete PDF file.
pub fn write_document(
    pages: Vec<PdfCanvas>,
    geometry: &PageGeometry,
    image: Option<&HeaderImage>,
    title: Option<&str>,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in [FontFace::Regular, FontFace::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }

    let mut resources = dictionary! { "Font" => fonts };
    if let Some(image) = image {
        let image_id = doc.add_object(image.to_xobject());
        resources.set("XObject", dictionary! { IMAGE_RESOURCE => image_id });
    }
    let resources_id = doc.add_object(resources);

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for canvas in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, canvas.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), geometry.width.into(), geometry.height.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut info = dictionary! {
        "Producer" => Object::String(b"cv_api".to_vec(), StringFormat::Literal),
    };
    if let Some(title) = title {
        info.set(
            "Title",
            Object::String(encode_win_ansi(title), StringFormat::Literal),
        );
    }
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Encodes text for the WinAnsiEncoding base fonts. Characters outside the
/// encoding become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}
