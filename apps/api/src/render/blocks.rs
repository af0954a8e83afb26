//! Styled content blocks produced by composition and consumed by pagination.

use crate::assets::HeaderImage;
use crate::layout::FontFace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to the 0.0–1.0 range PDF colour operators expect.
    pub fn components(self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }
}

pub const SIDEBAR_BACKGROUND: Rgb = Rgb(8, 0, 66);
pub const SIDEBAR_BORDER: Rgb = Rgb(255, 255, 255);
pub const SIDEBAR_TEXT: Rgb = Rgb(255, 244, 254);
pub const ACCENT: Rgb = Rgb(255, 1, 28);
pub const BODY_TEXT: Rgb = Rgb(0, 0, 0);
pub const MUTED_TEXT: Rgb = Rgb(128, 128, 128);
pub const LINK_TEXT: Rgb = Rgb(0, 0, 255);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Rgb,
    pub underline: bool,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f32, color: Rgb) -> Self {
        Self {
            face,
            size,
            color,
            underline: false,
        }
    }

    /// 30pt bold, used for the candidate name.
    pub const fn title(color: Rgb) -> Self {
        Self::new(FontFace::Bold, 30.0, color)
    }

    /// 16pt bold section heading.
    pub const fn heading(color: Rgb) -> Self {
        Self::new(FontFace::Bold, 16.0, color)
    }

    /// 12pt bold, used for numbered entries.
    pub const fn entry(color: Rgb) -> Self {
        Self::new(FontFace::Bold, 12.0, color)
    }

    pub const fn body(color: Rgb) -> Self {
        Self::new(FontFace::Regular, 12.0, color)
    }

    pub fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn line_height(&self) -> f32 {
        self.size * 1.2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub style: TextStyle,
    /// Vertical gap above the block, in points.
    pub space_before: f32,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        let space_before = if style.size > 12.0 { 8.0 } else { 2.0 };
        Self {
            text: text.into(),
            style,
            space_before,
        }
    }

    pub fn with_space_before(mut self, points: f32) -> Self {
        self.space_before = points;
        self
    }
}

/// The header image, scaled to a fixed width and right-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBlock {
    pub width: f32,
    pub height: f32,
}

impl ImageBlock {
    pub fn scaled(image: &HeaderImage, width: f32) -> Self {
        Self {
            width,
            height: width * image.aspect_ratio(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
}

#[cfg(test)]
impl Block {
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Text(t) => Some(&t.text),
            Block::Image(_) => None,
        }
    }
}
