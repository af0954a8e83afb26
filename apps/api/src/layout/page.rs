/// Page geometry for the two-column CV template, in PDF points
/// (origin bottom-left).
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// Sidebar box: fixed position, redrawn on every page.
    pub sidebar_x: f32,
    pub sidebar_y: f32,
    pub sidebar_width: f32,
    pub sidebar_padding: f32,
    /// Inner padding of the main column.
    pub main_padding: f32,
}

impl PageGeometry {
    /// Left edge of the main column box.
    pub fn main_left(&self) -> f32 {
        self.margin + self.sidebar_width
    }

    pub fn main_right(&self) -> f32 {
        self.width - self.margin
    }

    pub fn main_top(&self) -> f32 {
        self.height - self.margin
    }

    pub fn main_bottom(&self) -> f32 {
        self.margin
    }

    /// Usable text width inside the main column.
    pub fn main_text_width(&self) -> f32 {
        self.main_right() - self.main_left() - 2.0 * self.main_padding
    }

    pub fn sidebar_text_width(&self) -> f32 {
        self.sidebar_width - 2.0 * self.sidebar_padding
    }

    pub fn sidebar_top(&self) -> f32 {
        self.height - self.margin
    }
}

/// A4 portrait, 0.5" margins, 200pt sidebar anchored at (20, 20).
pub fn a4_two_column() -> PageGeometry {
    PageGeometry {
        width: 595.28,
        height: 841.89,
        margin: 36.0,
        sidebar_x: 20.0,
        sidebar_y: 20.0,
        sidebar_width: 200.0,
        sidebar_padding: 10.0,
        main_padding: 10.0,
    }
}
