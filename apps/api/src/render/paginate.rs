//! Pagination of the main flow plus per-page decorations.
//!
//! The main column is laid out first into as many pages as it needs. Each
//! page is then emitted by running every registered `PageDecoration` on a
//! fresh canvas before the page's own content is drawn on top, so decorations
//! sit underneath and are identical on every page.

use crate::layout::{get_metrics, wrap_text, PageGeometry};
use crate::render::blocks::{
    Block, TextBlock, TextStyle, ACCENT, SIDEBAR_BACKGROUND, SIDEBAR_BORDER,
};
use crate::render::pdf::PdfCanvas;

const IMAGE_GAP: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based.
    pub number: usize,
}

/// Hook run once for every emitted page.
pub trait PageDecoration {
    fn decorate(&self, canvas: &mut PdfCanvas, page: PageInfo);
}

/// An element with its final position on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Placed {
    Line {
        x: f32,
        baseline: f32,
        text: String,
        style: TextStyle,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl Placed {
    fn draw(&self, canvas: &mut PdfCanvas) {
        match self {
            Placed::Line {
                x,
                baseline,
                text,
                style,
            } => canvas.text(*x, *baseline, text, style),
            Placed::Image {
                x,
                y,
                width,
                height,
            } => canvas.image(*x, *y, *width, *height),
        }
    }
}

/// Stacks wrapped text lines downward from `top`, stopping at `bottom`.
struct Column {
    x: f32,
    width: f32,
    top: f32,
    bottom: f32,
    cursor: f32,
}

impl Column {
    fn new(x: f32, width: f32, top: f32, bottom: f32) -> Self {
        Self {
            x,
            width,
            top,
            bottom,
            cursor: top,
        }
    }

    fn at_top(&self) -> bool {
        self.cursor >= self.top
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor - height >= self.bottom
    }

    fn reset(&mut self) {
        self.cursor = self.top;
    }

    fn wrap(&self, block: &TextBlock) -> Vec<String> {
        wrap_text(
            &block.text,
            get_metrics(block.style.face),
            block.style.size,
            self.width,
        )
    }

    /// Places one line and advances the cursor.
    fn place_line(&mut self, text: String, style: TextStyle) -> Placed {
        let baseline = self.cursor - style.size;
        self.cursor -= style.line_height();
        Placed::Line {
            x: self.x,
            baseline,
            text,
            style,
        }
    }
}

/// Lays the main flow out into pages. Always returns at least one page.
pub fn flow_main(blocks: &[Block], geometry: &PageGeometry) -> Vec<Vec<Placed>> {
    let padding = geometry.main_padding;
    let mut column = Column::new(
        geometry.main_left() + padding,
        geometry.main_text_width(),
        geometry.main_top() - padding,
        geometry.main_bottom() + padding,
    );
    let mut pages: Vec<Vec<Placed>> = vec![Vec::new()];

    for block in blocks {
        match block {
            Block::Text(text) => {
                let lines = column.wrap(text);
                if lines.is_empty() {
                    continue;
                }
                if !column.at_top() {
                    column.cursor -= text.space_before;
                }
                for line in lines {
                    if !column.fits(text.style.line_height()) && !column.at_top() {
                        pages.push(Vec::new());
                        column.reset();
                    }
                    let placed = column.place_line(line, text.style);
                    if let Some(page) = pages.last_mut() {
                        page.push(placed);
                    }
                }
            }
            Block::Image(image) => {
                if !column.fits(image.height) && !column.at_top() {
                    pages.push(Vec::new());
                    column.reset();
                }
                let placed = Placed::Image {
                    x: column.x + column.width - image.width,
                    y: column.cursor - image.height,
                    width: image.width,
                    height: image.height,
                };
                column.cursor -= image.height + IMAGE_GAP;
                if let Some(page) = pages.last_mut() {
                    page.push(placed);
                }
            }
        }
    }

    pages
}

/// Lays out the main flow and emits one canvas per page, running every
/// decoration on each page before its content.
pub fn paginate(
    blocks: &[Block],
    geometry: &PageGeometry,
    decorations: &[&dyn PageDecoration],
) -> Vec<PdfCanvas> {
    flow_main(blocks, geometry)
        .into_iter()
        .enumerate()
        .map(|(i, items)| {
            let info = PageInfo { number: i + 1 };
            let mut canvas = PdfCanvas::new();
            for decoration in decorations {
                decoration.decorate(&mut canvas, info);
            }
            for item in &items {
                item.draw(&mut canvas);
            }
            canvas
        })
        .collect()
}

/// The coloured sidebar. Its content is laid out once at construction and
/// replayed at the same coordinates on every page. Lines that do not fit
/// above the sidebar's bottom edge are clipped.
pub struct SidebarDecoration {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    lines: Vec<Placed>,
}

impl SidebarDecoration {
    pub fn new(blocks: Vec<TextBlock>, geometry: &PageGeometry) -> Self {
        let padding = geometry.sidebar_padding;
        let mut column = Column::new(
            geometry.sidebar_x + padding,
            geometry.sidebar_text_width(),
            geometry.sidebar_top() - padding,
            geometry.sidebar_y + padding,
        );

        let mut lines = Vec::new();
        'blocks: for block in &blocks {
            let wrapped = column.wrap(block);
            if wrapped.is_empty() {
                continue;
            }
            if !column.at_top() {
                column.cursor -= block.space_before;
            }
            for line in wrapped {
                if !column.fits(block.style.line_height()) {
                    tracing::debug!("Sidebar content clipped at '{line}'");
                    break 'blocks;
                }
                lines.push(column.place_line(line, block.style));
            }
        }

        Self {
            x: geometry.sidebar_x,
            y: geometry.sidebar_y,
            width: geometry.sidebar_width,
            height: geometry.height - geometry.sidebar_y,
            lines,
        }
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[Placed] {
        &self.lines
    }
}

impl PageDecoration for SidebarDecoration {
    fn decorate(&self, canvas: &mut PdfCanvas, _page: PageInfo) {
        canvas.fill_rect(self.x, self.y, self.width, self.height, SIDEBAR_BACKGROUND);
        canvas.stroke_rect(self.x, self.y, self.width, self.height, 1.0, SIDEBAR_BORDER);
        for line in &self.lines {
            line.draw(canvas);
        }
    }
}

/// Accent borders along the top and right edges of the main column.
pub struct MainColumnFrame {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl MainColumnFrame {
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            left: geometry.main_left(),
            right: geometry.main_right(),
            top: geometry.main_top(),
            bottom: geometry.main_bottom(),
        }
    }
}

impl PageDecoration for MainColumnFrame {
    fn decorate(&self, canvas: &mut PdfCanvas, _page: PageInfo) {
        canvas.line((self.left, self.top), (self.right, self.top), 2.0, ACCENT);
        canvas.line((self.right, self.top), (self.right, self.bottom), 2.0, ACCENT);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::layout::a4_two_column;
    use crate::render::blocks::{ImageBlock, BODY_TEXT, SIDEBAR_TEXT};

    fn body_blocks(count: usize) -> Vec<Block> {
        (0..count)
            .map(|i| Block::Text(TextBlock::new(format!("• Line {i}"), TextStyle::body(BODY_TEXT))))
            .collect()
    }

    struct CountingDecoration {
        seen: RefCell<Vec<usize>>,
    }

    impl PageDecoration for CountingDecoration {
        fn decorate(&self, _canvas: &mut PdfCanvas, page: PageInfo) {
            self.seen.borrow_mut().push(page.number);
        }
    }

    #[test]
    fn test_empty_flow_still_has_one_page() {
        let pages = flow_main(&[], &a4_two_column());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_short_flow_fits_one_page() {
        let pages = flow_main(&body_blocks(10), &a4_two_column());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].len(), 10);
    }

    #[test]
    fn test_long_flow_spans_pages_without_losing_lines() {
        let geometry = a4_two_column();
        let pages = flow_main(&body_blocks(120), &geometry);
        assert!(pages.len() >= 2);
        assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), 120);

        for page in &pages {
            for item in page {
                if let Placed::Line { baseline, .. } = item {
                    assert!(*baseline >= geometry.main_bottom());
                    assert!(*baseline <= geometry.main_top());
                }
            }
        }
    }

    #[test]
    fn test_lines_keep_order_across_pages() {
        let pages = flow_main(&body_blocks(120), &a4_two_column());
        let texts: Vec<String> = pages
            .into_iter()
            .flatten()
            .filter_map(|p| match p {
                Placed::Line { text, .. } => Some(text),
                Placed::Image { .. } => None,
            })
            .collect();
        let expected: Vec<String> = (0..120).map(|i| format!("• Line {i}")).collect();
        assert_eq!(texts, expected);
    }

    #[test]
    fn test_decoration_runs_once_per_page() {
        let counter = CountingDecoration {
            seen: RefCell::new(Vec::new()),
        };
        let canvases = paginate(&body_blocks(120), &a4_two_column(), &[&counter]);
        let seen = counter.seen.borrow();
        assert_eq!(seen.len(), canvases.len());
        assert_eq!(*seen, (1..=canvases.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_image_is_right_aligned() {
        let geometry = a4_two_column();
        let blocks = vec![Block::Image(ImageBlock {
            width: 120.0,
            height: 40.0,
        })];
        let pages = flow_main(&blocks, &geometry);
        match &pages[0][0] {
            Placed::Image { x, width, .. } => {
                let right = geometry.main_right() - geometry.main_padding;
                assert!((x + width - right).abs() < 1e-3);
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_sidebar_is_laid_out_once_and_clipped() {
        let geometry = a4_two_column();
        let style = TextStyle::body(SIDEBAR_TEXT);
        let blocks: Vec<TextBlock> = (0..200)
            .map(|i| TextBlock::new(format!("• Skill {i}"), style))
            .collect();
        let sidebar = SidebarDecoration::new(blocks, &geometry);
        assert!(!sidebar.lines().is_empty());
        assert!(sidebar.lines().len() < 200);
        for line in sidebar.lines() {
            if let Placed::Line { baseline, .. } = line {
                assert!(*baseline >= geometry.sidebar_y);
            }
        }
    }
}
