use super::banner::{Banner, BannerError, BannerGenerator};
use super::canvas::Canvas;
use super::color::{Color, Palette};
use crate::config::{Config, Variant};
use crate::scroll::Markers;
use crate::view::{ElementHandle, ElementKind, Layout, Page, Style, ViewModel};
use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

const BLOCK_WIDTH: f64 = 5.0;
const MARKER: char = '●';
const BLOB_SHADES: [char; 3] = ['░', '▒', '▓'];

/// Draws a page onto a canvas.
pub(crate) struct Painter {
    generator: BannerGenerator,
    greeting_text: String,
    name_text: String,
    roles: String,
    greeting: Banner,
    name: Banner,
    variant: Variant,
    palette: Palette,
}

impl Painter {
    pub(crate) fn new(config: &Config, width: u16) -> Result<Self, BannerError> {
        let generator = BannerGenerator::new(&config.font)?;
        let mut painter = Self {
            generator,
            greeting_text: config.greeting.clone(),
            name_text: config.name.clone(),
            roles: config.roles.iter().join(" · "),
            greeting: Banner::plain(&config.greeting),
            name: Banner::plain(&config.name),
            variant: config.variant,
            palette: Palette::default(),
        };
        painter.fit(width);
        Ok(painter)
    }

    /// Regenerate the banners so they fit a viewport this wide.
    pub(crate) fn fit(&mut self, width: u16) {
        self.greeting = self.generator.generate_fitting(&self.greeting_text, width);
        let panel_width = width.saturating_sub(Layout::PANEL_PADDING_LEFT);
        self.name = self.generator.generate_fitting(&self.name_text, panel_width);
    }

    /// Size of the greeting, in cells.
    pub(crate) fn greeting_size(&self) -> (u16, u16) {
        (self.greeting.width(), self.greeting.height())
    }

    /// Size of the profile panel: the name, a blank row and the roles.
    pub(crate) fn panel_size(&self) -> (u16, u16) {
        let roles_width = self.roles.width().try_into().unwrap_or(u16::MAX);
        (self.name.width().max(roles_width), self.name.height().saturating_add(2))
    }

    pub(crate) fn paint(&self, page: &Page, layout: &Layout, scroll: f64, markers: Option<&Markers>) -> Canvas {
        let mut canvas = Canvas::new(layout.width, layout.height, self.palette.background);
        for block in page.blocks() {
            self.paint_block(&mut canvas, page, layout, *block);
        }
        if let Some(style) = page.style(page.greeting()) {
            self.paint_greeting(&mut canvas, layout, &style);
        }
        if let Some(style) = page.style(page.profile_panel()) {
            self.paint_panel(&mut canvas, layout, scroll, &style);
        }
        if let Some(style) = page.marker().and_then(|marker| page.style(marker)) {
            let color = self.fade(self.palette.marker, style.opacity);
            if let Some(color) = color {
                canvas.put(cell(style.transform.x), cell(style.transform.y), MARKER, color);
            }
        }
        if let Some(markers) = markers {
            self.paint_markers(&mut canvas, markers);
        }
        canvas
    }

    fn fade(&self, color: Color, opacity: f64) -> Option<Color> {
        (opacity > 0.0).then(|| color.over(self.palette.background, opacity))
    }

    fn paint_block(&self, canvas: &mut Canvas, page: &Page, layout: &Layout, block: ElementHandle) {
        let (Some(ElementKind::Block { top, left }), Some(style)) = (page.kind(block), page.style(block)) else {
            return;
        };
        let Some(color) = self.fade(self.palette.block, style.opacity) else {
            return;
        };
        let (column, row) = layout.block_origin(*top, *left);
        let column = cell(column + style.transform.x);
        let row = cell(row + style.transform.y);
        let scale = style.transform.scale.max(0.0);
        match self.variant {
            Variant::Blocks => {
                let (top, bottom) = block_outline(style.transform.rotation, scale);
                canvas.put_str(column, row, &top, color, false);
                canvas.put_str(column, row + 1, &bottom, color, false);
            }
            Variant::Blobs => canvas.put_str(column, row, &blob(scale), color, false),
        }
    }

    fn paint_greeting(&self, canvas: &mut Canvas, layout: &Layout, style: &Style) {
        let Some(color) = self.fade(self.palette.text, style.opacity) else {
            return;
        };
        let left = i32::from(layout.greeting_left);
        for (row, line) in (i32::from(layout.greeting_top)..).zip(&self.greeting.lines) {
            canvas.put_str(left, row, line, color, true);
        }
    }

    fn paint_panel(&self, canvas: &mut Canvas, layout: &Layout, scroll: f64, style: &Style) {
        let (Some(text), Some(muted)) =
            (self.fade(self.palette.text, style.opacity), self.fade(self.palette.muted, style.opacity))
        else {
            return;
        };
        let shift = style.transform.x_percent * f64::from(layout.panel_width) / 100.0 + style.transform.x;
        let left = i32::from(layout.panel_left) + cell(shift);
        let top = cell(f64::from(layout.panel_top) - scroll + style.transform.y);
        for (row, line) in (top..).zip(&self.name.lines) {
            canvas.put_str(left, row, line, text, true);
        }
        canvas.put_str(left, top + i32::from(self.name.height()) + 1, &self.roles, muted, false);
    }

    fn paint_markers(&self, canvas: &mut Canvas, markers: &Markers) {
        let last_row = f64::from(canvas.height().saturating_sub(1));
        let width = i32::from(canvas.width());
        let color = self.palette.debug;
        let labels = [
            (markers.start, "start", width - 30),
            (markers.end, "end", width - 30),
            (markers.scroller_start.min(last_row), "scroller-start", width - 16),
            (markers.scroller_end.min(last_row), "scroller-end", width - 16),
        ];
        for (row, label, column) in labels {
            canvas.put_str(column, cell(row), &format!("─ {label}"), color, false);
        }
    }
}

fn cell(value: f64) -> i32 {
    value.round() as i32
}

/// The two rows of a block: a rounded box, or a tilted one while it's turned about halfway to
/// its next side.
fn block_outline(rotation: f64, scale: f64) -> (String, String) {
    let width = (BLOCK_WIDTH * scale).round().max(2.0) as usize;
    let edge = "─".repeat(width - 2);
    let turn = rotation.rem_euclid(90.0);
    if (22.5..67.5).contains(&turn) {
        (format!("╱{edge}╲"), format!("╲{edge}╱"))
    } else {
        (format!("╭{edge}╮"), format!("╰{edge}╯"))
    }
}

/// A single row blob, denser in the middle and wider the bigger it is.
fn blob(scale: f64) -> String {
    let radius = scale.round().max(0.0) as usize;
    let shade = |distance: usize| BLOB_SHADES[BLOB_SHADES.len() - 1 - distance.min(BLOB_SHADES.len() - 1)];
    (0..=radius * 2).map(|i| shade(i.abs_diff(radius))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animator;
    use crate::view::Properties;
    use rstest::rstest;

    const WIDTH: u16 = 30;
    const HEIGHT: u16 = 10;

    fn setup(variant: Variant, blocks: usize) -> (Painter, Page, Layout) {
        let config = Config { variant, ..Default::default() };
        let painter = Painter::new(&config, WIDTH).expect("failed to create painter");
        let page = Page::new(blocks, false, &mut fastrand::Rng::with_seed(3));
        let layout = Layout::new((WIDTH, HEIGHT), painter.greeting_size(), painter.panel_size());
        (painter, page, layout)
    }

    #[test]
    fn narrow_viewport_uses_plain_text() {
        let (painter, ..) = setup(Variant::Blocks, 0);
        assert_eq!(painter.greeting_size(), (11, 1));
        assert_eq!(painter.panel_size(), (40, 3));
    }

    #[test]
    fn greeting_is_drawn_at_center() {
        let (painter, page, layout) = setup(Variant::Blocks, 0);
        let canvas = painter.paint(&page, &layout, 0.0, None);
        assert!(canvas.row_text(layout.greeting_top).contains("Hello There"));
    }

    #[test]
    fn panel_scrolls_with_page() {
        let (painter, mut page, layout) = setup(Variant::Blocks, 0);
        let greeting = page.greeting();
        Animator::new().set(&mut page, greeting, Properties::new().opacity(0.0));

        let scroll = layout.max_scroll();
        let canvas = painter.paint(&page, &layout, scroll, None);
        let row = layout.panel_top - HEIGHT;
        assert!(canvas.row_text(row).starts_with("      I'm Fulton Browne"));
        assert!(canvas.row_text(row + 2).contains("software"));

        let canvas = painter.paint(&page, &layout, 0.0, None);
        assert!((0..HEIGHT).all(|row| canvas.row_text(row).trim().is_empty()));
    }

    #[test]
    fn transparent_elements_are_skipped() {
        let (painter, mut page, layout) = setup(Variant::Blobs, 5);
        let mut animator = Animator::new();
        let elements: Vec<_> = page.blocks().iter().copied().chain([page.greeting(), page.profile_panel()]).collect();
        for element in elements {
            animator.set(&mut page, element, Properties::new().opacity(0.0));
        }
        let canvas = painter.paint(&page, &layout, 5.0, None);
        assert!((0..HEIGHT).all(|row| canvas.row_text(row).trim().is_empty()));
    }

    #[test]
    fn opacity_dims_text() {
        let (painter, mut page, layout) = setup(Variant::Blocks, 0);
        let greeting = page.greeting();
        Animator::new().set(&mut page, greeting, Properties::new().opacity(0.5));
        let canvas = painter.paint(&page, &layout, 0.0, None);
        let column = layout.greeting_left;
        let color = canvas.color_at(column, layout.greeting_top).expect("nothing drawn");
        assert_eq!(color, painter.palette.text.over(painter.palette.background, 0.5));
    }

    #[test]
    fn markers_are_drawn() {
        let (painter, page, layout) = setup(Variant::Blocks, 0);
        let markers = Markers { start: 2.0, end: 4.0, scroller_start: 5.0, scroller_end: 10.0 };
        let canvas = painter.paint(&page, &layout, 0.0, Some(&markers));
        assert!(canvas.row_text(2).contains("start"));
        assert!(canvas.row_text(HEIGHT - 1).contains("scroller-e"));
    }

    #[rstest]
    #[case::square(0.0, 1.0, "╭───╮", "╰───╯")]
    #[case::turned(45.0, 1.0, "╱───╲", "╲───╱")]
    #[case::full_turn(720.0, 1.0, "╭───╮", "╰───╯")]
    #[case::grown(0.0, 1.4, "╭─────╮", "╰─────╯")]
    #[case::tiny(0.0, 0.1, "╭╮", "╰╯")]
    fn block_shapes(#[case] rotation: f64, #[case] scale: f64, #[case] top: &str, #[case] bottom: &str) {
        assert_eq!(block_outline(rotation, scale), (top.to_string(), bottom.to_string()));
    }

    #[rstest]
    #[case::small(0.4, "▓")]
    #[case::normal(1.0, "▒▓▒")]
    #[case::swollen(1.5, "░▒▓▒░")]
    fn blob_shapes(#[case] scale: f64, #[case] expected: &str) {
        assert_eq!(blob(scale), expected);
    }
}
