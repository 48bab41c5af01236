use crate::scroll::TriggerGeometry;

/// Where everything sits for a given viewport size.
///
/// Rows are document rows unless stated otherwise: row 0 is the top of the page, and a scroll
/// offset of `n` puts document row `n` at the top of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Layout {
    pub width: u16,
    pub height: u16,
    /// Viewport row of the greeting's first line. The greeting is fixed, it doesn't scroll.
    pub greeting_top: u16,
    pub greeting_left: u16,
    pub greeting_height: u16,
    /// Document row of the profile panel's first line.
    pub panel_top: u16,
    pub panel_left: u16,
    pub panel_width: u16,
    pub panel_height: u16,
    pub document_height: u16,
}

impl Layout {
    pub(crate) const PANEL_PADDING_LEFT: u16 = 6;
    const PANEL_PADDING_BOTTOM: u16 = 3;

    /// Lay out a page given the viewport size and the sizes of the greeting and panel content.
    pub(crate) fn new(viewport: (u16, u16), greeting: (u16, u16), panel: (u16, u16)) -> Self {
        let (width, height) = viewport;
        let (greeting_width, greeting_height) = greeting;
        let (panel_width, panel_height) = panel;

        let greeting_top = height.saturating_sub(greeting_height) / 2;
        let greeting_left = width.saturating_sub(greeting_width) / 2;

        // Two screens: the greeting one, then one with the panel sitting at its bottom.
        let document_height = height.saturating_mul(2);
        let panel_top = document_height
            .saturating_sub(Self::PANEL_PADDING_BOTTOM)
            .saturating_sub(panel_height)
            .max(height);

        Self {
            width,
            height,
            greeting_top,
            greeting_left,
            greeting_height,
            panel_top,
            panel_left: Self::PANEL_PADDING_LEFT,
            panel_width,
            panel_height,
            document_height,
        }
    }

    pub(crate) fn max_scroll(&self) -> f64 {
        f64::from(self.document_height.saturating_sub(self.height))
    }

    /// The greeting's geometry, as seen by a scroll trigger.
    ///
    /// The greeting is fixed, so its document position is the one it has at scroll offset 0.
    pub(crate) fn greeting_geometry(&self) -> TriggerGeometry {
        TriggerGeometry {
            element_top: f64::from(self.greeting_top),
            element_height: f64::from(self.greeting_height),
            viewport_height: f64::from(self.height),
            max_scroll: self.max_scroll(),
        }
    }

    /// The resting viewport cell of a block positioned as percentages of the viewport.
    pub(crate) fn block_origin(&self, top: f64, left: f64) -> (f64, f64) {
        (f64::from(self.width) * left / 100.0, f64::from(self.height) * top / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_centered() {
        let layout = Layout::new((80, 24), (40, 6), (30, 3));
        assert_eq!(layout.greeting_top, 9);
        assert_eq!(layout.greeting_left, 20);
    }

    #[test]
    fn panel_sits_at_bottom_of_second_screen() {
        let layout = Layout::new((80, 24), (40, 6), (30, 3));
        assert_eq!(layout.document_height, 48);
        assert_eq!(layout.panel_top, 42);
        assert_eq!(layout.max_scroll(), 24.0);
    }

    #[test]
    fn tall_panel_never_enters_first_screen() {
        let layout = Layout::new((80, 10), (20, 4), (30, 15));
        assert_eq!(layout.panel_top, 10);
    }
}
