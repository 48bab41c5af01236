use super::{ElementHandle, Style, Transform, ViewModel};

/// What an element on the page is.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ElementKind {
    Greeting,
    ProfilePanel,
    /// A decorative block, positioned as a percentage of the viewport.
    Block { top: f64, left: f64 },
    PointerMarker,
}

#[derive(Debug)]
struct Element {
    kind: ElementKind,
    style: Style,
    attached: bool,
}

/// The portfolio page: every visual element it will ever have.
///
/// Elements are created once, up front, and live as long as the page does.
#[derive(Debug)]
pub(crate) struct Page {
    elements: Vec<Element>,
    greeting: ElementHandle,
    profile_panel: ElementHandle,
    blocks: Vec<ElementHandle>,
    marker: Option<ElementHandle>,
}

impl Page {
    /// Highest block position, as a percentage of the viewport height.
    const MAX_BLOCK_TOP: f64 = 70.0;

    pub(crate) fn new(block_count: usize, with_marker: bool, rng: &mut fastrand::Rng) -> Self {
        let mut elements = Vec::new();
        let mut push = |kind| {
            elements.push(Element { kind, style: Style::default(), attached: true });
            ElementHandle(elements.len() - 1)
        };
        let greeting = push(ElementKind::Greeting);
        let profile_panel = push(ElementKind::ProfilePanel);
        let blocks = (0..block_count)
            .map(|_| {
                let top = rng.f64() * Self::MAX_BLOCK_TOP;
                let left = rng.f64() * 100.0;
                push(ElementKind::Block { top, left })
            })
            .collect();
        let marker = with_marker.then(|| push(ElementKind::PointerMarker));
        Self { elements, greeting, profile_panel, blocks, marker }
    }

    pub(crate) fn greeting(&self) -> ElementHandle {
        self.greeting
    }

    pub(crate) fn profile_panel(&self) -> ElementHandle {
        self.profile_panel
    }

    pub(crate) fn blocks(&self) -> &[ElementHandle] {
        &self.blocks
    }

    pub(crate) fn marker(&self) -> Option<ElementHandle> {
        self.marker
    }

    pub(crate) fn kind(&self, element: ElementHandle) -> Option<&ElementKind> {
        self.elements.get(element.0).map(|e| &e.kind)
    }

    /// Detach an element, so it's no longer driven or drawn.
    #[cfg(test)]
    pub(crate) fn detach(&mut self, element: ElementHandle) {
        if let Some(e) = self.elements.get_mut(element.0) {
            e.attached = false;
        }
    }

    fn attached_mut(&mut self, element: ElementHandle) -> Option<&mut Element> {
        self.elements.get_mut(element.0).filter(|e| e.attached)
    }
}

impl ViewModel for Page {
    fn is_attached(&self, element: ElementHandle) -> bool {
        self.elements.get(element.0).is_some_and(|e| e.attached)
    }

    fn style(&self, element: ElementHandle) -> Option<Style> {
        self.elements.get(element.0).filter(|e| e.attached).map(|e| e.style)
    }

    fn set_opacity(&mut self, element: ElementHandle, opacity: f64) {
        if let Some(e) = self.attached_mut(element) {
            e.style.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn set_transform(&mut self, element: ElementHandle, transform: Transform) {
        if let Some(e) = self.attached_mut(element) {
            e.style.transform = transform;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::blocks(7)]
    #[case::blobs(35)]
    fn block_count_matches(#[case] count: usize) {
        let page = Page::new(count, false, &mut fastrand::Rng::with_seed(1));
        assert_eq!(page.blocks().len(), count);
        assert!(page.marker().is_none());
    }

    #[test]
    fn block_positions_in_range() {
        let page = Page::new(50, true, &mut fastrand::Rng::with_seed(7));
        for block in page.blocks() {
            let Some(ElementKind::Block { top, left }) = page.kind(*block) else {
                panic!("not a block");
            };
            assert!((0.0..=70.0).contains(top));
            assert!((0.0..=100.0).contains(left));
        }
        assert_eq!(page.kind(page.marker().unwrap()), Some(&ElementKind::PointerMarker));
    }

    #[test]
    fn detached_elements_ignore_writes() {
        let mut page = Page::new(1, false, &mut fastrand::Rng::with_seed(1));
        let greeting = page.greeting();
        page.detach(greeting);
        page.set_opacity(greeting, 0.0);
        assert!(!page.is_attached(greeting));
        assert!(page.style(greeting).is_none());
    }
}
