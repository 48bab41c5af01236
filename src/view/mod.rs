mod layout;
mod page;

pub(crate) use layout::Layout;
pub(crate) use page::{ElementKind, Page};

/// A handle to a visual element owned by a [ViewModel].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ElementHandle(pub(crate) usize);

/// A numeric visual property that can be set or animated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum Property {
    Opacity,
    XPercent,
    X,
    Y,
    Rotation,
    Scale,
}

/// The transform part of an element's style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Transform {
    /// Horizontal offset as a percentage of the element's own width.
    pub x_percent: f64,
    /// Horizontal offset in cells.
    pub x: f64,
    /// Vertical offset in cells.
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x_percent: 0.0, x: 0.0, y: 0.0, rotation: 0.0, scale: 1.0 }
    }
}

/// The current visual state of an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Style {
    pub opacity: f64,
    pub transform: Transform,
}

impl Default for Style {
    fn default() -> Self {
        Self { opacity: 1.0, transform: Transform::default() }
    }
}

impl Style {
    pub(crate) fn get(&self, property: Property) -> f64 {
        match property {
            Property::Opacity => self.opacity,
            Property::XPercent => self.transform.x_percent,
            Property::X => self.transform.x,
            Property::Y => self.transform.y,
            Property::Rotation => self.transform.rotation,
            Property::Scale => self.transform.scale,
        }
    }

    pub(crate) fn set(&mut self, property: Property, value: f64) {
        match property {
            Property::Opacity => self.opacity = value.clamp(0.0, 1.0),
            Property::XPercent => self.transform.x_percent = value,
            Property::X => self.transform.x = value,
            Property::Y => self.transform.y = value,
            Property::Rotation => self.transform.rotation = value,
            Property::Scale => self.transform.scale = value,
        }
    }
}

/// A set of property values, applied in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Properties(Vec<(Property, f64)>);

impl Properties {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, property: Property, value: f64) -> Self {
        self.insert(property, value);
        self
    }

    pub(crate) fn opacity(self, value: f64) -> Self {
        self.with(Property::Opacity, value)
    }

    pub(crate) fn x_percent(self, value: f64) -> Self {
        self.with(Property::XPercent, value)
    }

    pub(crate) fn x(self, value: f64) -> Self {
        self.with(Property::X, value)
    }

    pub(crate) fn y(self, value: f64) -> Self {
        self.with(Property::Y, value)
    }

    pub(crate) fn rotation(self, value: f64) -> Self {
        self.with(Property::Rotation, value)
    }

    pub(crate) fn scale(self, value: f64) -> Self {
        self.with(Property::Scale, value)
    }

    pub(crate) fn insert(&mut self, property: Property, value: f64) {
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.0.push((property, value)),
        }
    }

    pub(crate) fn get(&self, property: Property) -> Option<f64> {
        self.0.iter().find(|(p, _)| *p == property).map(|(_, v)| *v)
    }

    pub(crate) fn contains(&self, property: Property) -> bool {
        self.get(property).is_some()
    }

    pub(crate) fn remove(&mut self, property: Property) {
        self.0.retain(|(p, _)| *p != property);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (Property, f64)> + '_ {
        self.0.iter().copied()
    }
}

/// Named visual elements the animation code drives.
///
/// This is the only surface the sequencer and animator touch, so they stay independent of
/// how (or whether) the elements are actually drawn.
pub(crate) trait ViewModel {
    /// Whether the element exists and can be driven.
    fn is_attached(&self, element: ElementHandle) -> bool;

    /// The element's current style, if it's attached.
    fn style(&self, element: ElementHandle) -> Option<Style>;

    fn set_opacity(&mut self, element: ElementHandle, opacity: f64);

    fn set_transform(&mut self, element: ElementHandle, transform: Transform);

    /// Apply a set of property values at once.
    fn apply(&mut self, element: ElementHandle, properties: &Properties) {
        let Some(mut style) = self.style(element) else {
            return;
        };
        for (property, value) in properties.iter() {
            style.set(property, value);
        }
        if properties.contains(Property::Opacity) {
            self.set_opacity(element, style.opacity);
        }
        if properties.iter().any(|(p, _)| p != Property::Opacity) {
            self.set_transform(element, style.transform);
        }
    }
}
