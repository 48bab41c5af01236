//! Scroll triggers: turning scroll offsets into enter/leave crossings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A position along an element or the viewport, measured from its top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Edge {
    Top,
    Center,
    Bottom,
    /// Percentage of the height.
    Percent(f64),
}

impl Edge {
    fn offset(self, height: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => height / 2.0,
            Self::Bottom => height,
            Self::Percent(percent) => height * percent / 100.0,
        }
    }
}

impl FromStr for Edge {
    type Err = TriggerPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            other => other
                .strip_suffix('%')
                .and_then(|percent| percent.parse().ok())
                .map(Self::Percent)
                .ok_or_else(|| TriggerPositionError::InvalidEdge(other.to_string())),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Center => write!(f, "center"),
            Self::Bottom => write!(f, "bottom"),
            Self::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

/// Where a trigger fires: when `element` edge of the trigger element meets `viewport` edge of the
/// viewport. Written as `"<element> <viewport>"`, e.g. `"bottom center"`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct TriggerPosition {
    pub element: Edge,
    pub viewport: Edge,
}

impl TriggerPosition {
    pub(crate) const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// The scroll offset at which this position is reached.
    fn resolve(&self, geometry: &TriggerGeometry) -> f64 {
        let element = geometry.element_top + self.element.offset(geometry.element_height);
        let viewport = self.viewport.offset(geometry.viewport_height);
        (element - viewport).clamp(0.0, geometry.max_scroll.max(0.0))
    }
}

impl FromStr for TriggerPosition {
    type Err = TriggerPositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(element), Some(viewport), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TriggerPositionError::Malformed(s.to_string()));
        };
        Ok(Self { element: element.parse()?, viewport: viewport.parse()? })
    }
}

impl TryFrom<String> for TriggerPosition {
    type Error = TriggerPositionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerPosition> for String {
    fn from(position: TriggerPosition) -> Self {
        position.to_string()
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TriggerPositionError {
    #[error("trigger position '{0}' must be '<element edge> <viewport edge>'")]
    Malformed(String),

    #[error("invalid edge '{0}': expected top, center, bottom or a percentage")]
    InvalidEdge(String),
}

/// The trigger element and viewport, in document rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TriggerGeometry {
    pub element_top: f64,
    pub element_height: f64,
    pub viewport_height: f64,
    pub max_scroll: f64,
}

/// A threshold crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub(crate) enum TriggerEvent {
    /// Scrolled down past the start.
    Enter,
    /// Scrolled down past the end.
    Leave,
    /// Scrolled up past the end.
    EnterBack,
    /// Scrolled up past the start.
    LeaveBack,
}

/// Rows of the trigger's debug markers. The element ones move with the page, the scroller ones
/// stay put; a crossing happens when a pair lines up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Markers {
    pub start: f64,
    pub end: f64,
    pub scroller_start: f64,
    pub scroller_end: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Region {
    Before,
    Active,
    After,
}

/// Watches scroll offsets and reports when they cross a start and an end threshold.
#[derive(Debug)]
pub(crate) struct ScrollTrigger {
    start_position: TriggerPosition,
    end_position: TriggerPosition,
    start: f64,
    end: f64,
    region: Region,
    scroll: f64,
}

impl ScrollTrigger {
    pub(crate) fn new(start: TriggerPosition, end: TriggerPosition, geometry: &TriggerGeometry) -> Self {
        let mut trigger =
            Self { start_position: start, end_position: end, start: 0.0, end: 0.0, region: Region::Before, scroll: 0.0 };
        trigger.refresh(geometry);
        trigger
    }

    /// Recompute the thresholds, e.g. after the viewport changes size.
    ///
    /// This doesn't fire anything; call [ScrollTrigger::update] afterwards to catch up.
    pub(crate) fn refresh(&mut self, geometry: &TriggerGeometry) {
        self.start = self.start_position.resolve(geometry);
        self.end = self.end_position.resolve(geometry).max(self.start);
    }

    /// The start and end thresholds, as scroll offsets.
    pub(crate) fn thresholds(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.region == Region::Active
    }

    #[cfg(test)]
    pub(crate) fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Move to a new scroll offset and report the thresholds crossed on the way, in order.
    pub(crate) fn update(&mut self, scroll: f64) -> Vec<TriggerEvent> {
        use TriggerEvent::*;

        self.scroll = scroll;
        let region = self.region_of(scroll);
        let events = match (self.region, region) {
            (Region::Before, Region::Active) => vec![Enter],
            (Region::Before, Region::After) => vec![Enter, Leave],
            (Region::Active, Region::After) => vec![Leave],
            (Region::After, Region::Active) => vec![EnterBack],
            (Region::After, Region::Before) => vec![EnterBack, LeaveBack],
            (Region::Active, Region::Before) => vec![LeaveBack],
            _ => Vec::new(),
        };
        self.region = region;
        events
    }

    /// Where the debug markers sit at the current scroll offset, in viewport rows.
    pub(crate) fn markers(&self, geometry: &TriggerGeometry) -> Markers {
        let element = |position: TriggerPosition| {
            geometry.element_top + position.element.offset(geometry.element_height) - self.scroll
        };
        let viewport = |position: TriggerPosition| position.viewport.offset(geometry.viewport_height);
        Markers {
            start: element(self.start_position),
            end: element(self.end_position),
            scroller_start: viewport(self.start_position),
            scroller_end: viewport(self.end_position),
        }
    }

    fn region_of(&self, scroll: f64) -> Region {
        if scroll <= self.start {
            Region::Before
        } else if scroll >= self.end {
            Region::After
        } else {
            Region::Active
        }
    }
}
