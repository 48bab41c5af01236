use super::Easing;
use crate::view::{ElementHandle, Properties, Property, ViewModel};

/// How many times a tween or timeline plays again after its first run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Repeat {
    #[default]
    Never,
    Times(u32),
    Infinite,
}

/// Where a tween or timeline is at a given point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayState {
    /// Still inside its delay.
    Pending,
    Running,
    Finished,
}

/// Progress through a repeating, optionally yoyo-ing, run of fixed length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Cycle {
    /// Zero based run index.
    pub iteration: u64,
    /// Time within the current run, clamped to the run's length.
    pub local: f64,
    pub finished: bool,
}

impl Cycle {
    pub(crate) fn at(time: f64, length: f64, repeat: Repeat, repeat_delay: f64) -> Self {
        if length <= 0.0 {
            return Self { iteration: 0, local: 0.0, finished: true };
        }
        let period = length + repeat_delay.max(0.0);
        let mut iteration = (time / period).floor().max(0.0) as u64;
        let mut local = time - iteration as f64 * period;
        let last = match repeat {
            Repeat::Never => Some(0),
            Repeat::Times(n) => Some(u64::from(n)),
            Repeat::Infinite => None,
        };
        let mut finished = false;
        if let Some(last) = last {
            if iteration > last || (iteration == last && local >= length) {
                iteration = last;
                local = length;
                finished = true;
            }
        }
        Self { iteration, local: local.min(length), finished }
    }
}

/// An interpolation of some of an element's properties towards target values.
///
/// Start values are taken from the element the first time the tween renders past its delay,
/// and kept for every repeat.
#[derive(Clone, Debug)]
pub(crate) struct Tween {
    target: ElementHandle,
    to: Properties,
    from: Option<Properties>,
    duration: f64,
    delay: f64,
    ease: Easing,
    repeat: Repeat,
    yoyo: bool,
    repeat_delay: f64,
    overwrite: bool,
    on_complete: Option<Properties>,
    completed: bool,
}

impl Tween {
    const DEFAULT_DURATION: f64 = 0.5;

    pub(crate) fn to(target: ElementHandle, to: Properties) -> Self {
        Self {
            target,
            to,
            from: None,
            duration: Self::DEFAULT_DURATION,
            delay: 0.0,
            ease: Easing::default(),
            repeat: Repeat::Never,
            yoyo: false,
            repeat_delay: 0.0,
            overwrite: false,
            on_complete: None,
            completed: false,
        }
    }

    /// A tween that applies its values immediately.
    pub(crate) fn set(target: ElementHandle, to: Properties) -> Self {
        Self::to(target, to).duration(0.0)
    }

    pub(crate) fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    pub(crate) fn delay(mut self, seconds: f64) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    pub(crate) fn ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    pub(crate) fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub(crate) fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub(crate) fn repeat_delay(mut self, seconds: f64) -> Self {
        self.repeat_delay = seconds.max(0.0);
        self
    }

    /// Kill the animated properties of any other tween on the same element when this starts.
    pub(crate) fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Values to set on the element each time the tween completes.
    pub(crate) fn on_complete_set(mut self, properties: Properties) -> Self {
        self.on_complete = Some(properties);
        self
    }

    pub(crate) fn target(&self) -> ElementHandle {
        self.target
    }

    pub(crate) fn properties(&self) -> &Properties {
        &self.to
    }

    pub(crate) fn overwrites(&self) -> bool {
        self.overwrite
    }

    /// Length including delay and every repeat, if finite.
    pub(crate) fn total_duration(&self) -> Option<f64> {
        let runs = match self.repeat {
            Repeat::Never => 0,
            Repeat::Times(n) => n,
            Repeat::Infinite => return None,
        };
        Some(self.delay + self.duration * f64::from(runs + 1) + self.repeat_delay * f64::from(runs))
    }

    /// Stop animating the given properties.
    pub(crate) fn remove_properties(&mut self, properties: &Properties) {
        for (property, _) in properties.iter() {
            self.to.remove(property);
            if let Some(from) = &mut self.from {
                from.remove(property);
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.to.is_empty()
    }

    /// Allow the completion values to be set again, for a tween replayed by a timeline.
    pub(crate) fn rewind(&mut self) {
        self.completed = false;
    }

    /// Render the tween at `time` seconds after it was scheduled.
    pub(crate) fn render(&mut self, time: f64, view: &mut dyn ViewModel) -> PlayState {
        if time < self.delay {
            return PlayState::Pending;
        }
        let Some(style) = view.style(self.target) else {
            return PlayState::Finished;
        };
        let from = self.from.get_or_insert_with(|| {
            self.to.iter().fold(Properties::new(), |props, (property, _)| props.with(property, style.get(property)))
        });

        let cycle = Cycle::at(time - self.delay, self.duration, self.repeat, self.repeat_delay);
        let mut progress = if self.duration > 0.0 { cycle.local / self.duration } else { 1.0 };
        if self.yoyo && cycle.iteration % 2 == 1 {
            progress = 1.0 - progress;
        }
        let eased = self.ease.apply(progress);

        let values = self.to.iter().fold(Properties::new(), |props, (property, end)| {
            let start = from.get(property).unwrap_or(end);
            props.with(property, interpolate(property, start, end, eased))
        });
        view.apply(self.target, &values);

        if !cycle.finished {
            return PlayState::Running;
        }
        if !self.completed {
            self.completed = true;
            if let Some(properties) = &self.on_complete {
                view.apply(self.target, properties);
            }
        }
        PlayState::Finished
    }
}

fn interpolate(property: Property, start: f64, end: f64, progress: f64) -> f64 {
    let value = match progress {
        p if p >= 1.0 => end,
        p if p <= 0.0 => start,
        p => start + (end - start) * p,
    };
    match property {
        Property::Opacity => value.clamp(0.0, 1.0),
        _ => value,
    }
}
