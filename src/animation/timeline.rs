use super::tween::{Cycle, PlayState, Repeat, Tween};
use crate::view::ViewModel;

/// A sequence of tweens played back to back, optionally repeating as a whole.
#[derive(Clone, Debug, Default)]
pub(crate) struct Timeline {
    children: Vec<(f64, Tween)>,
    delay: f64,
    repeat: Repeat,
    repeat_delay: f64,
    iteration: Option<u64>,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a tween that starts when everything before it is done.
    pub(crate) fn then(mut self, tween: Tween) -> Self {
        let offset = self.duration();
        self.children.push((offset, tween));
        self
    }

    pub(crate) fn delay(mut self, seconds: f64) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    pub(crate) fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub(crate) fn repeat_delay(mut self, seconds: f64) -> Self {
        self.repeat_delay = seconds.max(0.0);
        self
    }

    /// Length of a single run.
    pub(crate) fn duration(&self) -> f64 {
        self.children
            .iter()
            .map(|(offset, tween)| offset + tween.total_duration().unwrap_or_default())
            .fold(0.0, f64::max)
    }

    #[cfg(test)]
    pub(crate) fn targets(&self) -> impl Iterator<Item = crate::view::ElementHandle> + '_ {
        self.children.iter().map(|(_, tween)| tween.target())
    }

    pub(crate) fn render(&mut self, time: f64, view: &mut dyn ViewModel) -> PlayState {
        if time < self.delay {
            return PlayState::Pending;
        }
        let length = self.duration();
        let cycle = Cycle::at(time - self.delay, length, self.repeat, self.repeat_delay);
        match self.iteration {
            Some(previous) if previous != cycle.iteration => {
                // finish off the previous run before replaying
                for (offset, tween) in &mut self.children {
                    tween.render(length - *offset, view);
                    tween.rewind();
                }
            }
            _ => {}
        }
        self.iteration = Some(cycle.iteration);

        for (offset, tween) in &mut self.children {
            if cycle.local >= *offset {
                tween.render(cycle.local - *offset, view);
            }
        }
        if cycle.finished {
            PlayState::Finished
        } else {
            PlayState::Running
        }
    }
}
