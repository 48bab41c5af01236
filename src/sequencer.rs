//! The greeting/profile state machine driven by the scroll trigger.

use crate::animation::{Animator, Tween};
use crate::motion::{BlockMotion, MotionProfile};
use crate::scroll::TriggerEvent;
use crate::view::{ElementHandle, Properties, ViewModel};
use std::fmt;

/// Which of the two mutually exclusive visual states the page is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Phase {
    #[default]
    Greeting,
    Profile,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greeting => write!(f, "greeting"),
            Self::Profile => write!(f, "profile"),
        }
    }
}

/// The elements the sequencer drives.
#[derive(Clone, Debug)]
pub(crate) struct SequencedElements {
    pub greeting: ElementHandle,
    pub profile_panel: ElementHandle,
    pub blocks: Vec<ElementHandle>,
}

/// Timing of the phase transitions, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Timings {
    /// Greeting and panel fades, and the panel's slide.
    pub fade: f64,
    /// Blocks fading in.
    pub blocks_fade: f64,
    /// Blocks settling back to rest.
    pub settle: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self { fade: 1.0, blocks_fade: 2.0, settle: 1.0 }
    }
}

/// How far off screen the panel sits while hidden, as a percentage of its width.
const PANEL_HIDDEN_OFFSET: f64 = -100.0;

/// Switches between the greeting and the profile as the trigger fires, and keeps the decorative
/// blocks moving while the profile shows.
#[derive(Debug)]
pub(crate) struct Sequencer {
    phase: Phase,
    elements: SequencedElements,
    motion: MotionProfile,
    timings: Timings,
    running: Vec<BlockMotion>,
    rng: fastrand::Rng,
    transitions: usize,
}

impl Sequencer {
    /// Attach to the page and put it in its initial greeting state.
    ///
    /// Returns `None`, doing nothing, if the greeting or the profile panel isn't attached yet.
    pub(crate) fn attach(
        elements: SequencedElements,
        motion: MotionProfile,
        timings: Timings,
        rng: fastrand::Rng,
        animator: &mut Animator,
        view: &mut dyn ViewModel,
    ) -> Option<Self> {
        if !view.is_attached(elements.greeting) || !view.is_attached(elements.profile_panel) {
            tracing::debug!("greeting or profile panel not attached, skipping sequencer setup");
            return None;
        }
        animator.set(view, elements.profile_panel, Properties::new().opacity(0.0).x_percent(PANEL_HIDDEN_OFFSET));
        for block in &elements.blocks {
            animator.set(view, *block, Properties::new().opacity(0.0));
        }
        Some(Self { phase: Phase::Greeting, elements, motion, timings, running: Vec::new(), rng, transitions: 0 })
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    /// How many phase changes happened so far.
    pub(crate) fn transitions(&self) -> usize {
        self.transitions
    }

    /// Whether any block is still moving.
    #[cfg(test)]
    pub(crate) fn is_moving(&self, animator: &Animator) -> bool {
        self.running.iter().any(|motion| motion.is_running(animator))
    }

    /// React to a scroll trigger crossing.
    pub(crate) fn handle(&mut self, event: TriggerEvent, animator: &mut Animator, view: &mut dyn ViewModel) {
        match (event, self.phase) {
            (TriggerEvent::Enter, Phase::Greeting) => self.enter_profile(animator),
            (TriggerEvent::LeaveBack, Phase::Profile) => self.leave_profile(animator, view),
            _ => {}
        }
    }

    /// Stop everything the sequencer started.
    pub(crate) fn detach(mut self, animator: &mut Animator) {
        self.stop_blocks(animator);
    }

    fn enter_profile(&mut self, animator: &mut Animator) {
        tracing::info!("{} -> {}", self.phase, Phase::Profile);
        let fade = self.timings.fade;
        let elements = &self.elements;
        animator.to(
            Tween::to(elements.profile_panel, Properties::new().opacity(1.0).x_percent(0.0))
                .duration(fade)
                .overwrite(),
        );
        animator.to(Tween::to(elements.greeting, Properties::new().opacity(0.0)).duration(fade).overwrite());
        for block in &elements.blocks {
            animator.to(
                Tween::to(*block, Properties::new().opacity(1.0)).duration(self.timings.blocks_fade).overwrite(),
            );
        }

        // a re-entry starts from scratch, even if the previous exit never got to run
        self.stop_blocks(animator);
        let count = self.elements.blocks.len();
        for (index, block) in self.elements.blocks.iter().enumerate() {
            let motion = self.motion.start(*block, index, count, animator, &mut self.rng);
            self.running.push(motion);
        }

        self.phase = Phase::Profile;
        self.transitions += 1;
    }

    fn leave_profile(&mut self, animator: &mut Animator, view: &mut dyn ViewModel) {
        tracing::info!("{} -> {}", self.phase, Phase::Greeting);
        self.stop_blocks(animator);

        let fade = self.timings.fade;
        let elements = &self.elements;
        animator.to(
            Tween::to(elements.profile_panel, Properties::new().opacity(0.0).x_percent(PANEL_HIDDEN_OFFSET))
                .duration(fade)
                .overwrite(),
        );
        animator.to(Tween::to(elements.greeting, Properties::new().opacity(1.0)).duration(fade).overwrite());
        for block in &elements.blocks {
            animator.set(view, *block, Properties::new().opacity(0.0));
            animator.to(
                Tween::to(*block, Properties::new().rotation(0.0).x(0.0).y(0.0).scale(1.0))
                    .duration(self.timings.settle)
                    .overwrite(),
            );
        }

        self.phase = Phase::Greeting;
        self.transitions += 1;
    }

    fn stop_blocks(&mut self, animator: &mut Animator) {
        if self.running.is_empty() {
            return;
        }
        tracing::debug!("stopping motion for {} blocks", self.running.len());
        for motion in self.running.drain(..) {
            motion.stop(animator);
        }
    }
}
