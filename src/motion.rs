//! The looping motion decorative blocks go through while the profile is showing.

use crate::animation::{Animator, Easing, Repeat, TaskId, Timeline, Tween};
use crate::config::Variant;
use crate::view::{ElementHandle, Properties};

/// Two full turns.
const SPIN_ANGLE: f64 = 720.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Spin {
    /// Length of a single spin.
    duration: f64,
    /// Rest after each spin, before the next block goes.
    rest: f64,
}

impl Spin {
    fn stagger(&self) -> f64 {
        self.duration + self.rest
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Jitter {
    /// Largest horizontal offset, in cells, either way.
    x: f64,
    /// Largest vertical offset, in cells, either way.
    y: f64,
    /// Largest scale increase.
    scale: f64,
    /// Shortest and longest time to get to the offset.
    duration: (f64, f64),
}

/// How blocks move: an optional spin, taken in turns, plus a random drift back and forth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MotionProfile {
    spin: Option<Spin>,
    jitter: Jitter,
}

impl MotionProfile {
    /// Solid blocks spin one after another and wobble a little.
    pub(crate) fn blocks() -> Self {
        Self {
            spin: Some(Spin { duration: 1.0, rest: 0.5 }),
            jitter: Jitter { x: 1.0, y: 0.5, scale: 0.2, duration: (1.5, 1.5) },
        }
    }

    /// Blurry blobs don't spin, they drift further and swell more, each at its own pace.
    pub(crate) fn blobs() -> Self {
        Self { spin: None, jitter: Jitter { x: 6.0, y: 2.0, scale: 0.5, duration: (2.0, 4.0) } }
    }

    pub(crate) fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Blocks => Self::blocks(),
            Variant::Blobs => Self::blobs(),
        }
    }

    /// Start moving the `index`th block out of `count`.
    pub(crate) fn start(
        &self,
        block: ElementHandle,
        index: usize,
        count: usize,
        animator: &mut Animator,
        rng: &mut fastrand::Rng,
    ) -> BlockMotion {
        let mut tasks = Vec::new();
        if let Some(spin) = &self.spin {
            let timeline = Timeline::new()
                .then(
                    Tween::to(block, Properties::new().rotation(SPIN_ANGLE))
                        .duration(spin.duration)
                        .ease(Easing::Linear)
                        .on_complete_set(Properties::new().rotation(0.0)),
                )
                .then(Tween::to(block, Properties::new().rotation(0.0)).duration(spin.rest))
                .delay(index as f64 * spin.stagger())
                .repeat(Repeat::Infinite)
                .repeat_delay(count.saturating_sub(1) as f64 * spin.stagger());
            tasks.push(animator.timeline(timeline));
        }

        let jitter = &self.jitter;
        let (shortest, longest) = jitter.duration;
        let drift = Tween::to(
            block,
            Properties::new()
                .x(rng.f64() * jitter.x * 2.0 - jitter.x)
                .y(rng.f64() * jitter.y * 2.0 - jitter.y)
                .scale(1.0 + rng.f64() * jitter.scale),
        )
        .duration(shortest + rng.f64() * (longest - shortest))
        .ease(Easing::SineInOut)
        .repeat(Repeat::Infinite)
        .yoyo(true);
        tasks.push(animator.to(drift));

        tracing::debug!("started motion for block {} ({} tasks)", index, tasks.len());
        BlockMotion { tasks }
    }
}

/// The tasks moving a single block. Stopping it cancels all of them.
#[derive(Debug)]
pub(crate) struct BlockMotion {
    tasks: Vec<TaskId>,
}

impl BlockMotion {
    pub(crate) fn stop(self, animator: &mut Animator) {
        for task in self.tasks {
            animator.kill(task);
        }
    }

    pub(crate) fn is_running(&self, animator: &Animator) -> bool {
        self.tasks.iter().any(|task| animator.is_active(*task))
    }
}
