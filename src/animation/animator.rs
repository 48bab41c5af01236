use super::timeline::Timeline;
use super::tween::{PlayState, Tween};
use crate::view::{ElementHandle, Properties, ViewModel};
use std::time::Duration;

/// Identifies a scheduled tween or timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TaskId(u64);

/// Whether a tick changed anything on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TickState {
    Modified,
    Unmodified,
}

#[derive(Debug)]
enum Animation {
    Tween(Tween),
    Timeline(Timeline),
}

impl Animation {
    fn render(&mut self, time: f64, view: &mut dyn ViewModel) -> PlayState {
        match self {
            Self::Tween(tween) => tween.render(time, view),
            Self::Timeline(timeline) => timeline.render(time, view),
        }
    }
}

#[derive(Debug)]
struct Task {
    id: TaskId,
    animation: Animation,
    elapsed: f64,
}

/// Owns every running tween and timeline, and advances them as time passes.
///
/// Tasks render in the order they were scheduled, so when two of them drive the same property
/// the newest one wins.
#[derive(Debug, Default)]
pub(crate) struct Animator {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Animator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Schedule a tween, starting now.
    pub(crate) fn to(&mut self, tween: Tween) -> TaskId {
        if tween.overwrites() {
            self.kill_properties(tween.target(), tween.properties());
        }
        self.push(Animation::Tween(tween))
    }

    /// Schedule a timeline, starting now.
    pub(crate) fn timeline(&mut self, timeline: Timeline) -> TaskId {
        self.push(Animation::Timeline(timeline))
    }

    /// Set properties immediately. Tweens driving any of them on the same element stop doing so.
    pub(crate) fn set(&mut self, view: &mut dyn ViewModel, target: ElementHandle, properties: Properties) {
        self.kill_properties(target, &properties);
        view.apply(target, &properties);
    }

    /// Cancel a task. Returns whether it was still running.
    pub(crate) fn kill(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub(crate) fn is_active(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub(crate) fn active_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Whether any tween or timeline is driving the given element.
    #[cfg(test)]
    pub(crate) fn is_animating(&self, target: ElementHandle) -> bool {
        self.tasks.iter().any(|task| match &task.animation {
            Animation::Tween(tween) => tween.target() == target,
            Animation::Timeline(timeline) => timeline.targets().any(|t| t == target),
        })
    }

    /// Advance every task by `delta` and drop the ones that are done.
    pub(crate) fn tick(&mut self, delta: Duration, view: &mut dyn ViewModel) -> TickState {
        if self.tasks.is_empty() {
            return TickState::Unmodified;
        }
        let delta = delta.as_secs_f64();
        for task in &mut self.tasks {
            task.elapsed += delta;
        }
        let mut finished = Vec::new();
        for task in &mut self.tasks {
            if task.animation.render(task.elapsed, view) == PlayState::Finished {
                finished.push(task.id);
            }
        }
        self.tasks.retain(|task| !finished.contains(&task.id));
        TickState::Modified
    }

    fn push(&mut self, animation: Animation) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task { id, animation, elapsed: 0.0 });
        id
    }

    fn kill_properties(&mut self, target: ElementHandle, properties: &Properties) {
        for task in &mut self.tasks {
            if let Animation::Tween(tween) = &mut task.animation {
                if tween.target() == target {
                    tween.remove_properties(properties);
                }
            }
        }
        self.tasks.retain(|task| !matches!(&task.animation, Animation::Tween(tween) if tween.is_empty()));
    }
}
