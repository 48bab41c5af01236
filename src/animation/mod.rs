//! Tweening: interpolating element properties over time.

mod animator;
mod easing;
mod timeline;
mod tween;

pub(crate) use animator::{Animator, TaskId, TickState};
pub(crate) use easing::Easing;
pub(crate) use timeline::Timeline;
pub(crate) use tween::{PlayState, Repeat, Tween};
