use crate::animation::{Animator, Easing, TaskId, Tween};
use crate::view::{ElementHandle, Properties};

/// Moves a marker towards wherever the pointer last was.
#[derive(Debug)]
pub(crate) struct PointerFollower {
    marker: ElementHandle,
    smoothing: f64,
    ease: Easing,
    last: Option<TaskId>,
}

impl PointerFollower {
    pub(crate) fn new(marker: ElementHandle, smoothing: f64) -> Self {
        Self { marker, smoothing, ease: Easing::Power2Out, last: None }
    }

    /// Start gliding towards a new pointer position, dropping the previous glide.
    pub(crate) fn moved(&mut self, column: u16, row: u16, animator: &mut Animator) {
        if let Some(previous) = self.last.take() {
            animator.kill(previous);
        }
        let tween = Tween::to(self.marker, Properties::new().x(f64::from(column)).y(f64::from(row)))
            .duration(self.smoothing)
            .ease(self.ease);
        self.last = Some(animator.to(tween));
    }

    #[cfg(test)]
    pub(crate) fn is_gliding(&self, animator: &Animator) -> bool {
        self.last.is_some_and(|task| animator.is_active(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Page, ViewModel};
    use std::time::Duration;

    #[test]
    fn follows_latest_position() {
        let mut page = Page::new(0, true, &mut fastrand::Rng::with_seed(2));
        let marker = page.marker().expect("no marker");
        let mut animator = Animator::new();
        let mut follower = PointerFollower::new(marker, 0.3);

        follower.moved(10, 4, &mut animator);
        animator.tick(Duration::from_millis(100), &mut page);
        follower.moved(40, 12, &mut animator);
        assert_eq!(animator.active_tasks(), 1);

        animator.tick(Duration::from_millis(100), &mut page);
        let transform = page.style(marker).unwrap().transform;
        assert!(transform.x > 0.0 && transform.x < 40.0);
        assert!(follower.is_gliding(&animator));

        animator.tick(Duration::from_millis(300), &mut page);
        let transform = page.style(marker).unwrap().transform;
        assert_eq!((transform.x, transform.y), (40.0, 12.0));
        assert!(!follower.is_gliding(&animator));
    }
}
