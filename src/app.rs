//! The terminal application: input, the frame loop and the scene it drives.

use crate::animation::{Animator, TickState};
use crate::config::{Config, Variant};
use crate::events::{Listeners, PageEvent, Subscription};
use crate::motion::MotionProfile;
use crate::pointer::PointerFollower;
use crate::render::{BannerError, Painter};
use crate::scroll::ScrollTrigger;
use crate::sequencer::{SequencedElements, Sequencer, Timings};
use crate::view::{Layout, Page, Properties};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use std::cell::RefCell;
use std::io::{self, BufWriter, Stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Rows scrolled per mouse wheel notch.
const WHEEL_ROWS: f64 = 3.0;

/// Everything on screen and the state driving it.
struct Scene {
    page: Page,
    animator: Animator,
    painter: Painter,
    layout: Layout,
    trigger: ScrollTrigger,
    sequencer: Option<Sequencer>,
    follower: Option<PointerFollower>,
    scroll: f64,
    markers: bool,
    dirty: bool,
}

impl Scene {
    fn new(config: &Config, mut rng: fastrand::Rng, viewport: (u16, u16)) -> Result<Self, BannerError> {
        let mut page = Page::new(config.block_count(), config.variant == Variant::Blobs, &mut rng);
        let mut animator = Animator::new();
        let painter = Painter::new(config, viewport.0)?;
        let layout = Layout::new(viewport, painter.greeting_size(), painter.panel_size());
        let trigger = ScrollTrigger::new(config.trigger.start, config.trigger.end, &layout.greeting_geometry());

        let elements = SequencedElements {
            greeting: page.greeting(),
            profile_panel: page.profile_panel(),
            blocks: page.blocks().to_vec(),
        };
        let motion = MotionProfile::for_variant(config.variant);
        let sequencer = Sequencer::attach(elements, motion, Timings::default(), rng.fork(), &mut animator, &mut page);

        let follower = page.marker().map(|marker| {
            let center = Properties::new().x(f64::from(viewport.0 / 2)).y(f64::from(viewport.1 / 2));
            animator.set(&mut page, marker, center);
            PointerFollower::new(marker, config.pointer_smoothing)
        });

        tracing::info!(
            "page ready: {} {}, {}x{}, trigger at {:?}",
            page.blocks().len(),
            config.variant,
            viewport.0,
            viewport.1,
            trigger.thresholds()
        );
        Ok(Self {
            page,
            animator,
            painter,
            layout,
            trigger,
            sequencer,
            follower,
            scroll: 0.0,
            markers: config.markers,
            dirty: true,
        })
    }

    fn scroll_to(&mut self, offset: f64) {
        self.scroll = offset.clamp(0.0, self.layout.max_scroll());
        for event in self.trigger.update(self.scroll) {
            tracing::debug!("trigger {event} at scroll offset {}", self.scroll);
            if let Some(sequencer) = self.sequencer.as_mut() {
                sequencer.handle(event, &mut self.animator, &mut self.page);
            }
        }
        self.dirty = true;
    }

    fn pointer_moved(&mut self, column: u16, row: u16) {
        if let Some(follower) = self.follower.as_mut() {
            follower.moved(column, row, &mut self.animator);
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        tracing::debug!("resized to {width}x{height}");
        self.painter.fit(width);
        self.layout = Layout::new((width, height), self.painter.greeting_size(), self.painter.panel_size());
        self.trigger.refresh(&self.layout.greeting_geometry());
        self.scroll_to(self.scroll);
    }

    fn tick(&mut self, delta: Duration) {
        if self.animator.tick(delta, &mut self.page) == TickState::Modified {
            self.dirty = true;
        }
    }

    fn draw<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let markers = self.markers.then(|| self.trigger.markers(&self.layout.greeting_geometry()));
        let canvas = self.painter.paint(&self.page, &self.layout, self.scroll, markers.as_ref());
        canvas.draw(writer)?;
        self.dirty = false;
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(sequencer) = self.sequencer.take() {
            tracing::info!("leaving in {} phase after {} transitions", sequencer.phase(), sequencer.transitions());
            sequencer.detach(&mut self.animator);
        }
    }
}

/// What to do about a terminal event.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Action {
    Quit,
    Publish(PageEvent),
}

/// Translate a terminal event into an action, given the current scroll offset, the largest one and
/// the viewport height.
fn action(event: &Event, scroll: f64, max_scroll: f64, height: u16) -> Option<Action> {
    let page = f64::from(height);
    let target = match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q') | KeyCode::Esc) => {
                return Some(Action::Quit)
            }
            (_, KeyCode::Down | KeyCode::Char('j')) => scroll + 1.0,
            (_, KeyCode::Up | KeyCode::Char('k')) => scroll - 1.0,
            (_, KeyCode::PageDown | KeyCode::Char(' ')) => scroll + page,
            (_, KeyCode::PageUp) => scroll - page,
            (_, KeyCode::Home) => 0.0,
            (_, KeyCode::End) => max_scroll,
            _ => return None,
        },
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => scroll + WHEEL_ROWS,
            MouseEventKind::ScrollUp => scroll - WHEEL_ROWS,
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let moved = PageEvent::PointerMoved { column: mouse.column, row: mouse.row };
                return Some(Action::Publish(moved));
            }
            _ => return None,
        },
        Event::Resize(width, height) => {
            return Some(Action::Publish(PageEvent::Resized { width: *width, height: *height }));
        }
        _ => return None,
    };
    let target = target.clamp(0.0, max_scroll);
    (target != scroll).then_some(Action::Publish(PageEvent::Scrolled(target)))
}

fn subscribe(listeners: &Listeners<PageEvent>, scene: &Rc<RefCell<Scene>>) -> Vec<Subscription> {
    let on_scroll = {
        let scene = Rc::clone(scene);
        listeners.subscribe(move |event| {
            if let PageEvent::Scrolled(offset) = event {
                scene.borrow_mut().scroll_to(*offset);
            }
        })
    };
    let on_resize = {
        let scene = Rc::clone(scene);
        listeners.subscribe(move |event| {
            if let PageEvent::Resized { width, height } = event {
                scene.borrow_mut().resize(*width, *height);
            }
        })
    };
    let mut subscriptions = vec![on_scroll, on_resize];
    if scene.borrow().follower.is_some() {
        let scene = Rc::clone(scene);
        subscriptions.push(listeners.subscribe(move |event| {
            if let PageEvent::PointerMoved { column, row } = event {
                scene.borrow_mut().pointer_moved(*column, *row);
            }
        }));
    }
    subscriptions
}

/// The terminal in full screen mode, put back the way it was when dropped.
struct Terminal {
    writer: BufWriter<Stdout>,
}

impl Terminal {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut writer = BufWriter::new(io::stdout());
        execute!(writer, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self { writer })
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.writer, Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Show the page until the user quits.
pub(crate) fn run(config: &Config, rng: fastrand::Rng) -> anyhow::Result<()> {
    let mut terminal = Terminal::enter()?;
    let viewport = terminal::size()?;
    let scene = Rc::new(RefCell::new(Scene::new(config, rng, viewport)?));
    let listeners = Listeners::new();
    let subscriptions = subscribe(&listeners, &scene);
    let frame = Duration::from_secs_f64(1.0 / f64::from(config.fps));

    let mut last_tick = Instant::now();
    loop {
        scene.borrow_mut().draw(&mut terminal.writer)?;

        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let event = event::read()?;
            let action = {
                let scene = scene.borrow();
                action(&event, scene.scroll, scene.layout.max_scroll(), scene.layout.height)
            };
            match action {
                Some(Action::Quit) => break,
                Some(Action::Publish(event)) => listeners.publish(&event),
                None => {}
            }
        }

        let now = Instant::now();
        if now.duration_since(last_tick) >= frame {
            scene.borrow_mut().tick(now.duration_since(last_tick));
            last_tick = now;
        }
    }

    for subscription in subscriptions {
        subscription.dispose();
    }
    scene.borrow_mut().teardown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::Phase;
    use crate::view::ViewModel;
    use crossterm::event::{KeyEvent, MouseButton, MouseEvent};
    use rstest::rstest;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent { kind, column: 7, row: 3, modifiers: KeyModifiers::NONE })
    }

    fn scene(variant: Variant) -> Scene {
        let config = Config { variant, seed: Some(5), ..Default::default() };
        Scene::new(&config, fastrand::Rng::with_seed(5), (80, 24)).expect("failed to build scene")
    }

    #[rstest]
    #[case::down(key(KeyCode::Down), 11.0)]
    #[case::j(key(KeyCode::Char('j')), 11.0)]
    #[case::up(key(KeyCode::Char('k')), 9.0)]
    #[case::page_down(key(KeyCode::PageDown), 20.0)]
    #[case::space(key(KeyCode::Char(' ')), 20.0)]
    #[case::page_up(key(KeyCode::PageUp), 0.0)]
    #[case::home(key(KeyCode::Home), 0.0)]
    #[case::end(key(KeyCode::End), 20.0)]
    #[case::wheel_down(mouse(MouseEventKind::ScrollDown), 13.0)]
    #[case::wheel_up(mouse(MouseEventKind::ScrollUp), 7.0)]
    fn scroll_keys(#[case] event: Event, #[case] expected: f64) {
        assert_eq!(action(&event, 10.0, 20.0, 24), Some(Action::Publish(PageEvent::Scrolled(expected))));
    }

    #[rstest]
    #[case::q(key(KeyCode::Char('q')))]
    #[case::esc(key(KeyCode::Esc))]
    #[case::ctrl_c(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))]
    fn quit_keys(#[case] event: Event) {
        assert_eq!(action(&event, 0.0, 20.0, 24), Some(Action::Quit));
    }

    #[test]
    fn no_scroll_past_the_ends() {
        assert_eq!(action(&key(KeyCode::Up), 0.0, 20.0, 24), None);
        assert_eq!(action(&key(KeyCode::End), 20.0, 20.0, 24), None);
    }

    #[test]
    fn pointer_and_resize_events() {
        let moved = action(&mouse(MouseEventKind::Moved), 0.0, 20.0, 24);
        assert_eq!(moved, Some(Action::Publish(PageEvent::PointerMoved { column: 7, row: 3 })));
        assert_eq!(action(&mouse(MouseEventKind::Down(MouseButton::Left)), 0.0, 20.0, 24), None);
        let resized = action(&Event::Resize(100, 40), 0.0, 20.0, 24);
        assert_eq!(resized, Some(Action::Publish(PageEvent::Resized { width: 100, height: 40 })));
    }

    #[test]
    fn scrolling_switches_phase_through_listeners() {
        let scene = Rc::new(RefCell::new(scene(Variant::Blocks)));
        let listeners = Listeners::new();
        let subscriptions = subscribe(&listeners, &scene);
        assert_eq!(subscriptions.len(), 2);

        let max = scene.borrow().layout.max_scroll();
        listeners.publish(&PageEvent::Scrolled(max));
        assert_eq!(scene.borrow().sequencer.as_ref().map(Sequencer::phase), Some(Phase::Profile));

        listeners.publish(&PageEvent::Scrolled(0.0));
        assert_eq!(scene.borrow().sequencer.as_ref().map(Sequencer::phase), Some(Phase::Greeting));

        for subscription in subscriptions {
            subscription.dispose();
        }
        assert_eq!(listeners.len(), 0);
        listeners.publish(&PageEvent::Scrolled(max));
        assert_eq!(scene.borrow().sequencer.as_ref().map(Sequencer::phase), Some(Phase::Greeting));
    }

    #[test]
    fn blobs_follow_the_pointer() {
        let scene = Rc::new(RefCell::new(scene(Variant::Blobs)));
        let listeners = Listeners::new();
        let _subscriptions = subscribe(&listeners, &scene);
        listeners.publish(&PageEvent::PointerMoved { column: 3, row: 2 });
        scene.borrow_mut().tick(Duration::from_secs(1));

        let scene = scene.borrow();
        let marker = scene.page.marker().expect("no marker");
        let transform = scene.page.style(marker).expect("detached").transform;
        assert_eq!((transform.x, transform.y), (3.0, 2.0));
    }

    #[test]
    fn resize_keeps_scroll_in_range() {
        let mut scene = scene(Variant::Blocks);
        scene.scroll_to(24.0);
        scene.resize(80, 10);
        assert_eq!(scene.scroll, 10.0);
        assert_eq!(scene.layout.height, 10);
    }

    #[test]
    fn teardown_stops_motion() {
        let mut scene = scene(Variant::Blocks);
        scene.scroll_to(scene.layout.max_scroll());
        scene.tick(Duration::from_millis(100));
        scene.teardown();
        assert!(scene.sequencer.is_none());
        scene.tick(Duration::from_secs(5));
        assert_eq!(scene.animator.active_tasks(), 0);
    }
}
