//! Transient drag session state.
//!
//! A press becomes a drag only once the modality's activation constraint
//! is met. While a drag is live, page scrolling is suspended through the
//! [`ScrollLock`]; every suspend is paired with exactly one restore.

use std::time::{Duration, Instant};

use taskboard_core::DragConfig;
use tracing::debug;

use crate::reconcile::DragItem;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    Pointer,
    Touch,
    Keyboard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivationConstraints {
    pub pointer_distance: f64,
    pub touch_delay: Duration,
    pub touch_tolerance: f64,
}

impl From<&DragConfig> for ActivationConstraints {
    fn from(config: &DragConfig) -> Self {
        Self {
            pointer_distance: config.pointer_distance_px,
            touch_delay: Duration::from_millis(config.touch_delay_ms),
            touch_tolerance: config.touch_tolerance_px,
        }
    }
}

impl Default for ActivationConstraints {
    fn default() -> Self {
        Self::from(&DragConfig::default())
    }
}

/// Suspends page scroll and touch gestures for the length of a drag.
pub trait ScrollLock: Send {
    fn suspend(&mut self);
    fn restore(&mut self);
}

#[derive(Debug, Default)]
pub struct NoopScrollLock;

impl ScrollLock for NoopScrollLock {
    fn suspend(&mut self) {}
    fn restore(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Pressed {
        item: DragItem,
        modality: InputModality,
        origin: Point,
        pressed_at: Instant,
    },
    Dragging {
        item: DragItem,
        over: Option<String>,
    },
}

/// A completed drag that should be handed to the reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRequest {
    pub dragged: String,
    pub target: String,
}

pub struct DragController<S: ScrollLock = NoopScrollLock> {
    state: DragState,
    constraints: ActivationConstraints,
    scroll: S,
}

impl DragController<NoopScrollLock> {
    pub fn headless(constraints: ActivationConstraints) -> Self {
        Self::new(constraints, NoopScrollLock)
    }
}

impl<S: ScrollLock> DragController<S> {
    pub fn new(constraints: ActivationConstraints, scroll: S) -> Self {
        Self {
            state: DragState::Idle,
            constraints,
            scroll,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn active_item(&self) -> Option<&DragItem> {
        match &self.state {
            DragState::Dragging { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn scroll_lock(&self) -> &S {
        &self.scroll
    }

    /// Start a press. Keyboard lifts activate immediately. Returns whether
    /// a drag is now live. Ignored unless idle.
    pub fn press(&mut self, item: DragItem, modality: InputModality, at: Point, now: Instant) -> bool {
        if self.state != DragState::Idle {
            return false;
        }
        if modality == InputModality::Keyboard {
            self.activate(item);
            return true;
        }
        self.state = DragState::Pressed {
            item,
            modality,
            origin: at,
            pressed_at: now,
        };
        false
    }

    /// Report pointer or finger movement. Returns whether a drag is live.
    pub fn move_to(&mut self, at: Point, now: Instant) -> bool {
        let (item, modality, origin, pressed_at) = match &self.state {
            DragState::Pressed {
                item,
                modality,
                origin,
                pressed_at,
            } => (item.clone(), *modality, *origin, *pressed_at),
            _ => return self.is_dragging(),
        };

        let moved = origin.distance_to(&at);
        let held = now.duration_since(pressed_at);
        match modality {
            InputModality::Pointer if moved >= self.constraints.pointer_distance => {
                self.activate(item);
                true
            }
            InputModality::Touch if held >= self.constraints.touch_delay => {
                self.activate(item);
                true
            }
            InputModality::Touch if moved > self.constraints.touch_tolerance => {
                debug!("touch press abandoned after moving {:.1}px", moved);
                self.state = DragState::Idle;
                false
            }
            _ => false,
        }
    }

    /// Advance time without movement, letting a held touch activate.
    pub fn tick(&mut self, now: Instant) -> bool {
        let ready = match &self.state {
            DragState::Pressed {
                item,
                modality: InputModality::Touch,
                pressed_at,
                ..
            } if now.duration_since(*pressed_at) >= self.constraints.touch_delay => {
                Some(item.clone())
            }
            _ => None,
        };
        if let Some(item) = ready {
            self.activate(item);
        }
        self.is_dragging()
    }

    pub fn hover(&mut self, target: Option<String>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = target;
        }
    }

    /// End the gesture. Yields a drop only for a live drag over a target
    /// other than the dragged item itself.
    pub fn release(&mut self) -> Option<DropRequest> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { item, over } => {
                self.scroll.restore();
                let dragged = item.drag_id();
                match over {
                    Some(target) if target != dragged => Some(DropRequest { dragged, target }),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        if let DragState::Dragging { .. } = std::mem::replace(&mut self.state, DragState::Idle) {
            self.scroll.restore();
            debug!("drag cancelled");
        }
    }

    fn activate(&mut self, item: DragItem) {
        debug!(item = %item.drag_id(), "drag activated");
        self.scroll.suspend();
        self.state = DragState::Dragging { item, over: None };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingLock {
        suspended: u32,
        restored: u32,
    }

    impl ScrollLock for CountingLock {
        fn suspend(&mut self) {
            self.suspended += 1;
        }
        fn restore(&mut self) {
            self.restored += 1;
        }
    }

    fn controller() -> DragController<CountingLock> {
        DragController::new(ActivationConstraints::default(), CountingLock::default())
    }

    fn task(id: &str) -> DragItem {
        DragItem::Task(id.to_string())
    }

    #[test]
    fn test_pointer_needs_distance() {
        let mut c = controller();
        let t0 = Instant::now();
        c.press(task("a"), InputModality::Pointer, Point::new(0.0, 0.0), t0);
        assert!(!c.move_to(Point::new(3.0, 4.0), t0));
        assert!(c.move_to(Point::new(6.0, 6.0), t0));
        assert!(c.is_dragging());
        assert_eq!(c.scroll_lock().suspended, 1);
    }

    #[test]
    fn test_pointer_tap_is_not_a_drag() {
        let mut c = controller();
        c.press(task("a"), InputModality::Pointer, Point::new(0.0, 0.0), Instant::now());
        assert_eq!(c.release(), None);
        assert_eq!(c.scroll_lock().suspended, 0);
        assert_eq!(c.scroll_lock().restored, 0);
    }

    #[test]
    fn test_touch_needs_hold() {
        let mut c = controller();
        let t0 = Instant::now();
        c.press(task("a"), InputModality::Touch, Point::new(0.0, 0.0), t0);
        assert!(!c.tick(t0 + Duration::from_millis(150)));
        assert!(c.tick(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_touch_abandoned_when_finger_moves_early() {
        let mut c = controller();
        let t0 = Instant::now();
        c.press(task("a"), InputModality::Touch, Point::new(0.0, 0.0), t0);
        assert!(!c.move_to(Point::new(0.0, 20.0), t0 + Duration::from_millis(50)));
        assert_eq!(c.state(), &DragState::Idle);
        assert!(!c.tick(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_touch_small_wobble_keeps_press() {
        let mut c = controller();
        let t0 = Instant::now();
        c.press(task("a"), InputModality::Touch, Point::new(0.0, 0.0), t0);
        assert!(!c.move_to(Point::new(2.0, 2.0), t0 + Duration::from_millis(50)));
        assert!(c.move_to(Point::new(3.0, 3.0), t0 + Duration::from_millis(220)));
    }

    #[test]
    fn test_keyboard_activates_immediately_and_drops() {
        let mut c = controller();
        assert!(c.press(task("a"), InputModality::Keyboard, Point::new(0.0, 0.0), Instant::now()));
        c.hover(Some("b".into()));
        assert_eq!(
            c.release(),
            Some(DropRequest {
                dragged: "a".into(),
                target: "b".into()
            })
        );
        assert_eq!(c.scroll_lock().suspended, 1);
        assert_eq!(c.scroll_lock().restored, 1);
    }

    #[test]
    fn test_release_without_target_or_on_self() {
        let mut c = controller();
        c.press(task("a"), InputModality::Keyboard, Point::new(0.0, 0.0), Instant::now());
        assert_eq!(c.release(), None);

        c.press(DragItem::Column("x".into()), InputModality::Keyboard, Point::new(0.0, 0.0), Instant::now());
        c.hover(Some("column-x".into()));
        assert_eq!(c.release(), None);
        assert_eq!(c.scroll_lock().restored, 2);
    }

    #[test]
    fn test_cancel_restores_and_drops_nothing() {
        let mut c = controller();
        c.press(task("a"), InputModality::Keyboard, Point::new(0.0, 0.0), Instant::now());
        c.hover(Some("b".into()));
        c.cancel();
        assert_eq!(c.state(), &DragState::Idle);
        assert_eq!(c.release(), None);
        assert_eq!(c.scroll_lock().restored, 1);

        c.cancel();
        assert_eq!(c.scroll_lock().restored, 1);
    }

    #[test]
    fn test_constraints_from_config() {
        let config = DragConfig {
            pointer_distance_px: 12.0,
            touch_delay_ms: 350,
            touch_tolerance_px: 4.0,
        };
        let constraints = ActivationConstraints::from(&config);
        assert_eq!(constraints.touch_delay, Duration::from_millis(350));
        assert_eq!(constraints.pointer_distance, 12.0);
    }
}
