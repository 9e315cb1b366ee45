//! Landing-page section snapping.
//!
//! The home page is one continuously scrollable document. When the visitor
//! scrolls *down* with a wheel or a touch gesture, the orchestrator may snap
//! the viewport to the next section boundary. It never snaps upward.
//!
//! Inputs are timestamped events; outputs are [`SnapCommand`]s the view
//! applies as smooth scrolls. Candidate targets are checked in fixed priority
//! order (reviews, "crafted for you", hero) and at most one fires per scroll
//! tick. After a snap, evaluation is suppressed until the smooth-scroll
//! animation has had time to finish.
//!
//! The thresholds live in [`SnapConfig`]. They were tuned by hand for common
//! viewport sizes and are kept as-is.
//!
//! The orchestrator runs in the browser. A server-rendered home page drives
//! none of it; it publishes [`SnapConfig`] as the `data-*` attributes of the
//! snap root so an in-page script can run the same state machine.

use std::time::Duration;

use crate::timer::{Millis, Timer};

/// Tunables for section snapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapConfig {
    /// Wheel intent is dropped after this much wheel inactivity.
    pub wheel_idle: Duration,
    /// Touch state is cleared this long after the finger lifts.
    pub touch_settle: Duration,
    /// Longer settle window on iOS, where momentum scrolling continues after
    /// the finger lifts.
    pub touch_settle_ios: Duration,
    /// Minimum vertical travel (px) before a touch gesture has a direction.
    pub touch_direction_threshold: f64,
    /// Minimum touch velocity (px/ms) on iOS, filtering momentum scrolling.
    pub ios_min_velocity: f64,
    /// Snap evaluation is suppressed this long after a snap starts.
    pub snap_lock: Duration,
    /// A section top above this fraction of the viewport snaps *past* it.
    pub upper_threshold: f64,
    /// A section top below this fraction of the viewport snaps *to* it.
    pub lower_threshold: f64,
    /// Fraction of the hero that must still be visible to snap to the tagline.
    pub hero_visible_fraction: f64,
    /// Fixed header height subtracted from snap targets (px).
    pub header_height: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            wheel_idle: Duration::from_millis(150),
            touch_settle: Duration::from_millis(300),
            touch_settle_ios: Duration::from_millis(500),
            touch_direction_threshold: 10.0,
            ios_min_velocity: 0.1,
            snap_lock: Duration::from_millis(800),
            upper_threshold: 0.25,
            lower_threshold: 0.35,
            hero_visible_fraction: 0.5,
            header_height: 56.0,
        }
    }
}

/// Device class, as far as scrolling is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    Ios,
    #[default]
    Other,
}

impl Device {
    /// Detect iOS from the user agent, or an iPad reporting itself as a Mac
    /// (`MacIntel` with more than one touch point).
    #[must_use]
    pub fn from_user_agent(user_agent: &str, platform: &str, max_touch_points: u32) -> Self {
        let ios_agent = ["iPad", "iPhone", "iPod"]
            .iter()
            .any(|needle| user_agent.contains(needle));
        if ios_agent || (platform == "MacIntel" && max_touch_points > 1) {
            Self::Ios
        } else {
            Self::Other
        }
    }
}

/// Vertical scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A section's position: `top` relative to the viewport (bounding rect) and
/// `offset_top` relative to the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBox {
    pub top: f64,
    pub height: f64,
    pub offset_top: f64,
}

impl SectionBox {
    /// Bottom edge relative to the viewport.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Geometry of the landing page at the moment of a scroll tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectionLayout {
    pub viewport_height: f64,
    pub document_height: f64,
    pub hero: Option<SectionBox>,
    pub tagline: Option<SectionBox>,
    pub crafted: Option<SectionBox>,
    pub reviews: Option<SectionBox>,
}

/// Where a snap goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTarget {
    /// Bottom of the document (past the reviews).
    PageBottom,
    /// Top of the customer reviews section.
    Reviews,
    /// Top of the "crafted for you" heading.
    Crafted,
    /// Top of the tagline section, just below the hero.
    Tagline,
}

/// A programmatic smooth scroll to `top` (document px).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapCommand {
    pub target: SnapTarget,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct TouchState {
    active: bool,
    start_y: f64,
    start_time: Millis,
    direction: Option<Direction>,
    velocity: f64,
}

/// Section-snapping state machine for the landing page.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollOrchestrator {
    config: SnapConfig,
    device: Device,
    attached: bool,
    last_scroll_y: f64,
    is_scrolling: bool,
    snap_lock: Timer,
    wheel_active: bool,
    wheel_idle: Timer,
    touch: TouchState,
    touch_settle: Timer,
}

impl ScrollOrchestrator {
    /// Create a detached orchestrator.
    #[must_use]
    pub fn new(config: SnapConfig, device: Device) -> Self {
        Self {
            config,
            device,
            attached: false,
            last_scroll_y: 0.0,
            is_scrolling: false,
            snap_lock: Timer::idle(),
            wheel_active: false,
            wheel_idle: Timer::idle(),
            touch: TouchState::default(),
            touch_settle: Timer::idle(),
        }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &SnapConfig {
        &self.config
    }

    /// Whether event handling is active (the landing page is showing).
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether a snap animation is in progress.
    #[must_use]
    pub const fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Start handling events.
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Stop handling events and cancel every pending timer.
    pub fn detach(&mut self) {
        self.attached = false;
        self.wheel_idle.cancel();
        self.touch_settle.cancel();
        self.snap_lock.cancel();
        self.wheel_active = false;
        self.touch = TouchState::default();
        self.is_scrolling = false;
    }

    /// Fire due timers.
    pub fn tick(&mut self, now: Millis) {
        if self.wheel_idle.fire_if_due(now) {
            self.wheel_active = false;
        }
        if self.touch_settle.fire_if_due(now) {
            self.touch = TouchState::default();
        }
        if self.snap_lock.fire_if_due(now) {
            self.is_scrolling = false;
        }
    }

    /// A wheel event: scroll intent until the wheel goes idle.
    pub fn on_wheel(&mut self, now: Millis) {
        if !self.attached {
            return;
        }
        self.tick(now);
        self.wheel_active = true;
        self.wheel_idle.schedule(now, self.config.wheel_idle);
    }

    /// A finger touched down at viewport `y`.
    pub fn on_touch_start(&mut self, now: Millis, y: f64) {
        if !self.attached {
            return;
        }
        self.tick(now);
        self.touch_settle.cancel();
        self.touch = TouchState {
            active: true,
            start_y: y,
            start_time: now,
            direction: None,
            velocity: 0.0,
        };
    }

    /// The finger moved to viewport `y`.
    pub fn on_touch_move(&mut self, now: Millis, y: f64) {
        if !self.attached {
            return;
        }
        self.tick(now);
        if !self.touch.active {
            return;
        }

        // Finger moving up scrolls the content down.
        let delta = self.touch.start_y - y;
        let elapsed = now.since(self.touch.start_time);
        if elapsed > 0 {
            #[allow(clippy::cast_precision_loss)] // elapsed ms never approaches 2^52
            let elapsed = elapsed as f64;
            self.touch.velocity = delta.abs() / elapsed;
        }
        if delta.abs() > self.config.touch_direction_threshold {
            self.touch.direction = Some(if delta > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            });
        }
    }

    /// The finger lifted (or the touch was cancelled).
    pub fn on_touch_end(&mut self, now: Millis) {
        if !self.attached {
            return;
        }
        self.tick(now);
        let settle = match self.device {
            Device::Ios => self.config.touch_settle_ios,
            Device::Other => self.config.touch_settle,
        };
        self.touch_settle.schedule(now, settle);
    }

    /// The document scrolled to `scroll_y`. Returns a snap to apply, if any.
    pub fn on_scroll(
        &mut self,
        now: Millis,
        scroll_y: f64,
        layout: &SectionLayout,
    ) -> Option<SnapCommand> {
        if !self.attached {
            return None;
        }
        self.tick(now);
        if self.is_scrolling {
            return None;
        }

        let direction = if scroll_y > self.last_scroll_y {
            Direction::Down
        } else {
            Direction::Up
        };
        self.last_scroll_y = scroll_y;

        if !self.has_downward_intent(direction) {
            return None;
        }

        let command = self.pick_target(layout)?;
        self.begin_snap(now);
        Some(command)
    }

    fn has_downward_intent(&self, direction: Direction) -> bool {
        let wheel = self.wheel_active && direction == Direction::Down;
        let touch = self.touch.active
            && self.touch.direction == Some(Direction::Down)
            && (self.device != Device::Ios || self.touch.velocity > self.config.ios_min_velocity);
        wheel || touch
    }

    fn pick_target(&self, layout: &SectionLayout) -> Option<SnapCommand> {
        let vh = layout.viewport_height;
        let upper = vh * self.config.upper_threshold;
        let lower = vh * self.config.lower_threshold;
        let visible = |section: &SectionBox| section.top > 0.0 && section.top < vh;
        let below_header = |section: &SectionBox| section.offset_top - self.config.header_height;

        if let Some(reviews) = layout.reviews.as_ref().filter(|r| visible(r)) {
            if reviews.top < upper {
                return Some(SnapCommand {
                    target: SnapTarget::PageBottom,
                    top: layout.document_height,
                });
            }
            if reviews.top > lower {
                return Some(SnapCommand {
                    target: SnapTarget::Reviews,
                    top: below_header(reviews),
                });
            }
        }

        if let Some(crafted) = layout.crafted.as_ref().filter(|c| visible(c)) {
            if crafted.top < upper
                && let Some(reviews) = layout.reviews.as_ref()
            {
                return Some(SnapCommand {
                    target: SnapTarget::Reviews,
                    top: below_header(reviews),
                });
            }
            if crafted.top > lower {
                return Some(SnapCommand {
                    target: SnapTarget::Crafted,
                    top: below_header(crafted),
                });
            }
        }

        if let (Some(hero), Some(tagline)) = (layout.hero.as_ref(), layout.tagline.as_ref())
            && hero.top < 0.0
            && hero.height > 0.0
            && visible_height(hero, vh) / hero.height >= self.config.hero_visible_fraction
        {
            return Some(SnapCommand {
                target: SnapTarget::Tagline,
                top: below_header(tagline),
            });
        }

        None
    }

    fn begin_snap(&mut self, now: Millis) {
        self.is_scrolling = true;
        self.snap_lock.schedule(now, self.config.snap_lock);
        if self.device == Device::Ios {
            self.touch.active = false;
            self.touch_settle.cancel();
        }
    }
}

/// Visible height of a section within a viewport of height `vh`.
fn visible_height(section: &SectionBox, vh: f64) -> f64 {
    let top = section.top;
    let bottom = section.bottom();
    if top >= 0.0 && bottom <= vh {
        section.height
    } else if top < 0.0 && bottom > 0.0 {
        bottom.min(vh)
    } else if top < vh && bottom > vh {
        vh - top
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const VH: f64 = 1000.0;

    fn orchestrator(device: Device) -> ScrollOrchestrator {
        let mut o = ScrollOrchestrator::new(SnapConfig::default(), device);
        o.attach();
        o
    }

    /// Layout with the hero scrolled `scrolled` px past the top and the
    /// lower sections far below the fold.
    fn hero_layout(scrolled: f64) -> SectionLayout {
        SectionLayout {
            viewport_height: VH,
            document_height: 6000.0,
            hero: Some(SectionBox {
                top: -scrolled,
                height: 975.0,
                offset_top: 0.0,
            }),
            tagline: Some(SectionBox {
                top: 975.0 - scrolled,
                height: 200.0,
                offset_top: 975.0,
            }),
            crafted: Some(SectionBox {
                top: 2500.0 - scrolled,
                height: 150.0,
                offset_top: 2500.0,
            }),
            reviews: Some(SectionBox {
                top: 4000.0 - scrolled,
                height: 900.0,
                offset_top: 4000.0,
            }),
        }
    }

    fn with_reviews_top(top: f64) -> SectionLayout {
        SectionLayout {
            reviews: Some(SectionBox {
                top,
                height: 900.0,
                offset_top: 4000.0,
            }),
            ..hero_layout(3000.0)
        }
    }

    #[test]
    fn test_wheel_down_snaps_hero_to_tagline() {
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        let snap = o.on_scroll(Millis(10), 100.0, &hero_layout(100.0)).unwrap();

        assert_eq!(snap.target, SnapTarget::Tagline);
        assert!((snap.top - 919.0).abs() < f64::EPSILON);
        assert!(o.is_scrolling());
    }

    #[test]
    fn test_hero_needs_half_visible() {
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        // 600 of 975 px scrolled past: under half visible
        assert!(o.on_scroll(Millis(10), 600.0, &hero_layout(600.0)).is_none());
    }

    #[test]
    fn test_never_snaps_upward() {
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        assert!(o.on_scroll(Millis(10), 300.0, &hero_layout(300.0)).is_some());

        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        o.last_scroll_y = 400.0;
        assert!(o.on_scroll(Millis(10), 300.0, &hero_layout(300.0)).is_none());
    }

    #[test]
    fn test_no_intent_no_snap() {
        let mut o = orchestrator(Device::Other);
        assert!(o.on_scroll(Millis(10), 100.0, &hero_layout(100.0)).is_none());
    }

    #[test]
    fn test_wheel_intent_expires_after_idle() {
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        assert!(o.on_scroll(Millis(150), 100.0, &hero_layout(100.0)).is_none());
    }

    #[test]
    fn test_reviews_thresholds() {
        // Above 25%: snap past reviews to the bottom
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        let snap = o.on_scroll(Millis(1), 10.0, &with_reviews_top(200.0)).unwrap();
        assert_eq!(snap.target, SnapTarget::PageBottom);
        assert!((snap.top - 6000.0).abs() < f64::EPSILON);

        // Below 35%: snap to the reviews section
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        let snap = o.on_scroll(Millis(1), 10.0, &with_reviews_top(500.0)).unwrap();
        assert_eq!(snap.target, SnapTarget::Reviews);
        assert!((snap.top - 3944.0).abs() < f64::EPSILON);

        // Between the thresholds: no reviews snap
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        assert!(o.on_scroll(Millis(1), 10.0, &with_reviews_top(300.0)).is_none());
    }

    #[test]
    fn test_crafted_thresholds() {
        let crafted_at = |top: f64| SectionLayout {
            crafted: Some(SectionBox {
                top,
                height: 150.0,
                offset_top: 2500.0,
            }),
            ..hero_layout(2000.0)
        };

        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        let snap = o.on_scroll(Millis(1), 10.0, &crafted_at(100.0)).unwrap();
        assert_eq!(snap.target, SnapTarget::Reviews);

        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        let snap = o.on_scroll(Millis(1), 10.0, &crafted_at(700.0)).unwrap();
        assert_eq!(snap.target, SnapTarget::Crafted);
        assert!((snap.top - 2444.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reviews_take_priority_over_hero() {
        let layout = SectionLayout {
            reviews: Some(SectionBox {
                top: 600.0,
                height: 900.0,
                offset_top: 4000.0,
            }),
            ..hero_layout(100.0)
        };
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        let snap = o.on_scroll(Millis(1), 100.0, &layout).unwrap();
        assert_eq!(snap.target, SnapTarget::Reviews);
    }

    #[test]
    fn test_reentrancy_guard_for_snap_duration() {
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        assert!(o.on_scroll(Millis(10), 100.0, &hero_layout(100.0)).is_some());

        o.on_wheel(Millis(500));
        assert!(o.on_scroll(Millis(600), 200.0, &hero_layout(200.0)).is_none());

        o.on_wheel(Millis(800));
        assert!(o.on_scroll(Millis(810), 300.0, &hero_layout(300.0)).is_some());
    }

    #[test]
    fn test_touch_direction_needs_threshold() {
        let mut o = orchestrator(Device::Other);
        o.on_touch_start(Millis(0), 500.0);
        o.on_touch_move(Millis(50), 495.0);
        assert!(o.on_scroll(Millis(60), 100.0, &hero_layout(100.0)).is_none());

        o.on_touch_move(Millis(70), 480.0);
        assert!(o.on_scroll(Millis(80), 120.0, &hero_layout(120.0)).is_some());
    }

    #[test]
    fn test_ios_filters_slow_touch() {
        // 20 px over 400 ms = 0.05 px/ms: momentum, ignored on iOS
        let mut ios = orchestrator(Device::Ios);
        ios.on_touch_start(Millis(0), 500.0);
        ios.on_touch_move(Millis(400), 480.0);
        assert!(ios.on_scroll(Millis(410), 100.0, &hero_layout(100.0)).is_none());

        let mut other = orchestrator(Device::Other);
        other.on_touch_start(Millis(0), 500.0);
        other.on_touch_move(Millis(400), 480.0);
        assert!(other.on_scroll(Millis(410), 100.0, &hero_layout(100.0)).is_some());

        // 60 px over 100 ms = 0.6 px/ms
        let mut ios = orchestrator(Device::Ios);
        ios.on_touch_start(Millis(0), 500.0);
        ios.on_touch_move(Millis(100), 440.0);
        assert!(ios.on_scroll(Millis(110), 100.0, &hero_layout(100.0)).is_some());
    }

    #[test]
    fn test_touch_settle_is_longer_on_ios() {
        let mut other = orchestrator(Device::Other);
        other.on_touch_start(Millis(0), 500.0);
        other.on_touch_move(Millis(50), 400.0);
        other.on_touch_end(Millis(60));
        assert!(other.on_scroll(Millis(400), 100.0, &hero_layout(100.0)).is_none());

        let mut ios = orchestrator(Device::Ios);
        ios.on_touch_start(Millis(0), 500.0);
        ios.on_touch_move(Millis(50), 400.0);
        ios.on_touch_end(Millis(60));
        assert!(ios.on_scroll(Millis(400), 100.0, &hero_layout(100.0)).is_some());
    }

    #[test]
    fn test_ios_snap_clears_touch_state() {
        let mut ios = orchestrator(Device::Ios);
        ios.on_touch_start(Millis(0), 500.0);
        ios.on_touch_move(Millis(50), 400.0);
        assert!(ios.on_scroll(Millis(60), 100.0, &hero_layout(100.0)).is_some());
        // Lock expired, but the gesture that caused the snap no longer counts
        assert!(ios.on_scroll(Millis(900), 200.0, &hero_layout(200.0)).is_none());
    }

    #[test]
    fn test_detach_ignores_events_and_cancels_timers() {
        let mut o = orchestrator(Device::Other);
        o.on_wheel(Millis(0));
        o.detach();
        assert!(!o.is_attached());
        assert!(!o.wheel_idle.is_pending());
        assert!(o.on_scroll(Millis(10), 100.0, &hero_layout(100.0)).is_none());

        o.attach();
        assert!(o.on_scroll(Millis(20), 150.0, &hero_layout(150.0)).is_none());
    }

    #[test]
    fn test_device_detection() {
        assert_eq!(
            Device::from_user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)", "iPhone", 5),
            Device::Ios
        );
        assert_eq!(Device::from_user_agent("Mozilla/5.0 (Macintosh)", "MacIntel", 5), Device::Ios);
        assert_eq!(Device::from_user_agent("Mozilla/5.0 (Macintosh)", "MacIntel", 0), Device::Other);
        assert_eq!(Device::from_user_agent("Mozilla/5.0 (X11; Linux)", "Linux x86_64", 0), Device::Other);
    }
}
