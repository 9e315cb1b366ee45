//! Auto-advancing carousels (photo strip, about-page timeline, hero video).

use std::time::Duration;

use crate::timer::{Millis, Timer};

/// Autoplay interval of the home page photo carousel.
pub const PHOTO_CAROUSEL_INTERVAL: Duration = Duration::from_secs(3);

/// Autoplay interval of the about page timeline.
pub const TIMELINE_INTERVAL: Duration = Duration::from_secs(4);

/// How long the timeline stays paused after a manual selection.
pub const TIMELINE_RESUME_DELAY: Duration = Duration::from_secs(2);

/// Autoplay interval of the about page hero video rotation.
pub const HERO_VIDEO_INTERVAL: Duration = Duration::from_secs(8);

/// A looping carousel with optional autoplay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
    interval: Duration,
    resume_delay: Option<Duration>,
    paused: bool,
    advance: Timer,
    resume: Timer,
}

impl Carousel {
    /// Create a carousel of `len` slides that advances every `interval`.
    #[must_use]
    pub const fn new(len: usize, interval: Duration) -> Self {
        Self {
            len,
            index: 0,
            interval,
            resume_delay: None,
            paused: false,
            advance: Timer::idle(),
            resume: Timer::idle(),
        }
    }

    /// Resume autoplay this long after a manual [`select`](Self::select).
    #[must_use]
    pub const fn with_resume_delay(mut self, delay: Duration) -> Self {
        self.resume_delay = Some(delay);
        self
    }

    /// Current slide index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of slides.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no slides.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Autoplay interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether autoplay is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Start autoplay (the component mounted).
    pub fn start(&mut self, now: Millis) {
        if self.len > 1 && !self.paused {
            self.advance.schedule(now, self.interval);
        }
    }

    /// Stop autoplay and drop every pending timer (the component unmounted).
    pub fn stop(&mut self) {
        self.advance.cancel();
        self.resume.cancel();
    }

    /// Pause autoplay (pointer entered).
    pub fn pause(&mut self) {
        self.paused = true;
        self.advance.cancel();
    }

    /// Resume autoplay (pointer left).
    pub fn resume(&mut self, now: Millis) {
        self.paused = false;
        self.resume.cancel();
        self.start(now);
    }

    /// Advance to the next slide, wrapping around.
    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// Go back one slide, wrapping around.
    pub fn previous(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Jump to a slide. Pauses autoplay and, if a resume delay is set,
    /// schedules autoplay to resume.
    pub fn select(&mut self, index: usize, now: Millis) {
        if index >= self.len {
            return;
        }
        self.index = index;
        self.pause();
        if let Some(delay) = self.resume_delay {
            self.resume.schedule(now, delay);
        }
    }

    /// Fire due timers. Returns `true` when the slide changed.
    pub fn tick(&mut self, now: Millis) -> bool {
        if self.resume.fire_if_due(now) {
            self.paused = false;
            self.start(now);
        }
        if self.advance.fire_if_due(now) {
            self.next();
            self.advance.schedule(now, self.interval);
            return true;
        }
        false
    }
}
