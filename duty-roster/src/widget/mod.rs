/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Duty display widget.
//!
//! [`DutyWidget`] turns a [`SettingsHandle`] and a [`Clock`] into display
//! text.  Once mounted it keeps that text current:
//!
//! ```text
//!   interval tick (every 60 s) ──┐
//!                                ├──►  widget task  ──render()──►  watch<String>  ──►  UI
//!   settings changed()  ─────────┘        (single owner of display state)
//! ```
//!
//! Both triggers land in the one task that owns the widget, so display state
//! is only ever written from a single place.  Unmounting (or dropping the
//! [`MountedWidget`]) stops the task together with its timer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::rotation::render_duty_text;
use crate::settings::SettingsHandle;

/// Default refresh period: often enough to notice the date rolling over.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Source of the current local date-time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;

    /// Current local calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The system wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to.  Clones share the same time.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Clock standing at midnight of `day`.
    pub fn at_day(day: NaiveDate) -> Self {
        Self::new(day.and_time(chrono::NaiveTime::MIN))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = now.checked_add_days(Days::new(days)) {
            *now = next;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ── DutyWidget ────────────────────────────────────────────────────────────────

/// Renders the student on duty from live settings.
pub struct DutyWidget<C: Clock> {
    settings: SettingsHandle,
    clock: C,
    refresh_interval: Duration,
}

impl<C: Clock> DutyWidget<C> {
    pub fn new(settings: SettingsHandle, clock: C) -> Self {
        Self {
            settings,
            clock,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }

    /// Override the refresh period.  A zero duration is raised to one
    /// millisecond.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Display text for the clock's current day and the current settings.
    pub fn render(&self) -> String {
        let snapshot = self.settings.snapshot();
        render_duty_text(&snapshot, self.clock.today())
    }

    /// Start refreshing in a background task.
    ///
    /// The returned widget already holds the initial text.  Must be called
    /// from within a tokio runtime.
    pub fn mount(self) -> MountedWidget {
        let (text_tx, text_rx) = watch::channel(self.render());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        info!(
            refresh_ms = self.refresh_interval.as_millis() as u64,
            "Mounting duty widget"
        );
        let task = tokio::spawn(self.run(text_tx, shutdown_rx));

        MountedWidget {
            text: text_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    async fn run(self, text: watch::Sender<String>, mut shutdown: oneshot::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut changes = self.settings.subscribe();

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    changes.borrow_and_update();
                }
            }

            let rendered = self.render();
            let updated = text.send_if_modified(|current| {
                if *current == rendered {
                    return false;
                }
                *current = rendered.clone();
                true
            });
            if updated {
                debug!(text = %rendered, "Duty text updated");
            }
        }

        debug!("Duty widget stopped");
    }
}

// ── MountedWidget ─────────────────────────────────────────────────────────────

/// A running [`DutyWidget`].
///
/// Dropping it aborts the refresh task; [`unmount`](Self::unmount) stops it
/// cleanly and waits for it to finish.
#[derive(Debug)]
pub struct MountedWidget {
    text: watch::Receiver<String>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MountedWidget {
    /// The text currently displayed.
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Receiver that wakes whenever the displayed text changes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.text.clone()
    }

    /// Stop refreshing and wait for the widget task to end.
    pub async fn unmount(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        info!("Duty widget unmounted");
    }
}

impl Drop for MountedWidget {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
