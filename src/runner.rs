//! Fixed-period driver
//!
//! A [`Session`] is the only owner of the [`World`]. Key events arrive on an
//! mpsc queue and are drained once per tick, before the tick runs, so input
//! mapping and simulation never touch the world at the same time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{Notify, mpsc};

use crate::sim::{EntityKind, KeyEvent, RenderSurface, SimEvent, World, apply_key_event};

/// Queue capacity for pending key events
pub const INPUT_CHANNEL_CAPACITY: usize = 1024;

/// Create the input queue a [`Session`] drains
pub fn input_channel() -> (mpsc::Sender<KeyEvent>, mpsc::Receiver<KeyEvent>) {
    mpsc::channel(INPUT_CHANNEL_CAPACITY)
}

/// Why [`Session::run`] stopped ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    InputClosed,
    TickBudget,
    Shutdown,
}

pub struct Session<S: RenderSurface> {
    world: World<S>,
    input_rx: mpsc::Receiver<KeyEvent>,
}

impl<S: RenderSurface> Session<S> {
    pub fn new(world: World<S>, input_rx: mpsc::Receiver<KeyEvent>) -> Self {
        Self { world, input_rx }
    }

    pub fn world(&self) -> &World<S> {
        &self.world
    }

    /// Drain pending input in arrival order, then tick once.
    ///
    /// Returns `None` without ticking once every sender is gone and the
    /// queue is empty.
    pub fn step(&mut self) -> Option<Vec<SimEvent>> {
        loop {
            match self.input_rx.try_recv() {
                Ok(event) => {
                    log::debug!("input {:?} {:?}", event.action, event.key);
                    apply_key_event(&mut self.world, event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return None,
            }
        }

        let events = self.world.tick();
        for event in &events {
            log::debug!("tick {}: {event:?}", self.world.time_ticks());
        }
        Some(events)
    }

    /// Tick every `interval` until input closes, `max_ticks` is reached or
    /// `shutdown` fires; then hand the world back for teardown.
    pub async fn run(
        mut self,
        interval: Duration,
        max_ticks: Option<u64>,
        shutdown: Arc<Notify>,
    ) -> (World<S>, StopReason) {
        let mut interval = tokio::time::interval(interval);
        let summary_every = self.world.settings().summary_every_ticks;

        let reason = loop {
            if max_ticks.is_some_and(|max| self.world.time_ticks() >= max) {
                break StopReason::TickBudget;
            }

            tokio::select! {
                _ = shutdown.notified() => break StopReason::Shutdown,
                _ = interval.tick() => {
                    if self.step().is_none() {
                        break StopReason::InputClosed;
                    }
                    if self.world.time_ticks() % summary_every == 0 {
                        self.log_summary();
                    }
                }
            }
        };

        log::info!("Stopped after {} ticks ({reason:?})", self.world.time_ticks());
        (self.world, reason)
    }

    fn log_summary(&self) {
        let world = &self.world;
        if let Some(craft) = world.craft() {
            log::info!(
                "t={:.1}s {craft} obstacles={} projectiles={}",
                world.now(),
                world.count(EntityKind::Obstacle),
                world.count(EntityKind::Projectile)
            );
        }
    }
}
