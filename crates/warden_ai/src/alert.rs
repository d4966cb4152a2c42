//! Sound alert bus
//!
//! Sound-producing systems publish `(position, radius, volume)`; every
//! subscribed listener whose path distance to the sound is inside the
//! radius hears it, attenuated linearly with that distance.
//!
//! Listeners are owned explicitly by whoever constructs the bus and are
//! only ever appended. Delivery may happen while a pursuer is in the middle
//! of its own tick, so [`AgentEar`] only latches the alert; the pursuer
//! reads it at the start of its next tick.

use crate::config::PursuitConfig;
use crate::suspicion::SuspicionMeter;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use warden_math::{map_clamped, Vec3};
use warden_nav::NavigationPort;

/// Something that can hear published sounds
pub trait SoundListener: Send + Sync {
    /// Where the listener currently stands
    fn listener_position(&self) -> Vec3;

    /// Receive an already attenuated sound
    fn listen(&self, position: Vec3, volume: f32);
}

/// Volume heard at `distance` from a sound of `volume` reaching `radius`
pub fn attenuate(distance: f32, radius: f32, volume: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    volume * map_clamped(distance, 0.0, radius, 1.0, 0.0)
}

/// Publish/subscribe hub for sound alerts
#[derive(Default)]
pub struct AlertAggregator {
    listeners: RwLock<Vec<Arc<dyn SoundListener>>>,
}

impl AlertAggregator {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe(&self, listener: Arc<dyn SoundListener>) {
        self.listeners.write().push(listener);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Announce a sound; returns how many listeners heard it
    pub fn publish(
        &self,
        nav: &dyn NavigationPort,
        position: Vec3,
        radius: f32,
        volume: f32,
    ) -> usize {
        // Snapshot so listeners may subscribe from inside `listen`
        let listeners: Vec<Arc<dyn SoundListener>> = self.listeners.read().clone();

        let mut delivered = 0;
        for listener in listeners {
            let Some(distance) = nav.path_length(listener.listener_position(), position) else {
                continue;
            };

            let heard = attenuate(distance, radius, volume);
            if heard > 0.0 {
                listener.listen(position, heard);
                delivered += 1;
            }
        }

        log::trace!(
            "Sound at {:?} (radius {}, volume {}) heard by {} listener(s)",
            position,
            radius,
            volume,
            delivered
        );
        delivered
    }
}

#[derive(Debug)]
struct EarState {
    meter: SuspicionMeter,
    pending: Option<Vec3>,
    position: Vec3,
}

/// A pursuer's hearing, shared between the pursuer and the alert bus
#[derive(Debug)]
pub struct AgentEar {
    state: Mutex<EarState>,
}

impl AgentEar {
    /// Create an ear with an empty meter
    pub fn new(meter: SuspicionMeter, position: Vec3) -> Self {
        Self {
            state: Mutex::new(EarState {
                meter,
                pending: None,
                position,
            }),
        }
    }

    /// Create an ear tuned by `config`
    pub fn from_config(config: &PursuitConfig, position: Vec3) -> Self {
        Self::new(SuspicionMeter::from_config(config), position)
    }

    /// Current suspicion level
    pub fn suspicion(&self) -> f32 {
        self.state.lock().meter.level()
    }

    /// Snapshot of the meter
    pub fn meter(&self) -> SuspicionMeter {
        self.state.lock().meter
    }

    /// Whether an alert is waiting to be consumed
    pub fn has_pending_alert(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// Update the position used for distance attenuation
    pub fn sync_position(&self, position: Vec3) {
        self.state.lock().position = position;
    }

    /// Decay the meter
    pub fn tick(&self, delta_time: f32) {
        self.state.lock().meter.tick(delta_time);
    }

    /// Consume the latched alert position
    pub fn take_alert(&self) -> Option<Vec3> {
        self.state.lock().pending.take()
    }

    /// Empty the meter and drop any latched alert
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.meter.reset();
        state.pending = None;
    }
}

impl SoundListener for AgentEar {
    fn listener_position(&self) -> Vec3 {
        self.state.lock().position
    }

    fn listen(&self, position: Vec3, volume: f32) {
        let mut state = self.state.lock();
        if state.meter.on_listen(volume) {
            log::debug!("Suspicion tripped by sound at {:?}", position);
            state.pending = Some(position);
        }
    }
}
