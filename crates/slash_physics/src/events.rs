//! Game events (spawns, slices, score, game over)

use crossbeam_channel::{Receiver, Sender};
use slash_mesh::ObjectKind;

use crate::body::BodyHandle;

/// Something the outside world may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A whole body was launched
    Spawned { handle: BodyHandle, kind: ObjectKind },
    /// A body was cut in two
    Sliced {
        original: BodyHandle,
        /// Positive side first
        fragments: [BodyHandle; 2],
        kind: ObjectKind,
        /// Generation of the original
        generation: u32,
    },
    /// A whole body was sliced
    ScoreIncreased { score: u32 },
    /// A whole hazard reached the player; raised once
    GameOver { score: u32, kind: ObjectKind },
}

impl GameEvent {
    pub fn is_game_over(&self) -> bool {
        matches!(self, GameEvent::GameOver { .. })
    }
}

/// Channel fan-out, with a buffer for hosts that poll instead
///
/// Events are buffered only while nobody is subscribed, so a host that reads
/// its receivers never has to drain the buffer as well.
#[derive(Debug, Default)]
pub struct EventHub {
    buffer: Vec<GameEvent>,
    subscribers: Vec<Sender<GameEvent>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `event` to every live subscriber, or buffer it if there are none
    pub fn emit(&mut self, event: GameEvent) {
        // Disconnected receivers are dropped here
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if self.subscribers.is_empty() {
            self.buffer.push(event);
        }
    }

    /// New unbounded receiver for all future events
    pub fn subscribe(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Take the buffered events
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.buffer)
    }

    /// Drop buffered events; subscribers stay
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
