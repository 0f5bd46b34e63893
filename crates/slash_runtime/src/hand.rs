//! Scripted hand input
//!
//! Stands in for the tracking subsystem: a thread publishes normalized hand
//! coordinates into the world's `HandFeed` at its own rate until told to stop.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use serde::{Deserialize, Serialize};
use slash_physics::{HandFeed, HandInput, Vec2};

/// Hand estimates per second
pub const HAND_RATE_HZ: u32 = 30;

/// Scripted hand motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandScript {
    /// Lissajous sweep across the whole mapped area
    FigureEight,
    /// Steady loop around the centre
    Circle,
    /// No input; nothing gets cut
    Idle,
}

impl HandScript {
    /// Normalized position `t` seconds into the script
    pub fn sample(self, t: f32) -> Option<Vec2> {
        match self {
            HandScript::FigureEight => Some(Vec2::new(
                0.5 + 0.45 * (t * 1.3).sin(),
                0.5 + 0.45 * (t * 2.6).sin(),
            )),
            HandScript::Circle => Some(Vec2::new(0.5 + 0.3 * (t * 2.0).cos(), 0.5 + 0.3 * (t * 2.0).sin())),
            HandScript::Idle => None,
        }
    }
}

/// Running hand thread; stops when dropped or on [`HandThread::stop`]
pub struct HandThread {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl HandThread {
    pub fn spawn(script: HandScript, feed: HandFeed) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let handle = thread::Builder::new()
            .name("slash-hand".into())
            .spawn(move || run(script, feed, stop_rx))?;
        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop publishing and return how many estimates were sent
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        // Disconnecting the channel wakes the thread
        self.stop.take();
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(published)) => published,
            Some(Err(_)) => {
                log::error!("hand thread panicked");
                0
            }
            None => 0,
        }
    }
}

impl Drop for HandThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(script: HandScript, feed: HandFeed, stop: Receiver<()>) -> u64 {
    let period = Duration::from_secs_f32(1.0 / HAND_RATE_HZ as f32);
    let start = Instant::now();
    let mut published = 0;
    log::debug!("hand thread started ({script:?})");

    loop {
        match stop.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        if let Some(position) = script.sample(start.elapsed().as_secs_f32()) {
            feed.publish(HandInput::Normalized(position));
            published += 1;
        }
    }

    log::debug!("hand thread stopped after {published} estimates");
    published
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_stay_in_unit_square() {
        for script in [HandScript::FigureEight, HandScript::Circle] {
            for i in 0..500 {
                let p = script.sample(i as f32 * 0.05).unwrap();
                assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y), "{script:?} {p:?}");
            }
        }
        assert!(HandScript::Idle.sample(1.0).is_none());
    }

    #[test]
    fn test_thread_publishes_and_stops() {
        let feed = HandFeed::new();
        let hand = HandThread::spawn(HandScript::Circle, feed.clone()).unwrap();
        thread::sleep(Duration::from_millis(200));
        let published = hand.stop();

        assert!(published > 0);
        assert_eq!(feed.sequence(), published);
        assert!(matches!(feed.take_latest(), Some((_, HandInput::Normalized(_)))));
    }

    #[test]
    fn test_idle_publishes_nothing() {
        let feed = HandFeed::new();
        let hand = HandThread::spawn(HandScript::Idle, feed.clone()).unwrap();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(hand.stop(), 0);
        assert_eq!(feed.sequence(), 0);
    }
}
