//! Background live-count timer
//!
//! Ticks on a fixed interval and tells the owner of the `MatchBoard` to
//! recompute its live count from the list it already holds. The timer never
//! fetches; refetching is the owner's decision.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::REFRESH_INTERVAL;

/// Shortest period the timer will run at
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Messages sent from the background timer to the owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshMessage {
    /// Time to recompute the live count
    LiveCountTick,
}

/// Configuration for the live-count timer
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between live-count ticks
    pub live_count_interval: Duration,
    /// Whether the timer runs at all
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            live_count_interval: REFRESH_INTERVAL,
            enabled: true,
        }
    }
}

/// Handle for controlling the background timer
pub struct RefreshHandle {
    /// Channel for receiving refresh messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Creates a new RefreshHandle and spawns the timer task
    ///
    /// Must be called from within a tokio runtime. The first (immediate) tick
    /// is skipped, so the first message arrives one interval after spawning.
    pub fn spawn(config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            let period = config.live_count_interval.max(MIN_INTERVAL);

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            debug!("Live-count tick");
                            if msg_tx.send(RefreshMessage::LiveCountTick).await.is_err() {
                                break;
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Waits for the next message; `None` once the timer has stopped
    pub async fn recv(&mut self) -> Option<RefreshMessage> {
        self.receiver.recv().await
    }

    /// Shuts down the timer task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Checks for pending refresh messages without blocking
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_config_default() {
        let config = RefreshConfig::default();
        assert_eq!(config.live_count_interval, Duration::from_secs(60));
        assert!(config.enabled);
    }

    #[tokio::test]
    async fn test_refresh_handle_spawn_disabled() {
        let config = RefreshConfig {
            enabled: false,
            ..Default::default()
        };

        let mut handle = RefreshHandle::spawn(config);

        assert!(try_recv(&mut handle).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_after_each_interval() {
        let mut handle = RefreshHandle::spawn(RefreshConfig::default());

        assert!(try_recv(&mut handle).is_none(), "first tick is skipped");

        let first = handle.recv().await;
        let second = handle.recv().await;

        assert_eq!(first, Some(RefreshMessage::LiveCountTick));
        assert_eq!(second, Some(RefreshMessage::LiveCountTick));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let handle = RefreshHandle::spawn(RefreshConfig::default());
        let RefreshHandle {
            mut receiver,
            shutdown_tx,
        } = handle;

        shutdown_tx.send(()).await.expect("timer task is running");

        assert_eq!(receiver.recv().await, None, "channel closes after shutdown");
    }
}
