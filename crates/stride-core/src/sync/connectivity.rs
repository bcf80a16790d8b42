//! Connectivity monitor: turns platform reachability signals into engine state.
//!
//! The platform side publishes its current reachability on a watch channel;
//! the monitor forwards transitions to the engine and fires a drain on every
//! became-online edge without waiting for it. An optional coarse periodic
//! re-check guards against missed transition events.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::IdentityProvider;

use super::engine::SyncEngine;
use super::remote::RemoteBackend;

/// Default interval for the supplementary periodic re-check
pub const DEFAULT_RECHECK_INTERVAL: Duration = Duration::from_secs(30);

pub struct ConnectivityMonitor;

impl ConnectivityMonitor {
    /// Start watching the reachability signal on a background task.
    ///
    /// The task ends when the signal sender is dropped.
    pub fn spawn<B, I>(
        engine: SyncEngine<B, I>,
        mut signal: watch::Receiver<bool>,
        recheck: Option<Duration>,
    ) -> JoinHandle<()>
    where
        B: RemoteBackend + 'static,
        I: IdentityProvider + 'static,
    {
        tokio::spawn(async move {
            Self::apply(&engine, *signal.borrow_and_update());

            let mut timer = recheck.map(tokio::time::interval);
            loop {
                if let Some(timer) = &mut timer {
                    tokio::select! {
                        changed = signal.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            Self::apply(&engine, *signal.borrow_and_update());
                        }
                        _ = timer.tick() => {
                            if engine.is_online() {
                                engine.trigger_drain();
                            }
                        }
                    }
                } else {
                    if signal.changed().await.is_err() {
                        break;
                    }
                    Self::apply(&engine, *signal.borrow_and_update());
                }
            }
        })
    }

    fn apply<B, I>(engine: &SyncEngine<B, I>, online: bool)
    where
        B: RemoteBackend + 'static,
        I: IdentityProvider + 'static,
    {
        if online {
            tracing::debug!("Connectivity restored; requesting drain");
            engine.notify_online();
        } else {
            tracing::debug!("Connectivity lost");
            engine.notify_offline();
        }
    }
}
