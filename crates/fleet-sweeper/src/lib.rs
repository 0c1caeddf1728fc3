//! Background worker that periodically sweeps the board and releases
//! students whose Pirate Ship window has elapsed.

use fleet_engine::BoardEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawn the auto-release loop. The first sweep runs immediately, then one
/// per `every`. The handle can be aborted on shutdown; the loop itself
/// never exits on its own.
pub fn spawn_auto_release(engine: Arc<BoardEngine>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let released = engine.sweep().await;
            if released > 0 {
                tracing::info!(released, "auto-release sweep freed students");
            } else {
                tracing::debug!("auto-release sweep: nothing due");
            }
        }
    })
}
