//! Background polling: report refresh, notice refresh, rotation.
//!
//! A failed cycle is logged and retried on the next tick; the loops
//! never propagate refresh errors. Each loop also exits on Ctrl+C so
//! shutdown does not leave a cycle mid-flight.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::app_state::AppState;

/// Spawns the polling loops for one desk instance.
pub fn spawn(state: AppState) {
    tokio::spawn(traffic_loop(state.clone()));
    tokio::spawn(notice_loop(state.clone()));
    if let Some(every) = state.rotation.interval() {
        tokio::spawn(rotation_loop(state, every));
    } else {
        info!("rotation driven by an external host timer");
    }
}

async fn traffic_loop(state: AppState) {
    loop {
        let result = state.desk.lock().await.refresh_traffic_reports().await;
        match result {
            Ok(changed) => debug!(changed, "traffic poll cycle finished"),
            Err(err) => warn!(?err, "traffic poll cycle failed"),
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("traffic poll loop stopped");
                return;
            }
            _ = tokio::time::sleep(state.host.refresh_every) => {}
        }
    }
}

async fn notice_loop(state: AppState) {
    loop {
        let result = state.desk.lock().await.refresh_important_notices().await;
        match result {
            Ok(changed) => debug!(changed, "notice poll cycle finished"),
            Err(err) => warn!(?err, "notice poll cycle failed"),
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("notice poll loop stopped");
                return;
            }
            _ = tokio::time::sleep(state.host.notice_refresh_every) => {}
        }
    }
}

async fn rotation_loop(state: AppState, every: Duration) {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("rotation loop stopped");
                return;
            }
            _ = tokio::time::sleep(every) => {}
        }

        let position = state.desk.lock().await.rotate_to_next();
        debug!(position, "rotation advanced");
    }
}
