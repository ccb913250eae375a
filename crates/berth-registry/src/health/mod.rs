//! Client health classification
//!
//! The retry controller reports exactly one terminal outcome per logical
//! fetch. Consecutive failures drive a coarse status: 0 is healthy, 1-2 is
//! degraded, 3 or more is unhealthy. Any success resets the counter,
//! regardless of which key succeeded.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Health status derived from recent consecutive failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Client is fully operational
    Healthy,
    /// Client is operational but recent fetches have failed
    Degraded,
    /// Client has not completed a fetch in several attempts
    Unhealthy,
}

const UNHEALTHY_THRESHOLD: u32 = 3;

impl HealthStatus {
    fn from_failures(consecutive_failures: u32) -> Self {
        match consecutive_failures {
            0 => Self::Healthy,
            n if n < UNHEALTHY_THRESHOLD => Self::Degraded,
            _ => Self::Unhealthy,
        }
    }
}

#[derive(Debug, Default)]
struct HealthState {
    consecutive_failures: u32,
    last_success_at: Option<DateTime<Utc>>,
    last_failure_at: Option<DateTime<Utc>>,
}

/// Snapshot of client health for the diagnostics surface
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub consecutive_failures: u32,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,
}

/// Observes terminal fetch outcomes and classifies client health
#[derive(Debug, Default)]
pub struct HealthMonitor {
    state: RwLock<HealthState>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful terminal fetch outcome
    pub fn record_success(&self) {
        let mut state = self.state.write();
        state.consecutive_failures = 0;
        state.last_success_at = Some(Utc::now());
    }

    /// Record one failed terminal fetch outcome
    pub fn record_failure(&self) {
        let mut state = self.state.write();
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);
        state.last_failure_at = Some(Utc::now());
    }

    /// Pure read of current health; performs no I/O
    pub fn report(&self) -> HealthReport {
        let state = self.state.read();
        HealthReport {
            status: HealthStatus::from_failures(state.consecutive_failures),
            consecutive_failures: state.consecutive_failures,
            last_success_at: state.last_success_at,
            last_failure_at: state.last_failure_at,
        }
    }
}
