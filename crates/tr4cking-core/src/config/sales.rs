//! Ticketing and invoicing settings.

use serde::{Deserialize, Serialize};

/// Settings for seat provisioning and sales reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesConfig {
    /// Seat kind given to seats created alongside a new bus
    /// (`semi_sleeper`, `sleeper` or `executive`).
    #[serde(default = "default_seat_kind")]
    pub default_seat_kind: String,
    /// Number of trailing days counted by the dashboard.
    #[serde(default = "default_window")]
    pub dashboard_window_days: u32,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            default_seat_kind: default_seat_kind(),
            dashboard_window_days: default_window(),
        }
    }
}

fn default_seat_kind() -> String {
    "semi_sleeper".to_string()
}

fn default_window() -> u32 {
    30
}
