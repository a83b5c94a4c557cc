//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, which the `no_std` core crate does not
//! have, so they live here.

use std::time::Duration;

use touch_panel::config::TICK_MS;

/// Loop period, same as the firmware tick. The loop sleeps if a tick completes early.
pub const TICK_TIME: Duration = Duration::from_millis(TICK_MS);

/// Period of the simulated battery discharge/charge cycle.
pub const BATTERY_CYCLE: Duration = Duration::from_secs(60);
