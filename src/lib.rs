//! Electric vehicle registration dashboard: data core and view state.
//!
//! The binary (`src/main.rs`) wraps this library in an eframe window; every
//! computation lives here so it can be exercised without a display.

pub mod color;
pub mod config;
pub mod data;
pub mod present;
pub mod state;
