// Public API for integration tests and potential library usage

pub mod api;
pub mod catalog;
pub mod config;
pub mod handoff;
pub mod protocol;
pub mod state;
pub mod types;
pub mod ws;
