//! SDU terminal front end.
//!
//! The binary in `main.rs` owns the terminal; the modules here are exposed so
//! state transitions and key handling can be exercised from integration tests.

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;
pub mod worker;
