//! Week state: the day table, unlock scheduling, the persisted progress
//! record, and the session that ties them to the mounted mini-game.
//!
//! Everything here is plain Rust with the clock passed in, so the whole
//! state machine runs under native `cargo test`. `lib.rs` owns the single
//! `App` instance for the lifetime of the Web Worker.

pub mod app;
pub mod days;
pub mod progress;
pub mod schedule;
pub mod store;
pub mod timers;
