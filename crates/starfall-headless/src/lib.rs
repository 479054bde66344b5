//! Frame driver for Starfall.
//!
//! The simulation core knows nothing about windows or clocks. `GameRunner`
//! owns the fixed-step accumulator and input queue and calls into a `Game`
//! once per frame; the `starfall` binary uses it to play stages headlessly.

pub mod runner;

pub use runner::GameRunner;
