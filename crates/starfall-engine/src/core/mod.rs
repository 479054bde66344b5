pub mod actions;
pub mod convert;
#[cfg(feature = "physics")]
pub mod physics;
pub mod time;
