//! Session layer
//!
//! The UI state machine and everything derived from it. Renderers read the
//! model; they never mutate it except through its transition methods.

pub mod controller;
pub mod presentation;
pub mod state;
