//! Cruise Control Simulation Library
//!
//! Adaptive cruise control and lane change advisory engine for a three lane
//! road, runnable headless from the bundled binary.

pub mod simulation;
