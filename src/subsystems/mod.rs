//! # Aircraft subsystems
//!
//! The flight platform is organized in logical subsystems and this crate mirrors
//! the two it actually drives: telemetry (position pushes from the flight
//! controller) and mission control (the waypoint mission operator). Each subsystem
//! is available as a public field of the [Aircraft](crate::Aircraft) struct.

pub mod mission_control;
pub mod telemetry;
