//! End-effector control library.
//!
//! Drives the tool changer, the two vacuum generators and the pneumatic
//! cylinder of a robot end-effector, and confirms each command against
//! the controller's status byte.  Everything except the `gpio` and
//! `serial` adapters builds and tests on any host; those two are behind
//! the `toradex` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod feedback;
pub mod fsm;
