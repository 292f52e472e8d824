//! Application core — actuator command and confirmation logic, zero I/O.
//!
//! This module contains the control rules for the end-effector:
//! command dispatch, feedback reconciliation, and timeout recovery.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
