//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no GPIO chip or
//! UART required.

mod app_service_tests;
mod sim_rig_tests;
