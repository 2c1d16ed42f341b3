//! Application core: pure domain logic, zero I/O.
//!
//! All interaction with the installation happens through the **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
