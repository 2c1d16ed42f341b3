//! Pump station controller library.
//!
//! A polled, non-blocking controller for a pumping installation: it reads
//! a leak probe and a supply-health input, drives a motorised valve and a
//! pump, sounds a local alarm and shows its state on a status LED.
//! Everything above `adapters` is pure logic with no I/O so the whole
//! controller runs on the host in tests.
//! ESP-IDF specific code is gated behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod annunciator;
pub mod app;
pub mod config;
pub mod deadline;
pub mod error;
pub mod fsm;
pub mod indicator;
pub mod monitor;
pub mod status;
pub mod valve;

#[cfg(feature = "espidf")]
pub mod pins;
