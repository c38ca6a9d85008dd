//! DockSense — debounced hall-effect dock/kickstand sensor engine.
//!
//! Translates raw, noisy interrupt edges from one or two magnetic hall
//! switches into a single stable [`state::DockState`], published either
//! through a caller-supplied callback or a queryable switch device.
//! Platform specifics (GPIO/IRQ, switch class) stay behind the port
//! traits in [`ports`], so the whole pipeline runs and tests on the
//! host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod driver;
pub mod error;
pub mod ports;
pub mod queue;
pub mod state;
pub mod switch;
