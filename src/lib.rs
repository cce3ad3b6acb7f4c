//! Competition place booking for sports clubs
//!
//! Clubs spend points to reserve places in competitions. The booking rules live in [`domain`],
//! the use cases in [`commands`], and the storage behind the [`ports`] traits.

pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod ports;
