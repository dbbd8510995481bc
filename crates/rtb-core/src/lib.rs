//! Core domain + application logic for the rates tracker bot.
//!
//! This crate is intentionally framework-agnostic. Telegram, the HTTP quote
//! providers and the liveness server live behind ports (traits) implemented in
//! adapter crates.

pub mod calc;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod market;
pub mod menu;
pub mod messaging;
pub mod ports;
pub mod service;

pub use errors::{Error, EvalError, FetchError, Result};

#[cfg(test)]
mod testing;
