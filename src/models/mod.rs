//! Data models for the weather bot.
//!
//! This module contains the inbound Telegram update shapes, the weather
//! observation handed to the formatter, and the operational API responses.

pub mod api;
pub mod telegram;
pub mod weather;

pub use api::*;
pub use telegram::*;
pub use weather::*;
