//! Small text helpers shared by services and handlers.
//!
//! - [`slug`] - slug generation from titles
//! - [`tags`] - comma-separated tag parsing and matching

pub mod slug;
pub mod tags;
