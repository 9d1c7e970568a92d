//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod content;
pub mod convert;
pub mod health;

pub use content::{
    create_content_handler, get_content_handler, list_content_handler, publish_content_handler,
    unpublish_content_handler, update_content_handler,
};
pub use convert::convert_handler;
pub use health::health_handler;
