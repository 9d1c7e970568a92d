//! HTML template rendering handlers.
//!
//! [`site`] serves the public pages; the other modules make up the admin
//! panel under `/admin`.

mod content;
mod convert;
mod dashboard;
mod login;
mod site;

pub use content::{
    admin_list_handler, create_handler, edit_handler, new_handler, publish_handler,
    unpublish_handler, update_handler,
};
pub use convert::{convert_page_handler, convert_submit_handler};
pub use dashboard::dashboard_handler;
pub use login::{login_handler, login_submit_handler, logout_handler};
pub use site::{detail_handler, home_handler, listing_handler};
