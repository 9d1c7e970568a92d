//! Domain layer: entities, publication rules, the legacy math transformer and
//! repository contracts.
//!
//! - [`entities`] - content items and admin tokens
//! - [`visibility`] - what is public, and which publish timestamp to store
//! - [`markup`] - legacy HTML math notation to LaTeX-annotated markdown
//! - [`clock`] - injectable "now"
//! - [`repositories`] - data access trait definitions
//!
//! Nothing in here depends on the infrastructure or presentation layers.

pub mod clock;
pub mod entities;
pub mod markup;
pub mod repositories;
pub mod visibility;

pub use clock::{Clock, FixedClock, SystemClock};
pub use visibility::{PublicationStatus, PublishError, VisibilityPolicy};
