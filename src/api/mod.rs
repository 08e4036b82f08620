//! Local web interface.
//!
//! A listing page, an edit form, and POST-only mutation endpoints that
//! redirect back to the listing with a flash message.

mod pages;
pub mod routes;

pub use routes::serve;
