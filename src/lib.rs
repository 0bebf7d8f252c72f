//! Terminal client for the movie catalog backend: browse and edit actors,
//! films and directors, manage genres, and run the cross-reference searches.
pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use api::{BackendClient, Services};
pub use config::Config;
pub use error::ServiceError;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
