//! Ratatui front end: the [`App`] state machine, its screens and dialogs, and
//! the terminal loop that drives them.

mod app;
mod events;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
