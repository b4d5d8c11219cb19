// State management module
// Shared state handed to request handlers

pub mod app_state;

pub use app_state::AppState;
