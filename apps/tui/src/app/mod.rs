// App module for charts-tui
// Handles application state and the loads it asks for

pub mod actions;
pub mod input;
pub mod state;

pub use actions::Loader;
pub use input::handle_input;
pub use state::{App, AppOptions, AppScreen, Effect, HomePanel, LoadEvent, LoadRequest};
