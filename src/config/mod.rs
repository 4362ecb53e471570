pub mod snapshot;
pub mod types;

pub use types::{Configuration, ACCENT_TOGGLE, HEX_TOGGLE, TOGGLE_KEYS};
