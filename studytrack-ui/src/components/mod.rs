//! UI Components
//!
//! Leptos views the controllers mount into the server-rendered page.

pub mod completion;
pub mod flash;

pub use completion::celebrate;
pub use flash::{dismiss_page_flashes, FlashNotifier};
