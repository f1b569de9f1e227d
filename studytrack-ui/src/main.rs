//! StudyTrack Browser Layer
//!
//! Attaches to the server-rendered StudyTrack pages and drives them from WASM.
//!
//! # Features
//!
//! - Study countdown with pause, stop and session saving
//! - Dashboard statistics refreshed every 30 seconds
//! - Subject distribution, weekly and trend charts via Chart.js
//! - Flash messages, mobile menu and subject deletion
//!
//! # Architecture
//!
//! Each controller activates only when its markers are present on the page. The
//! state machines and flows live in the `studytrack` crate; this crate supplies the
//! DOM, timer, HTTP and charting seams they run against.

mod api;
mod app;
mod charts;
mod components;
mod dashboard;
mod dom;
mod glue;
mod timer;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    app::start();
}
