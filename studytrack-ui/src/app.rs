//! App Root
//!
//! Builds the shared services and activates the controllers whose markers the
//! current page carries.

use std::rc::Rc;

use studytrack::{CompletionHook, Config};

use crate::api::GlooStudyApi;
use crate::charts::StudyCharts;
use crate::components::{dismiss_page_flashes, FlashNotifier};
use crate::dashboard::Dashboard;
use crate::dom;
use crate::glue;
use crate::timer::StudyTimer;

/// Attach everything to the loaded page
pub fn start() {
    let config = Config::default();
    let api = GlooStudyApi::from_storage();
    let notifier = Rc::new(FlashNotifier::mount(&config.notifications));

    dismiss_page_flashes(&config.notifications);
    glue::mobile_menu();
    glue::delete_buttons(api.clone(), Rc::clone(&notifier));

    let dashboard = Dashboard::mount(&config.dashboard, api.clone(), Rc::clone(&notifier));
    let charts = StudyCharts::mount();

    // A saved session changes today's numbers
    let on_saved: Option<CompletionHook> = if dashboard.is_some() || charts.is_some() {
        Some(Rc::new(move || {
            if let Some(dashboard) = &dashboard {
                dashboard.refresh();
            }
            if let Some(charts) = &charts {
                charts.refresh();
            }
        }))
    } else {
        None
    };

    if StudyTimer::mount(&config.timer, api, notifier, on_saved).is_some() {
        dom::log("Study timer ready");
    }
}
