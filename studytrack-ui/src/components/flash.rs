//! Flash Message Component
//!
//! Runtime success and error messages, shown in the page's flash container and
//! removed after a fade. Server-rendered flashes already on the page get the same
//! treatment with a longer lifetime.

use gloo_timers::callback::Timeout;
use leptos::*;
use std::cell::Cell;
use std::time::Duration;
use wasm_bindgen::JsCast;

use studytrack::config::NotificationConfig;
use studytrack::{FlashOrigin, FlashTiming, NotificationLevel, Notifier};

use crate::dom;

const FLASH_STYLES: &str = r#"
    @keyframes slideIn {
        from { transform: translateX(100%); opacity: 0; }
        to { transform: translateX(0); opacity: 1; }
    }

    @keyframes slideOut {
        from { transform: translateX(0); opacity: 1; }
        to { transform: translateX(100%); opacity: 0; }
    }
"#;

#[derive(Clone, Debug, PartialEq)]
struct Flash {
    id: u32,
    level: NotificationLevel,
    message: String,
    fading: bool,
}

fn millis(duration: Duration) -> u32 {
    duration.as_millis().min(u32::MAX as u128) as u32
}

/// Flash messages rendered by Leptos into the page's flash container
pub struct FlashNotifier {
    flashes: RwSignal<Vec<Flash>>,
    timing: FlashTiming,
    next_id: Cell<u32>,
}

impl FlashNotifier {
    /// Mount the flash list and return the notifier feeding it
    pub fn mount(config: &NotificationConfig) -> Self {
        inject_styles();

        let flashes = create_rw_signal(Vec::<Flash>::new());
        match flash_container() {
            Some(container) => mount_to(container, move || view! { <FlashList flashes=flashes /> }),
            None => dom::log_error("No flash container; runtime messages go to the console only"),
        }

        Self {
            flashes,
            timing: FlashTiming::for_origin(FlashOrigin::Runtime, config),
            next_id: Cell::new(0),
        }
    }
}

impl Notifier for FlashNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));

        if level == NotificationLevel::Error {
            dom::log_error(message);
        }

        self.flashes.update(|list| {
            list.push(Flash {
                id,
                level,
                message: message.to_string(),
                fading: false,
            })
        });

        let flashes = self.flashes;
        let fade = self.timing.fade;
        Timeout::new(millis(self.timing.visible_for), move || {
            flashes.update(|list| {
                if let Some(flash) = list.iter_mut().find(|f| f.id == id) {
                    flash.fading = true;
                }
            });
            Timeout::new(millis(fade), move || {
                flashes.update(|list| list.retain(|f| f.id != id));
            })
            .forget();
        })
        .forget();
    }
}

/// Fade out and remove the flashes the server rendered with the page
pub fn dismiss_page_flashes(config: &NotificationConfig) {
    let timing = FlashTiming::for_origin(FlashOrigin::Page, config);

    for flash in dom::query_all(".flash") {
        let fade = timing.fade;
        Timeout::new(millis(timing.visible_for), move || {
            dom::set_style(&flash, "opacity", "0");
            Timeout::new(millis(fade), move || flash.remove()).forget();
        })
        .forget();
    }
}

/// The page's `.flash-messages` element, created in the top-right corner if absent
fn flash_container() -> Option<web_sys::HtmlElement> {
    let container = match dom::query(".flash-messages") {
        Some(existing) => existing,
        None => {
            let created = dom::create("div")?;
            created.set_class_name("flash-messages");
            dom::set_style(&created, "position", "fixed");
            dom::set_style(&created, "top", "80px");
            dom::set_style(&created, "right", "20px");
            dom::set_style(&created, "z-index", "1000");
            dom::body()?.append_child(&created).ok()?;
            created
        }
    };
    container.dyn_into::<web_sys::HtmlElement>().ok()
}

fn inject_styles() {
    let Some(head) = dom::document().and_then(|d| d.head()) else {
        return;
    };
    if let Some(style) = dom::create("style") {
        style.set_text_content(Some(FLASH_STYLES));
        if let Err(e) = head.append_child(&style) {
            dom::log_error(&format!("Failed to add flash styles: {:?}", e));
        }
    }
}

#[component]
fn FlashList(flashes: RwSignal<Vec<Flash>>) -> impl IntoView {
    view! {
        <For
            each=move || flashes.get()
            key=|flash| (flash.id, flash.fading)
            children=move |flash| view! { <FlashMessage flash=flash /> }
        />
    }
}

#[component]
fn FlashMessage(flash: Flash) -> impl IntoView {
    let animation = if flash.fading {
        "animation: slideOut 0.3s ease-in forwards"
    } else {
        "animation: slideIn 0.3s ease-out"
    };

    view! {
        <div class=format!("flash {}", flash.level.css_class()) style=animation>
            {flash.message}
        </div>
    }
}
