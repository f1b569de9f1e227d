//! Page Glue
//!
//! Behaviors shared by every page: mobile navigation toggle and subject deletion.

use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use studytrack::{delete_subject, SubjectRef};

use crate::api::GlooStudyApi;
use crate::components::FlashNotifier;
use crate::dom::{self, BrowserGate};

/// Toggle `.nav-links` open from the mobile menu button
pub fn mobile_menu() {
    let (Some(button), Some(links)) = (dom::by_id("mobileMenuBtn"), dom::query(".nav-links")) else {
        return;
    };

    dom::on(&button, "click", move |_| toggle_menu(&links));
}

fn toggle_menu(links: &Element) {
    if let Err(e) = links.class_list().toggle("active") {
        dom::log_error(&format!("Failed to toggle navigation: {:?}", e));
    }
}

fn subject_of(button: &Element) -> Option<SubjectRef> {
    Some(SubjectRef {
        id: button.get_attribute("data-subject-id")?,
        name: button.get_attribute("data-subject-name").unwrap_or_default(),
    })
}

/// Confirm and delete on every `.delete-subject` button, removing the card on success
pub fn delete_buttons(api: GlooStudyApi, notifier: Rc<FlashNotifier>) {
    for button in dom::query_all(".delete-subject") {
        let Some(subject) = subject_of(&button) else {
            dom::log_error("Delete button without data-subject-id");
            continue;
        };

        let api = api.clone();
        let notifier = Rc::clone(&notifier);
        let card = button.closest(".subject-card").ok().flatten();

        dom::on(&button, "click", move |event| {
            event.prevent_default();

            let api = api.clone();
            let notifier = Rc::clone(&notifier);
            let subject = subject.clone();
            let card = card.clone();
            spawn_local(async move {
                delete_subject(&api, &BrowserGate, &*notifier, &subject, || {
                    if let Some(card) = card {
                        card.remove();
                    }
                })
                .await;
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_subject_from_button_attributes() {
        let button = dom::create("button").unwrap();
        button.set_attribute("data-subject-id", "42").unwrap();
        button.set_attribute("data-subject-name", "Biology").unwrap();

        assert_eq!(
            subject_of(&button),
            Some(SubjectRef {
                id: "42".to_string(),
                name: "Biology".to_string(),
            })
        );
    }

    #[wasm_bindgen_test]
    fn test_menu_toggle_opens_and_closes() {
        let links = dom::create("ul").unwrap();

        toggle_menu(&links);
        assert!(links.class_list().contains("active"));

        toggle_menu(&links);
        assert!(!links.class_list().contains("active"));
    }

    #[wasm_bindgen_test]
    fn test_button_without_id_is_skipped() {
        let button = dom::create("button").unwrap();
        button.set_attribute("data-subject-name", "Biology").unwrap();

        assert_eq!(subject_of(&button), None);
    }
}
