//! Study Timer Page
//!
//! Wires the countdown driver to the timer page: controls, presets, custom
//! duration input, clock text, progress ring and running visuals.

use chrono::Utc;
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};
use wasm_bindgen::JsCast;

use studytrack::config::TimerConfig;
use studytrack::timer::{confirm_and_save, save_session, TimerView};
use studytrack::{
    CompletionHook, TickOutcome, TickSource, TimerDriver, TimerError, TimerMachine,
};

use crate::api::GlooStudyApi;
use crate::components::{celebrate, FlashNotifier};
use crate::dom::{self, BrowserGate};

const RUNNING_BACKGROUND: &str = "#f0f9ff";

/// One-second browser interval calling back into the timer
struct GlooTicks {
    timer: Weak<StudyTimer>,
}

impl TickSource for GlooTicks {
    type Handle = Interval;

    fn every_second(&mut self) -> Interval {
        let timer = self.timer.clone();
        Interval::new(1_000, move || {
            if let Some(timer) = timer.upgrade() {
                timer.on_tick();
            }
        })
    }

    /// Clear now; free the callback once it has returned, since a tick may be cancelling itself
    fn cancel(&mut self, handle: Interval) {
        let callback = handle.cancel();
        spawn_local(async move {
            drop(callback);
        });
    }
}

/// Elements the timer reads from or renders into
struct TimerElements {
    display: Option<Element>,
    ring: Option<Element>,
    start: Option<Element>,
    pause: Option<Element>,
    stop: Option<Element>,
    subject: Option<HtmlSelectElement>,
    custom: Option<HtmlInputElement>,
    presets: Vec<Element>,
}

impl TimerElements {
    fn find() -> Self {
        Self {
            display: dom::by_id("timerDisplay"),
            ring: dom::query(".progress-circle"),
            start: dom::by_id("startBtn"),
            pause: dom::by_id("pauseBtn"),
            stop: dom::by_id("stopBtn"),
            subject: dom::by_id("subjectSelect").and_then(|e| e.dyn_into().ok()),
            custom: dom::by_id("customTime").and_then(|e| e.dyn_into().ok()),
            presets: dom::query_all(".preset-btn"),
        }
    }
}

fn preset_minutes(button: &Element) -> Option<i64> {
    button.get_attribute("data-minutes")?.trim().parse().ok()
}

/// Countdown controller for the timer page
pub struct StudyTimer {
    driver: RefCell<TimerDriver<GlooTicks>>,
    elements: TimerElements,
    api: GlooStudyApi,
    notifier: Rc<FlashNotifier>,
    on_saved: Option<CompletionHook>,
}

impl StudyTimer {
    /// Attach to the page when it has a timer display
    pub fn mount(
        config: &TimerConfig,
        api: GlooStudyApi,
        notifier: Rc<FlashNotifier>,
        on_saved: Option<CompletionHook>,
    ) -> Option<Rc<Self>> {
        let elements = TimerElements::find();
        elements.display.as_ref()?;

        let mut machine = TimerMachine::new(config);
        if let Some(select) = &elements.subject {
            // An empty value counts as no subject
            if let Err(e) = machine.select_subject(Some(select.value())) {
                dom::log_error(&e.to_string());
            }
        }

        let timer = Rc::new_cyclic(|weak| Self {
            driver: RefCell::new(TimerDriver::new(
                machine,
                GlooTicks {
                    timer: weak.clone(),
                },
            )),
            elements,
            api,
            notifier,
            on_saved,
        });

        timer.attach_listeners();
        timer.render();
        Some(timer)
    }

    fn attach_listeners(self: &Rc<Self>) {
        for button in &self.elements.presets {
            let timer = Rc::clone(self);
            let target = button.clone();
            dom::on(button, "click", move |_| {
                if let Some(minutes) = preset_minutes(&target) {
                    timer.set_duration(minutes);
                }
            });
        }

        if let Some(start) = &self.elements.start {
            let timer = Rc::clone(self);
            dom::on(start, "click", move |_| timer.start());
        }
        if let Some(pause) = &self.elements.pause {
            let timer = Rc::clone(self);
            dom::on(pause, "click", move |_| timer.pause());
        }
        if let Some(stop) = &self.elements.stop {
            let timer = Rc::clone(self);
            dom::on(stop, "click", move |_| timer.stop());
        }

        if let Some(select) = &self.elements.subject {
            let timer = Rc::clone(self);
            let input = select.clone();
            dom::on(select, "change", move |_| {
                if let Err(e) = timer.driver.borrow_mut().select_subject(Some(input.value())) {
                    dom::log_error(&e.to_string());
                }
            });
        }

        if let Some(custom) = &self.elements.custom {
            let timer = Rc::clone(self);
            let input = custom.clone();
            dom::on(custom, "change", move |_| {
                let minutes = input.value().trim().parse::<i64>().unwrap_or(0);
                if !timer.set_duration(minutes) {
                    input.set_value("");
                }
            });
        }
    }

    /// Returns false when the duration was refused
    fn set_duration(&self, minutes: i64) -> bool {
        let result = self.driver.borrow_mut().set_duration(minutes);
        match result {
            Ok(()) => {
                self.highlight_preset(minutes);
                self.render();
                true
            }
            Err(e) => {
                dom::alert(&e.to_string());
                false
            }
        }
    }

    fn highlight_preset(&self, minutes: i64) {
        for button in &self.elements.presets {
            let class_list = button.class_list();
            let marked = if preset_minutes(button) == Some(minutes) {
                class_list.add_1("active")
            } else {
                class_list.remove_1("active")
            };
            if let Err(e) = marked {
                dom::log_error(&format!("Failed to mark preset: {:?}", e));
            }
        }
    }

    fn start(&self) {
        let result = self.driver.borrow_mut().start(Utc::now());
        match result {
            Ok(_) => self.render(),
            Err(e @ TimerError::SubjectNotSelected) => dom::alert(&e.to_string()),
            Err(e) => dom::log_error(&e.to_string()),
        }
    }

    fn pause(&self) {
        self.driver.borrow_mut().pause();
        self.render();
    }

    fn stop(&self) {
        let stopped = self.driver.borrow_mut().stop();
        self.render();

        let api = self.api.clone();
        let notifier = Rc::clone(&self.notifier);
        let on_saved = self.on_saved.clone();
        spawn_local(async move {
            confirm_and_save(&api, &BrowserGate, &*notifier, on_saved.as_ref(), &stopped).await;
        });
    }

    fn on_tick(&self) {
        let outcome = self.driver.borrow_mut().tick();
        self.render();

        if let TickOutcome::Completed(save) = outcome {
            let api = self.api.clone();
            let notifier = Rc::clone(&self.notifier);
            let on_saved = self.on_saved.clone();
            spawn_local(async move {
                save_session(&api, &*notifier, on_saved.as_ref(), &save).await;
            });
            celebrate();
        }
    }

    fn render(&self) {
        let view = TimerView::from(self.driver.borrow().state());
        let els = &self.elements;

        if let Some(display) = &els.display {
            dom::set_text(display, &view.clock);
        }
        if let Some(ring) = &els.ring {
            dom::set_style(ring, "stroke-dashoffset", &view.ring_offset.to_string());
        }
        if let Some(start) = &els.start {
            dom::set_display(start, !view.running, "inline-flex");
        }
        if let Some(pause) = &els.pause {
            dom::set_display(pause, view.running, "inline-flex");
        }
        if let Some(body) = dom::body() {
            let background = if view.running { RUNNING_BACKGROUND } else { "" };
            if let Err(e) = body.style().set_property("background-color", background) {
                dom::log_error(&format!("Failed to tint page: {:?}", e));
            }
        }
    }
}
