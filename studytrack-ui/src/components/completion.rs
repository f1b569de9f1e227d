//! Session Complete Modal
//!
//! Celebration shown when a countdown reaches zero: a dismissable modal plus a
//! burst of falling confetti.

use gloo_timers::callback::Timeout;
use leptos::*;
use wasm_bindgen::JsCast;

use crate::dom;

const CONFETTI_COUNT: usize = 100;
const CONFETTI_COLORS: [&str; 5] = ["#6366F1", "#8B5CF6", "#10B981", "#F59E0B", "#EF4444"];

/// Show the modal and the confetti
pub fn celebrate() {
    show_modal();
    confetti();
}

fn show_modal() {
    let Some(host) = dom::create("div") else {
        return;
    };
    let Some(body) = dom::body() else {
        return;
    };
    if body.append_child(&host).is_err() {
        return;
    }
    let Ok(mount) = host.clone().dyn_into::<web_sys::HtmlElement>() else {
        return;
    };

    let on_close = Callback::new(move |_| host.remove());
    mount_to(mount, move || view! { <CompletionModal on_close=on_close /> });
}

#[component]
fn CompletionModal(on_close: Callback<()>) -> impl IntoView {
    view! {
        <div style="position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
                    background: rgba(0,0,0,0.8); display: flex; justify-content: center; \
                    align-items: center; z-index: 10000;">
            <div style="background: white; padding: 2rem; border-radius: 12px; text-align: center; max-width: 400px;">
                <div style="font-size: 4rem; margin-bottom: 1rem;">"🎉"</div>
                <h2 style="color: #10B981; margin-bottom: 1rem;">"Session Complete!"</h2>
                <p style="margin-bottom: 2rem; color: #6B7280;">
                    "Great job! You've completed your study session."
                </p>
                <button
                    on:click=move |_| on_close.call(())
                    style="background: #6366F1; color: white; border: none; padding: 0.75rem 1.5rem; \
                           border-radius: 8px; cursor: pointer; font-weight: 600;"
                >
                    "Continue Studying"
                </button>
            </div>
        </div>
    }
}

fn confetti() {
    let Some(body) = dom::body() else {
        return;
    };
    let fall = dom::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(800.0);

    for _ in 0..CONFETTI_COUNT {
        let Some(piece) = dom::create("div") else {
            return;
        };
        let color = CONFETTI_COLORS[(js_sys::Math::random() * CONFETTI_COLORS.len() as f64) as usize
            % CONFETTI_COLORS.len()];
        let duration_ms = 1000.0 + js_sys::Math::random() * 2000.0;
        let spin = 360.0 + js_sys::Math::random() * 360.0;

        let styled = piece.set_attribute(
            "style",
            &format!(
                "position: fixed; width: 10px; height: 10px; background: {}; top: -10px; \
                 left: {}vw; border-radius: 2px; z-index: 9999; pointer-events: none; \
                 transition: transform {:.0}ms cubic-bezier(0.1, 0.8, 0.2, 1), opacity {:.0}ms;",
                color,
                js_sys::Math::random() * 100.0,
                duration_ms,
                duration_ms
            ),
        );
        if let Err(e) = styled {
            dom::log_error(&format!("Failed to style confetti: {:?}", e));
            return;
        }
        if body.append_child(&piece).is_err() {
            continue;
        }

        // Let the initial position paint before starting the fall
        let falling = piece.clone();
        Timeout::new(20, move || {
            dom::set_style(
                &falling,
                "transform",
                &format!("translateY({}px) rotate({}deg)", fall, spin),
            );
            dom::set_style(&falling, "opacity", "0");
        })
        .forget();

        Timeout::new(duration_ms as u32 + 20, move || piece.remove()).forget();
    }
}
