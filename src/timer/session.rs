//! Session saving
//!
//! Fire-and-forget from the state machine's point of view: by the time these run
//! the timer has already been reset, and nothing here feeds back into it.

use super::machine::{SessionSave, StopOutcome};
use crate::api::StudyApi;
use crate::notify::{CompletionHook, DecisionGate, Notifier};

pub const SAVED_MESSAGE: &str = "Study session saved! 🎉";
pub const REJECTED_MESSAGE: &str = "Error saving session. Please try again.";
pub const NETWORK_MESSAGE: &str = "Network error. Please check your connection.";

/// What happened to a save request
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved,
    /// Backend answered `success: false`
    Rejected(Option<String>),
    /// Transport failure
    Failed(String),
}

/// Report a session and tell the user how it went
pub async fn save_session<A, N>(
    api: &A,
    notifier: &N,
    on_saved: Option<&CompletionHook>,
    save: &SessionSave,
) -> SaveOutcome
where
    A: StudyApi + ?Sized,
    N: Notifier + ?Sized,
{
    tracing::info!(
        subject_id = %save.subject_id,
        duration = save.duration_minutes,
        "Saving study session"
    );

    match api.stop_timer(&save.to_request()).await {
        Ok(response) if response.success => {
            notifier.success(SAVED_MESSAGE);
            if let Some(hook) = on_saved {
                hook();
            }
            SaveOutcome::Saved
        }
        Ok(response) => {
            tracing::error!(error = ?response.error, "Backend refused study session");
            notifier.error(REJECTED_MESSAGE);
            SaveOutcome::Rejected(response.error)
        }
        Err(e) => {
            tracing::error!("Failed to save study session: {}", e);
            notifier.error(NETWORK_MESSAGE);
            SaveOutcome::Failed(e.to_string())
        }
    }
}

/// Ask before saving a stopped session. `None` when nothing was offered or the user declined.
pub async fn confirm_and_save<A, G, N>(
    api: &A,
    gate: &G,
    notifier: &N,
    on_saved: Option<&CompletionHook>,
    stopped: &StopOutcome,
) -> Option<SaveOutcome>
where
    A: StudyApi + ?Sized,
    G: DecisionGate + ?Sized,
    N: Notifier + ?Sized,
{
    let save = stopped.offer.as_ref()?;
    let prompt = stopped.prompt()?;

    if !gate.confirm(&prompt).await {
        tracing::debug!(minutes = save.duration_minutes, "User declined to save session");
        return None;
    }

    Some(save_session(api, notifier, on_saved, save).await)
}
