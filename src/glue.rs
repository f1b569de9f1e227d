//! Page Glue Flows
//!
//! Small page-level flows that still deserve a test: subject deletion.

use crate::api::StudyApi;
use crate::notify::{DecisionGate, Notifier};

pub const DELETED_MESSAGE: &str = "Subject deleted successfully";
pub const DELETE_FAILED_MESSAGE: &str = "Error deleting subject";

/// A subject as presented by a delete control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRef {
    pub id: String,
    pub name: String,
}

impl SubjectRef {
    pub fn delete_prompt(&self) -> String {
        format!(
            "Are you sure you want to delete \"{}\"? This will also delete all associated study sessions.",
            self.name
        )
    }
}

/// How a delete attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    Failed,
}

/// Confirm, delete, and on success let the caller drop the subject from view
///
/// `on_deleted` runs only after the backend confirmed; on failure the page is left
/// as it was.
pub async fn delete_subject<A, G, N, F>(
    api: &A,
    gate: &G,
    notifier: &N,
    subject: &SubjectRef,
    on_deleted: F,
) -> DeleteOutcome
where
    A: StudyApi + ?Sized,
    G: DecisionGate + ?Sized,
    N: Notifier + ?Sized,
    F: FnOnce(),
{
    if !gate.confirm(&subject.delete_prompt()).await {
        return DeleteOutcome::Declined;
    }

    match api.delete_subject(&subject.id).await {
        Ok(response) if response.success => {
            tracing::info!(subject_id = %subject.id, "Subject deleted");
            on_deleted();
            notifier.success(DELETED_MESSAGE);
            DeleteOutcome::Deleted
        }
        Ok(response) => {
            tracing::warn!(subject_id = %subject.id, error = ?response.error, "Subject delete refused");
            notifier.error(DELETE_FAILED_MESSAGE);
            DeleteOutcome::Failed
        }
        Err(e) => {
            tracing::error!(subject_id = %subject.id, "Error deleting subject: {}", e);
            notifier.error(DELETE_FAILED_MESSAGE);
            DeleteOutcome::Failed
        }
    }
}
