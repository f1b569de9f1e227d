//! Backend API
//!
//! Contract types for the StudyTrack JSON endpoints and the client seam.

pub mod client;
pub mod dto;
pub mod error;
#[cfg(feature = "native")]
pub mod http;

pub use client::{delete_subject_path, join_url, StudyApi};
pub use dto::{ActionResponse, DashboardStats, DashboardStatsResponse, SubjectProgress, TimerRequest};
pub use error::{ClientError, ClientResult};
#[cfg(feature = "native")]
pub use http::HttpStudyApi;
