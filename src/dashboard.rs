//! Dashboard state: the form, the last prediction, the busy flag and the
//! pending notifications.
//!
//! Submission is split in two halves so the event loop can render between
//! them. `begin_submit` raises the busy flag and hands out a snapshot of the
//! profile; `finish_submit` applies the outcome and lowers the flag.

use crate::client::PredictionClient;
use crate::prediction::{PredictionError, PredictionResult};
use crate::profile::{CustomerProfile, FieldError, ProfileField};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub const SUCCESS_MESSAGE: &str = "Prediction completed successfully!";
pub const FAILURE_MESSAGE: &str = "Failed to predict cluster";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient, non-blocking message for the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn new(level: NotificationLevel, message: &str) -> Self {
        Self {
            level,
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Dashboard {
    profile: CustomerProfile,
    prediction: Option<PredictionResult>,
    busy: bool,
    notifications: Vec<Notification>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: CustomerProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn profile(&self) -> &CustomerProfile {
        &self.profile
    }

    /// Last successful prediction, if any
    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Apply one form edit. Rejected values leave the profile unchanged.
    pub fn edit(&mut self, field: ProfileField, raw: &str) -> Result<(), FieldError> {
        self.profile.edit(field, raw)
    }

    /// Restore default form values; the displayed prediction stays.
    pub fn reset_profile(&mut self) {
        self.profile = CustomerProfile::default();
    }

    /// Start a submission.
    ///
    /// Returns the profile snapshot to send, or `None` while a previous call
    /// is still outstanding.
    pub fn begin_submit(&mut self) -> Option<CustomerProfile> {
        if self.busy {
            debug!("submission ignored, prediction already in flight");
            return None;
        }
        self.busy = true;
        Some(self.profile.clone())
    }

    /// Resolve a submission started with `begin_submit`
    pub fn finish_submit(&mut self, outcome: Result<PredictionResult, PredictionError>) {
        match outcome {
            Ok(result) => {
                self.prediction = Some(result);
                self.notify(NotificationLevel::Success, SUCCESS_MESSAGE);
            }
            Err(e) => {
                warn!(error = %e, "keeping previous prediction");
                self.notify(NotificationLevel::Error, FAILURE_MESSAGE);
            }
        }
        self.busy = false;
    }

    /// Send the current profile and apply the outcome.
    ///
    /// Returns `false` without touching the network if a call is already in
    /// flight.
    pub async fn submit(&mut self, client: &PredictionClient) -> bool {
        let Some(snapshot) = self.begin_submit() else {
            return false;
        };
        let outcome = client.predict(&snapshot).await;
        self.finish_submit(outcome);
        true
    }

    /// Drain pending notifications, oldest first
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, level: NotificationLevel, message: &str) {
        self.notifications.push(Notification::new(level, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::ClusterCharacteristics;

    fn result(cluster: i64, size: u64) -> PredictionResult {
        PredictionResult {
            cluster,
            cluster_size: size,
            cluster_characteristics: ClusterCharacteristics {
                avg_income: 50_000.0,
                avg_spending_score: 40.0,
                avg_total_spend: 3_000.0,
                avg_purchase_frequency: 8.0,
                avg_recency: 60.0,
            },
        }
    }

    #[test]
    fn test_starts_with_defaults_and_no_prediction() {
        let dashboard = Dashboard::new();
        assert_eq!(dashboard.profile(), &CustomerProfile::default());
        assert!(dashboard.prediction().is_none());
        assert!(!dashboard.is_busy());
    }

    #[test]
    fn test_busy_only_between_begin_and_finish() {
        let mut dashboard = Dashboard::new();
        assert!(!dashboard.is_busy());

        let snapshot = dashboard.begin_submit().unwrap();
        assert_eq!(snapshot, CustomerProfile::default());
        assert!(dashboard.is_busy());

        dashboard.finish_submit(Ok(result(1, 10)));
        assert!(!dashboard.is_busy());

        dashboard.begin_submit().unwrap();
        assert!(dashboard.is_busy());
        dashboard.finish_submit(Err(PredictionError::request_failed("boom")));
        assert!(!dashboard.is_busy());
    }

    #[test]
    fn test_second_submission_blocked_while_busy() {
        let mut dashboard = Dashboard::new();
        assert!(dashboard.begin_submit().is_some());
        assert!(dashboard.begin_submit().is_none());
        assert!(dashboard.is_busy());
    }

    #[test]
    fn test_success_replaces_prediction_wholesale() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_submit();
        dashboard.finish_submit(Ok(result(0, 300)));
        dashboard.begin_submit();
        dashboard.finish_submit(Ok(result(2, 45)));

        assert_eq!(dashboard.prediction(), Some(&result(2, 45)));
    }

    #[test]
    fn test_failure_keeps_previous_prediction() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_submit();
        dashboard.finish_submit(Ok(result(1, 120)));
        dashboard.take_notifications();

        dashboard.begin_submit();
        dashboard.finish_submit(Err(PredictionError::request_failed("server returned 500")));

        assert_eq!(dashboard.prediction(), Some(&result(1, 120)));
        let notes = dashboard.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Error);
        assert_eq!(notes[0].message, FAILURE_MESSAGE);
    }

    #[test]
    fn test_failure_without_prior_prediction_stays_empty() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_submit();
        dashboard.finish_submit(Err(PredictionError::request_failed("timeout")));
        assert!(dashboard.prediction().is_none());
    }

    #[test]
    fn test_notifications_are_drained() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_submit();
        dashboard.finish_submit(Ok(result(0, 1)));

        let notes = dashboard.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Success);
        assert_eq!(notes[0].message, SUCCESS_MESSAGE);
        assert!(dashboard.take_notifications().is_empty());
    }

    #[test]
    fn test_snapshot_is_taken_at_submission() {
        let mut dashboard = Dashboard::new();
        dashboard.edit(ProfileField::Age, "60").unwrap();
        let snapshot = dashboard.begin_submit().unwrap();
        dashboard.edit(ProfileField::Age, "20").unwrap();

        assert_eq!(snapshot.age, 60);
        assert_eq!(dashboard.profile().age, 20);
    }

    #[test]
    fn test_reset_keeps_prediction() {
        let mut dashboard = Dashboard::new();
        dashboard.edit(ProfileField::Income, "90000").unwrap();
        dashboard.begin_submit();
        dashboard.finish_submit(Ok(result(1, 5)));

        dashboard.reset_profile();
        assert_eq!(dashboard.profile(), &CustomerProfile::default());
        assert!(dashboard.prediction().is_some());
    }
}
