//! Data types for content reports.

use serde::{Deserialize, Serialize};

use crate::types::{ReportId, Timestamp, UserId};

/// What a report is filed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// A user profile. `target_id` is a [`UserId`] value.
    User,
    /// A chat message. `target_id` is the message id owned by the
    /// messaging service.
    Message,
}

/// Moderation status of a report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Filed, not yet looked at.
    #[default]
    Pending,
    /// A moderator has looked at it.
    Reviewed,
    /// Closed.
    Resolved,
}

/// A stored report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique identifier (UUID v7).
    pub id: ReportId,

    /// Whether a user or a message is reported.
    pub kind: ReportKind,

    /// Id of the reported user or message.
    pub target_id: u64,

    /// Reason given by the reporter.
    pub reason: String,

    /// Who filed the report.
    pub reported_by: UserId,

    /// Current moderation status.
    pub status: ReportStatus,

    /// When the report was filed.
    pub created_at: Timestamp,
}

/// Input for filing a report.
///
/// # Example
///
/// ```rust,ignore
/// use campuslink::{NewReport, ReportKind, UserId};
///
/// let id = db.submit_report(NewReport {
///     kind: ReportKind::User,
///     target_id: 9,
///     reason: "Spam invitations".into(),
///     reported_by: UserId::new(1),
/// })?;
/// ```
#[derive(Clone, Debug)]
pub struct NewReport {
    /// Whether a user or a message is reported.
    pub kind: ReportKind,
    /// Id of the reported user or message.
    pub target_id: u64,
    /// Reason given by the reporter.
    pub reason: String,
    /// Who files the report.
    pub reported_by: UserId,
}

impl Report {
    pub(crate) fn from_new(new: NewReport, now: Timestamp) -> Self {
        Self {
            id: ReportId::new(),
            kind: new.kind,
            target_id: new.target_id,
            reason: new.reason,
            reported_by: new.reported_by,
            status: ReportStatus::Pending,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_starts_pending() {
        let report = Report::from_new(
            NewReport {
                kind: ReportKind::Message,
                target_id: 12,
                reason: "abusive".into(),
                reported_by: UserId::new(3),
            },
            Timestamp::from_millis(10),
        );
        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.kind, ReportKind::Message);
        assert_eq!(report.created_at, Timestamp::from_millis(10));
    }

    #[test]
    fn test_report_bincode_roundtrip() {
        let report = Report::from_new(
            NewReport {
                kind: ReportKind::User,
                target_id: 4,
                reason: "fake profile".into(),
                reported_by: UserId::new(1),
            },
            Timestamp::now(),
        );
        let bytes = bincode::serialize(&report).unwrap();
        let restored: Report = bincode::deserialize(&bytes).unwrap();
        assert_eq!(report, restored);
    }
}
