//! Content report module.
//!
//! Students can report a profile or a chat message. Reports start out
//! `Pending` and are moved to `Reviewed` or `Resolved` by moderators.
//!
//! # Operations
//!
//! - [`submit_report(report)`](crate::CampusDB::submit_report)
//! - [`get_report(id)`](crate::CampusDB::get_report)
//! - [`list_reports()`](crate::CampusDB::list_reports)
//! - [`update_report_status(id, status)`](crate::CampusDB::update_report_status)

pub mod types;

pub use types::{NewReport, Report, ReportKind, ReportStatus};

use crate::error::{CampusError, ValidationError};
use crate::storage::schema::MAX_REPORT_REASON_SIZE;

/// Validates a new report before storage.
///
/// The reason must be non-blank and at most 1 KB.
pub(crate) fn validate_new_report(report: &NewReport) -> Result<(), CampusError> {
    if report.reason.trim().is_empty() {
        return Err(ValidationError::required_field("reason").into());
    }
    if report.reason.len() > MAX_REPORT_REASON_SIZE {
        return Err(ValidationError::content_too_large(
            "reason",
            report.reason.len(),
            MAX_REPORT_REASON_SIZE,
        )
        .into());
    }
    Ok(())
}

/// Moderators may only move a report to `Reviewed` or `Resolved`.
pub(crate) fn validate_status_change(status: ReportStatus) -> Result<(), CampusError> {
    if status == ReportStatus::Pending {
        return Err(ValidationError::invalid_field(
            "status",
            "reports cannot be moved back to pending",
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    fn report_with_reason(reason: &str) -> NewReport {
        NewReport {
            kind: ReportKind::User,
            target_id: 2,
            reason: reason.to_string(),
            reported_by: UserId::new(1),
        }
    }

    #[test]
    fn test_valid_report_passes() {
        assert!(validate_new_report(&report_with_reason("spam")).is_ok());
    }

    #[test]
    fn test_blank_reason_rejected() {
        let err = validate_new_report(&report_with_reason("  ")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_reason_size_limit() {
        let at_limit = "x".repeat(MAX_REPORT_REASON_SIZE);
        assert!(validate_new_report(&report_with_reason(&at_limit)).is_ok());

        let over = "x".repeat(MAX_REPORT_REASON_SIZE + 1);
        assert!(validate_new_report(&report_with_reason(&over)).is_err());
    }

    #[test]
    fn test_status_change_targets() {
        assert!(validate_status_change(ReportStatus::Reviewed).is_ok());
        assert!(validate_status_change(ReportStatus::Resolved).is_ok());
        assert!(validate_status_change(ReportStatus::Pending)
            .unwrap_err()
            .is_validation());
    }
}
