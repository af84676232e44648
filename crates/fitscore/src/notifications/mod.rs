//! Simulated e-mail delivery and the append-only notification log.
//!
//! Nothing here talks to a mail transport: messages are rendered, traced and recorded.

mod candidate;
pub mod domain;
pub mod report;
mod service;

pub use candidate::{render_candidate_email, CandidateEmail, DimensionBreakdown};
pub use domain::{
    NotificationKind, NotificationLogEntry, NotificationLogError, NotificationLogSink,
    NotificationStatus,
};
pub use report::{ApprovedCandidatesReport, ReportCandidate};
pub use service::{ApprovedReportOutcome, NotificationError, NotificationService};

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
