//! Dashboard insights derived from the full evaluation history.

mod aggregator;
mod narrative;
pub mod views;

pub use aggregator::{aggregate_insights, AWAITING_DATA};
pub use narrative::{
    CULTURE_FOCUS, DECLINE_ALERT, LOW_APPROVAL, LOW_APPROVAL_ALERT, LOW_ENERGY_MISMATCH,
    RAISE_THE_BAR,
};
pub use views::{AreaScores, ClassificationDistribution, InsightsSnapshot, PeakHour};

pub(crate) use aggregator::{average_fit_score, within};
