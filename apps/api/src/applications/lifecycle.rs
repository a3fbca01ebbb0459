//! Application status lifecycle: applied → review → interview → offer/closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Review,
    Interview,
    Offer,
    Closed,
}

impl ApplicationStatus {
    pub const ALL: &'static [ApplicationStatus] = &[
        ApplicationStatus::Applied,
        ApplicationStatus::Review,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Review => "review",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Closed => "closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Review => "Under Review",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Closed => "Closed",
        }
    }

    /// Applicants may only withdraw before the interview stage.
    pub fn can_withdraw(&self) -> bool {
        matches!(self, ApplicationStatus::Applied | ApplicationStatus::Review)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(ApplicationStatus::Applied),
            "review" => Ok(ApplicationStatus::Review),
            "interview" => Ok(ApplicationStatus::Interview),
            "offer" => Ok(ApplicationStatus::Offer),
            "closed" => Ok(ApplicationStatus::Closed),
            other => Err(format!("Unknown application status '{other}'")),
        }
    }
}

/// Per-status counts over a (filtered) application set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationStats {
    pub total: i64,
    pub applied: i64,
    pub review: i64,
    pub interview: i64,
    pub offer: i64,
    pub closed: i64,
}

/// Folds `GROUP BY status` count rows into the stats block. Unknown status
/// strings count toward the total only.
pub fn stats_from_counts(counts: &[(String, i64)]) -> ApplicationStats {
    let mut stats = ApplicationStats::default();
    for (status, count) in counts {
        stats.total += count;
        match status.as_str() {
            "applied" => stats.applied += count,
            "review" => stats.review += count,
            "interview" => stats.interview += count,
            "offer" => stats.offer += count,
            "closed" => stats.closed += count,
            _ => {}
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in ApplicationStatus::ALL {
            assert_eq!(
                status.as_str().parse::<ApplicationStatus>().unwrap(),
                *status
            );
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("pending".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_withdraw_only_before_interview() {
        assert!(ApplicationStatus::Applied.can_withdraw());
        assert!(ApplicationStatus::Review.can_withdraw());
        assert!(!ApplicationStatus::Interview.can_withdraw());
        assert!(!ApplicationStatus::Offer.can_withdraw());
        assert!(!ApplicationStatus::Closed.can_withdraw());
    }

    #[test]
    fn test_review_label() {
        assert_eq!(ApplicationStatus::Review.label(), "Under Review");
    }

    #[test]
    fn test_stats_fold() {
        let counts = vec![
            ("applied".to_string(), 3),
            ("interview".to_string(), 1),
            ("closed".to_string(), 2),
        ];
        let stats = stats_from_counts(&counts);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.applied, 3);
        assert_eq!(stats.interview, 1);
        assert_eq!(stats.closed, 2);
        assert_eq!(stats.review, 0);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(stats_from_counts(&[]), ApplicationStats::default());
    }
}
