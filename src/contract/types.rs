//! Poll contract data types

use serde::{Deserialize, Serialize};

use super::PollErrorCode;

/// Snapshot of the poll as stored on the contract
///
/// `votes` always has one entry per option, in option order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollState {
    pub question: String,
    pub options: Vec<String>,
    pub votes: Vec<u32>,
}

impl PollState {
    /// Sum of all vote counts
    pub fn total_votes(&self) -> u64 {
        self.votes.iter().map(|&v| u64::from(v)).sum()
    }

    /// Votes for one option; out-of-range indexes count as zero
    pub fn votes_for(&self, index: usize) -> u32 {
        self.votes.get(index).copied().unwrap_or(0)
    }

    /// Share of the total for one option, in percent (0.0 when no votes)
    pub fn percentage(&self, index: usize) -> f64 {
        let total = self.total_votes();
        if total == 0 {
            0.0
        } else {
            f64::from(self.votes_for(index)) / total as f64 * 100.0
        }
    }
}

/// Final result of a write call (vote or poll initialization)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Included in a ledger and executed successfully
    Confirmed { hash: String, ledger: Option<u32> },
    /// Submitted but rejected by the network or failed on-ledger
    Failed { hash: String, reason: String },
    /// Preparation failed locally; nothing was submitted
    Rejected {
        code: Option<PollErrorCode>,
        message: String,
    },
    /// The signer declined; nothing was submitted
    Cancelled,
    /// Still pending when the confirmation window closed
    TimedOut { hash: String },
}

impl SubmitOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmitOutcome::Confirmed { .. })
    }

    /// Message to show the user, if this outcome is an error
    pub fn error_message(&self) -> Option<String> {
        match self {
            SubmitOutcome::Confirmed { .. } | SubmitOutcome::Cancelled => None,
            SubmitOutcome::Rejected { message, .. } => Some(message.clone()),
            SubmitOutcome::Failed { reason, .. } => Some(reason.clone()),
            SubmitOutcome::TimedOut { hash } => Some(format!(
                "Transaction {} is still pending. Check back later.",
                short_hash(hash)
            )),
        }
    }

    /// Transaction hash, when something was submitted
    pub fn hash(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Confirmed { hash, .. }
            | SubmitOutcome::Failed { hash, .. }
            | SubmitOutcome::TimedOut { hash } => Some(hash),
            SubmitOutcome::Rejected { .. } | SubmitOutcome::Cancelled => None,
        }
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(votes: Vec<u32>) -> PollState {
        PollState {
            question: "Favorite?".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            votes,
        }
    }

    #[test]
    fn test_percentages() {
        let state = poll(vec![3, 2]);
        assert_eq!(state.total_votes(), 5);
        assert!((state.percentage(0) - 60.0).abs() < 1e-9);
        assert!((state.percentage(1) - 40.0).abs() < 1e-9);
        assert_eq!(format!("{:.1}", state.percentage(0)), "60.0");
    }

    #[test]
    fn test_no_votes() {
        let state = poll(vec![0, 0]);
        assert_eq!(state.total_votes(), 0);
        assert_eq!(state.percentage(0), 0.0);
        assert_eq!(state.votes_for(7), 0);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(SubmitOutcome::Cancelled.error_message(), None);
        assert!(SubmitOutcome::Confirmed {
            hash: "ab".to_string(),
            ledger: Some(3)
        }
        .is_confirmed());

        let timed_out = SubmitOutcome::TimedOut {
            hash: "0123456789abcdef".to_string(),
        };
        assert_eq!(
            timed_out.error_message().unwrap(),
            "Transaction 0123456789ab is still pending. Check back later."
        );
        assert_eq!(timed_out.hash(), Some("0123456789abcdef"));

        let rejected = SubmitOutcome::Rejected {
            code: Some(PollErrorCode::InvalidOption),
            message: "Invalid option selected.".to_string(),
        };
        assert_eq!(rejected.hash(), None);
        assert_eq!(rejected.error_message().unwrap(), "Invalid option selected.");
    }
}
