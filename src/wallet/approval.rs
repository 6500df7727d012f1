//! User approval prompts
//!
//! A wallet asks an [`Approver`] before granting account access and before
//! every signature. The terminal front end answers through
//! [`ChannelApprover`]; unattended runs use [`AutoApprove`].

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// What the user is being asked to allow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalKind {
    /// Share the account address with the application
    Access { address: String },
    /// Sign a transaction
    Sign { summary: String },
}

impl ApprovalKind {
    /// One-line prompt text
    pub fn prompt(&self) -> String {
        match self {
            ApprovalKind::Access { address } => {
                format!("Allow stellar-poll to use account {}? [y/N]", address)
            }
            ApprovalKind::Sign { summary } => format!("Sign transaction: {}? [y/N]", summary),
        }
    }
}

/// Decides whether a wallet request goes ahead
#[async_trait]
pub trait Approver: Send + Sync {
    async fn approve(&self, kind: ApprovalKind) -> bool;
}

/// Approves everything without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

#[async_trait]
impl Approver for AutoApprove {
    async fn approve(&self, kind: ApprovalKind) -> bool {
        tracing::debug!(?kind, "Auto-approving wallet request");
        true
    }
}

/// A pending question for the user, answered through `respond`
#[derive(Debug)]
pub struct ApprovalRequest {
    pub kind: ApprovalKind,
    pub respond: oneshot::Sender<bool>,
}

/// Forwards approval requests to whoever owns the receiving end
#[derive(Debug, Clone)]
pub struct ChannelApprover {
    requests: mpsc::Sender<ApprovalRequest>,
}

impl ChannelApprover {
    pub fn new(requests: mpsc::Sender<ApprovalRequest>) -> Self {
        Self { requests }
    }

    /// Create an approver and the receiver the front end listens on
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ApprovalRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl Approver for ChannelApprover {
    async fn approve(&self, kind: ApprovalKind) -> bool {
        let (respond, answer) = oneshot::channel();

        if self
            .requests
            .send(ApprovalRequest { kind, respond })
            .await
            .is_err()
        {
            tracing::warn!("Approval channel closed, treating request as rejected");
            return false;
        }

        // A dropped responder counts as a rejection
        answer.await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_approve() {
        let approver = AutoApprove;
        assert!(
            approver
                .approve(ApprovalKind::Sign {
                    summary: "vote".to_string()
                })
                .await
        );
    }

    #[tokio::test]
    async fn test_channel_approver_answers() {
        let (approver, mut rx) = ChannelApprover::channel(1);

        let responder = tokio::spawn(async move {
            let request = rx.recv().await.unwrap();
            assert!(matches!(request.kind, ApprovalKind::Access { .. }));
            request.respond.send(true).unwrap();
        });

        let approved = approver
            .approve(ApprovalKind::Access {
                address: "GABC".to_string(),
            })
            .await;
        assert!(approved);
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn test_channel_approver_dropped_request_rejects() {
        let (approver, mut rx) = ChannelApprover::channel(1);

        let responder = tokio::spawn(async move {
            let request = rx.recv().await.unwrap();
            drop(request);
        });

        let approved = approver
            .approve(ApprovalKind::Sign {
                summary: "vote".to_string(),
            })
            .await;
        assert!(!approved);
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn test_channel_approver_closed_channel_rejects() {
        let (approver, rx) = ChannelApprover::channel(1);
        drop(rx);

        assert!(
            !approver
                .approve(ApprovalKind::Sign {
                    summary: "vote".to_string()
                })
                .await
        );
    }

    #[test]
    fn test_prompt_text() {
        let kind = ApprovalKind::Sign {
            summary: "vote(2 args)".to_string(),
        };
        assert_eq!(kind.prompt(), "Sign transaction: vote(2 args)? [y/N]");
    }
}
