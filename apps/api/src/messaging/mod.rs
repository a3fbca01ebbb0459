pub mod handlers;

use std::str::FromStr;

pub const MESSAGE_TYPES: &[&str] = &[
    "initial_contact",
    "follow_up",
    "interview_invite",
    "job_offer",
    "general",
];

/// Delivery status of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Sent,
    Delivered,
    Read,
    Replied,
    Failed,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
            MessageStatus::Failed => "failed",
        }
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(MessageStatus::Sent),
            "delivered" => Ok(MessageStatus::Delivered),
            "read" => Ok(MessageStatus::Read),
            "replied" => Ok(MessageStatus::Replied),
            "failed" => Ok(MessageStatus::Failed),
            other => Err(format!("Unknown message status '{other}'")),
        }
    }
}

/// Subject line for a reply within a thread.
pub fn reply_subject(parent_subject: &str) -> String {
    format!("Re: {parent_subject}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_status_round_trip() {
        for s in ["sent", "delivered", "read", "replied", "failed"] {
            assert_eq!(s.parse::<MessageStatus>().unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("bounced".parse::<MessageStatus>().is_err());
    }

    #[test]
    fn test_reply_subject_prefixes() {
        assert_eq!(reply_subject("Interview slot"), "Re: Interview slot");
    }
}
