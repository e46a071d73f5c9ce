// ============================================================================
// Notification Gateway
// ============================================================================
//
// One request, one publish:
//   parse ids -> resolve sender, recipient -> encode -> publish(key = toID)
//
// The first failure ends the request. Nothing is retried and nothing is
// published unless every earlier step succeeded.
//
// ============================================================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::codec;
use crate::directory::UserDirectory;
use crate::error::{AppError, AppResult};
use crate::models::Notification;
use crate::publisher::{PublishReceipt, Publisher};

/// Fields of `POST /send`.
///
/// Missing fields are empty strings, which then fail id parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendForm {
    pub from_id: String,
    pub to_id: String,
    pub message: String,
}

impl SendForm {
    /// Build from decoded `name=value` pairs; the first value of a repeated
    /// field wins and unknown fields are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut from_id: Option<String> = None;
        let mut to_id: Option<String> = None;
        let mut message: Option<String> = None;

        for (name, value) in pairs {
            let slot = match name.as_ref() {
                "fromID" => &mut from_id,
                "toID" => &mut to_id,
                "message" => &mut message,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }

        Self {
            from_id: from_id.unwrap_or_default(),
            to_id: to_id.unwrap_or_default(),
            message: message.unwrap_or_default(),
        }
    }
}

pub struct NotificationGateway {
    directory: Arc<UserDirectory>,
    publisher: Arc<dyn Publisher>,
    topic: String,
}

impl NotificationGateway {
    pub fn new(
        directory: Arc<UserDirectory>,
        publisher: Arc<dyn Publisher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            publisher,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Validate, resolve, encode and publish a single notification.
    pub async fn send(&self, form: &SendForm) -> AppResult<PublishReceipt> {
        let from_id = parse_id("fromID", &form.from_id)?;
        let to_id = parse_id("toID", &form.to_id)?;

        let from = self.directory.lookup(from_id)?.clone();
        let to = self.directory.lookup(to_id)?.clone();

        let notification = Notification {
            from,
            to,
            message: form.message.clone(),
        };
        let payload = codec::encode(&notification)?;

        // Same recipient, same partition: per-recipient ordering.
        let key = to_id.to_string();
        debug!(from_id, to_id, bytes = payload.len(), "Publishing notification");

        let receipt = self.publisher.publish(&self.topic, &key, &payload).await?;

        info!(
            from_id,
            to_id,
            partition = receipt.partition,
            offset = receipt.offset,
            "Notification sent"
        );

        Ok(receipt)
    }
}

fn parse_id(field: &str, raw: &str) -> AppResult<i64> {
    raw.parse().map_err(|e| {
        AppError::invalid_input(format!(
            "failed to parse ID from form value {}: {}",
            field, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::publisher::MemoryPublisher;

    fn gateway(publisher: Arc<MemoryPublisher>) -> NotificationGateway {
        let directory =
            UserDirectory::new(vec![User::new(1, "Emma"), User::new(2, "Bruno")]).unwrap();
        NotificationGateway::new(Arc::new(directory), publisher, "notifications")
    }

    fn form(from_id: &str, to_id: &str, message: &str) -> SendForm {
        SendForm {
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_publishes_keyed_by_recipient() {
        let publisher = Arc::new(MemoryPublisher::new(3));
        let gateway = gateway(publisher.clone());

        gateway.send(&form("1", "2", "hi")).await.unwrap();

        let records = publisher.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, gateway.topic());
        assert_eq!(records[0].key, "2");

        let decoded = codec::decode(&records[0].value).unwrap();
        assert_eq!(decoded.from, User::new(1, "Emma"));
        assert_eq!(decoded.to, User::new(2, "Bruno"));
        assert_eq!(decoded.message, "hi");
    }

    #[tokio::test]
    async fn test_empty_message_is_allowed() {
        let publisher = Arc::new(MemoryPublisher::default());
        let gateway = gateway(publisher.clone());

        gateway.send(&form("2", "1", "")).await.unwrap();
        assert_eq!(publisher.records()[0].key, "1");
    }

    #[tokio::test]
    async fn test_bad_sender_id_short_circuits() {
        let publisher = Arc::new(MemoryPublisher::default());
        let gateway = gateway(publisher.clone());

        // toID is also invalid; the sender error is the one reported.
        let err = gateway.send(&form("abc", "xyz", "hi")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("fromID"));
        assert_eq!(publisher.attempts(), 0);
    }

    #[tokio::test]
    async fn test_missing_recipient_id() {
        let publisher = Arc::new(MemoryPublisher::default());
        let gateway = gateway(publisher.clone());

        let err = gateway.send(&form("1", "", "hi")).await.unwrap_err();
        assert!(err.to_string().contains("toID"));
        assert_eq!(publisher.attempts(), 0);
    }

    #[tokio::test]
    async fn test_unknown_users_are_not_published() {
        let publisher = Arc::new(MemoryPublisher::default());
        let gateway = gateway(publisher.clone());

        let err = gateway.send(&form("9", "2", "hi")).await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound(9)));

        // Sender resolves, recipient does not.
        let err = gateway.send(&form("1", "9", "hi")).await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound(9)));

        assert_eq!(publisher.attempts(), 0);
    }

    #[tokio::test]
    async fn test_publish_failure_is_attempted_once() {
        let publisher = Arc::new(MemoryPublisher::default());
        publisher.fail_with("Message production error: MessageTimedOut");
        let gateway = gateway(publisher.clone());

        let err = gateway.send(&form("1", "2", "hi")).await.unwrap_err();
        assert!(matches!(err, AppError::Publish(_)));
        assert!(err.to_string().contains("MessageTimedOut"));
        assert_eq!(publisher.attempts(), 1);
    }

    #[test]
    fn test_from_pairs_keeps_first_value() {
        let form = SendForm::from_pairs([
            ("fromID", "1"),
            ("other", "x"),
            ("fromID", "2"),
            ("toID", "2"),
            ("message", ""),
            ("message", "ignored"),
        ]);
        assert_eq!(
            form,
            SendForm {
                from_id: "1".to_string(),
                to_id: "2".to_string(),
                message: String::new(),
            }
        );
    }

    #[test]
    fn test_from_pairs_missing_fields_are_empty() {
        let form = SendForm::from_pairs(Vec::<(String, String)>::new());
        assert_eq!(form, SendForm::default());
    }

    #[test]
    fn test_parse_id_accepts_signed_integers() {
        assert_eq!(parse_id("fromID", "-3").unwrap(), -3);
        assert_eq!(parse_id("fromID", "+5").unwrap(), 5);
        assert!(parse_id("fromID", " 5").is_err());
        assert!(parse_id("fromID", "1.0").is_err());
    }
}
