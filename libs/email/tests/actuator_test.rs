//! End-to-end pipeline tests over the mock provider.

use email::models::{AddressRole, EmailAddress, EmailRequest};
use email::provider::MockProvider;
use email::{EmailActuator, MailBody};
use messaging::{Disposition, MessageHandler};
use serde_json::json;

/// Clones of the mock share the capture store, so this handle observes what
/// the actuator-owned provider dispatched.
fn provider_probe(provider: &MockProvider) -> MockProvider {
    provider.clone()
}

#[tokio::test]
async fn test_valid_request_is_sent_and_acked() {
    let provider = MockProvider::new();
    let sent_probe = provider_probe(&provider);
    let actuator = EmailActuator::new(provider);

    let payload = json!({
        "addresses": [{ "value": "a@x.com", "type": "TO" }],
        "subject": "S",
        "is_html": false,
        "content": "C"
    });

    let disposition = actuator.handle(payload.to_string().as_bytes()).await;

    assert_eq!(disposition, Disposition::Ack);

    let sent = sent_probe.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["a@x.com"]);
    assert!(sent[0].cc.is_empty());
    assert!(sent[0].bcc.is_empty());
    assert_eq!(sent[0].subject.as_deref(), Some("S"));
    assert_eq!(sent[0].body, MailBody::Plain("C".to_string()));
}

#[tokio::test]
async fn test_roles_are_partitioned_and_html_preserved() {
    let provider = MockProvider::new();
    let sent_probe = provider_probe(&provider);
    let actuator = EmailActuator::new(provider);

    let payload = json!({
        "addresses": [
            { "value": "a@x.com", "type": "TO" },
            { "value": "b@x.com", "type": "CC" },
            { "value": "c@x.com", "type": "BCC" }
        ],
        "is_html": true,
        "content": "<p>hi</p>"
    });

    let disposition = actuator.handle(payload.to_string().as_bytes()).await;

    assert_eq!(disposition, Disposition::Ack);

    let sent = sent_probe.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["a@x.com"]);
    assert_eq!(sent[0].cc, vec!["b@x.com"]);
    assert_eq!(sent[0].bcc, vec!["c@x.com"]);
    assert_eq!(sent[0].body, MailBody::Html("<p>hi</p>".to_string()));
    assert_eq!(sent[0].subject, None);
}

#[tokio::test]
async fn test_empty_addresses_nacks_without_send_attempt() {
    let provider = MockProvider::new();
    let sent_probe = provider_probe(&provider);
    let actuator = EmailActuator::new(provider);

    let payload = json!({ "addresses": [], "content": "C" });

    let disposition = actuator.handle(payload.to_string().as_bytes()).await;

    match disposition {
        Disposition::Nack(cause) => assert!(cause.contains("addresses")),
        Disposition::Ack => panic!("empty addresses must not be acknowledged"),
    }
    assert_eq!(sent_probe.sent_count().await, 0);
}

#[tokio::test]
async fn test_empty_content_nacks_without_send_attempt() {
    let provider = MockProvider::new();
    let sent_probe = provider_probe(&provider);
    let actuator = EmailActuator::new(provider);

    let payload = json!({ "addresses": [{ "value": "a@x.com" }] });

    let disposition = actuator.handle(payload.to_string().as_bytes()).await;

    match disposition {
        Disposition::Nack(cause) => assert!(cause.contains("content")),
        Disposition::Ack => panic!("empty content must not be acknowledged"),
    }
    assert_eq!(sent_probe.sent_count().await, 0);
}

#[tokio::test]
async fn test_malformed_payload_nacks() {
    let provider = MockProvider::new();
    let sent_probe = provider_probe(&provider);
    let actuator = EmailActuator::new(provider);

    let disposition = actuator.handle(b"{ not json").await;

    match disposition {
        Disposition::Nack(cause) => assert!(cause.contains("cannot decode")),
        Disposition::Ack => panic!("malformed payload must not be acknowledged"),
    }
    assert_eq!(sent_probe.sent_count().await, 0);
}

#[tokio::test]
async fn test_delivery_failure_nacks_with_cause() {
    let actuator = EmailActuator::new(MockProvider::failing("provider rejected"));

    let payload = json!({
        "addresses": [{ "value": "a@x.com" }],
        "content": "C"
    });

    let disposition = actuator.handle(payload.to_string().as_bytes()).await;

    match disposition {
        Disposition::Nack(cause) => {
            assert!(cause.contains("cannot send the e-mail"));
            assert!(cause.contains("provider rejected"));
        }
        Disposition::Ack => panic!("failed delivery must not be acknowledged"),
    }
}

#[tokio::test]
async fn test_unknown_role_defaults_to_primary_group() {
    let provider = MockProvider::new();
    let sent_probe = provider_probe(&provider);
    let actuator = EmailActuator::new(provider);

    let payload = json!({
        "addresses": [{ "value": "a@x.com", "type": "REPLY_TO" }],
        "content": "C"
    });

    let disposition = actuator.handle(payload.to_string().as_bytes()).await;

    assert_eq!(disposition, Disposition::Ack);
    assert!(sent_probe.was_sent_to("a@x.com").await);
}

#[tokio::test]
async fn test_each_message_yields_one_send_attempt() {
    let provider = MockProvider::new();
    let sent_probe = provider_probe(&provider);
    let actuator = EmailActuator::new(provider);

    let payload = json!({
        "addresses": [{ "value": "a@x.com" }],
        "content": "C"
    })
    .to_string();

    for _ in 0..3 {
        actuator.handle(payload.as_bytes()).await;
    }

    assert_eq!(sent_probe.sent_count().await, 3);
}

#[test]
fn test_request_model_round_trips_through_wire_format() {
    let request = EmailRequest {
        addresses: vec![
            EmailAddress::new("a@x.com", AddressRole::To),
            EmailAddress::new("b@x.com", AddressRole::Cc),
        ],
        subject: Some("S".to_string()),
        is_html: true,
        content: "<p>hi</p>".to_string(),
    };

    let encoded = serde_json::to_string(&request).unwrap();
    let decoded: EmailRequest = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, request);
}
