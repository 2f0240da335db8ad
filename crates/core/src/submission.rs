//! Payload posted to the form relay when an order is submitted.
//!
//! The relay forwards a plain-text e-mail with the PDF summary attached to
//! the studio inbox. Credentials are supplied by the caller through
//! [`RelaySettings`]; nothing secret is compiled in.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::document::attachment_file_name;
use crate::order::OrderForm;
use crate::review::ReviewSummary;

/// MIME type of the attached summary.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Relay account and routing settings.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub access_key: String,
    /// Studio inbox that receives the request.
    pub recipient: String,
    /// Display name used as the e-mail sender.
    pub sender_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayAttachment {
    pub filename: String,
    pub content_type: &'static str,
    /// Base64-encoded file content.
    pub content: String,
}

/// JSON body accepted by the form relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPayload {
    pub access_key: String,
    pub from_name: String,
    pub subject: String,
    pub email: String,
    pub replyto: String,
    pub message: String,
    pub attachment: RelayAttachment,
}

impl RelayPayload {
    pub fn build(
        form: &OrderForm,
        summary: &ReviewSummary,
        pdf: &[u8],
        settings: &RelaySettings,
    ) -> Self {
        let name = form.name.trim();
        let message = format!(
            "New invitation request from {name}\n\n{}\n\nThe full summary is attached as a PDF.",
            summary.to_plain_text()
        );
        Self {
            access_key: settings.access_key.clone(),
            from_name: settings.sender_name.clone(),
            subject: format!("New invitation request from {name}"),
            email: settings.recipient.clone(),
            replyto: form.email.trim().to_string(),
            message,
            attachment: RelayAttachment {
                filename: attachment_file_name(name),
                content_type: PDF_CONTENT_TYPE,
                content: STANDARD.encode(pdf),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::DeliveryFormat;
    use crate::pricing::calculate_price;
    use chrono::NaiveDate;

    fn settings() -> RelaySettings {
        RelaySettings {
            access_key: "test-key".into(),
            recipient: "studio@example.com".into(),
            sender_name: "Invitation Studio".into(),
        }
    }

    #[test]
    fn builds_payload_from_form() {
        let form = OrderForm {
            name: "Ana Lopez".into(),
            email: " ana@example.com ".into(),
            delivery_formats: vec![DeliveryFormat::Logo],
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let summary = ReviewSummary::build(&form, &calculate_price(&form, today));
        let payload = RelayPayload::build(&form, &summary, b"%PDF", &settings());

        assert_eq!(payload.access_key, "test-key");
        assert_eq!(payload.subject, "New invitation request from Ana Lopez");
        assert_eq!(payload.email, "studio@example.com");
        assert_eq!(payload.replyto, "ana@example.com");
        assert!(payload.message.contains("Formats: Logo"));
        assert_eq!(payload.attachment.filename, "invitation-request-ana-lopez.pdf");
        assert_eq!(payload.attachment.content, "JVBERg==");
    }

    #[test]
    fn serializes_expected_fields() {
        let form = OrderForm {
            name: "Ana".into(),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let summary = ReviewSummary::build(&form, &calculate_price(&form, today));
        let json = serde_json::to_value(RelayPayload::build(&form, &summary, b"", &settings()))
            .unwrap();
        for key in ["access_key", "from_name", "subject", "email", "replyto", "message"] {
            assert!(json[key].is_string(), "missing {key}");
        }
        assert_eq!(json["attachment"]["content_type"], "application/pdf");
    }
}
