use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::product::ProductSnapshot;
use crate::models::user::BuyerSnapshot;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Quantity as typed into a form: either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
}

impl QuantityInput {
    /// Numeric value, or `None` when the text is not an integer.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            QuantityInput::Number(value) => Some(*value),
            QuantityInput::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl From<i64> for QuantityInput {
    fn from(value: i64) -> Self {
        QuantityInput::Number(value)
    }
}

impl From<&str> for QuantityInput {
    fn from(value: &str) -> Self {
        QuantityInput::Text(value.to_string())
    }
}

/// File attached to an inquiry.
///
/// `content` is the exact string sent on the wire, a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub mime_type: String,
    pub size: u64,
    pub content: String,
}

impl Attachment {
    pub fn from_bytes(file_name: Option<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        let mime_type = mime_type.into();
        let content = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));

        Self {
            file_name,
            mime_type,
            size: bytes.len() as u64,
            content,
        }
    }

    /// Rebuild attachment metadata from its wire form.
    pub fn from_data_url(content: &str) -> Self {
        let parsed = content
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .map(|(header, body)| {
                let mime_type = header.trim_end_matches(";base64");
                let size = STANDARD
                    .decode(body)
                    .map(|bytes| bytes.len() as u64)
                    .unwrap_or(body.len() as u64);
                (mime_type.to_string(), size)
            });

        let (mime_type, size) = match parsed {
            Some((mime_type, size)) if !mime_type.is_empty() => (mime_type, size),
            Some((_, size)) => (FALLBACK_MIME_TYPE.to_string(), size),
            None => (FALLBACK_MIME_TYPE.to_string(), content.len() as u64),
        };

        Self {
            file_name: None,
            mime_type,
            size,
            content: content.to_string(),
        }
    }
}

/// Candidate inquiry as collected from a form. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRequest {
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

impl InquiryRequest {
    pub fn new(
        quantity: i64,
        description: impl Into<String>,
        buyer_id: impl Into<String>,
        product_id: impl Into<String>,
    ) -> Self {
        Self {
            quantity: Some(QuantityInput::Number(quantity)),
            description: Some(description.into()),
            buyer_id: Some(buyer_id.into()),
            product_id: Some(product_id.into()),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Body of `POST inquiry/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPayload {
    pub quantity: i64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    pub product_id: String,
    pub buyer_id: String,
}

impl From<InquiryPayload> for InquiryRequest {
    fn from(payload: InquiryPayload) -> Self {
        Self {
            quantity: Some(QuantityInput::Number(payload.quantity)),
            description: Some(payload.description),
            buyer_id: Some(payload.buyer_id),
            product_id: Some(payload.product_id),
            attachment: payload.attachment.as_deref().map(Attachment::from_data_url),
        }
    }
}

/// Inquiry as stored by the server, joined with product and buyer snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
    pub product_id: String,
    pub buyer_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    // Nested objects for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<BuyerSnapshot>,
}

/// Outcome of validating an `InquiryRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
