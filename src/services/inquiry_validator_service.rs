/// Client-side inquiry validation
/// Checks required fields, numeric ranges, lengths and attachment constraints
/// before anything is sent to the marketplace API.

use crate::models::inquiry::{Attachment, InquiryRequest, ValidationResult};

/// Largest accepted attachment, in bytes (10 MiB).
pub const MAX_ATTACHMENT_SIZE: u64 = 10 * 1024 * 1024;

pub const MIN_DESCRIPTION_LENGTH: usize = 10;

pub const ALLOWED_ATTACHMENT_TYPES: [&str; 8] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

pub struct InquiryValidatorService;

impl InquiryValidatorService {
    /// Validate a candidate inquiry, collecting every failing rule in order.
    pub fn validate_inquiry_data(request: &InquiryRequest) -> ValidationResult {
        let mut errors = Vec::new();

        // 1. Quantity
        let quantity = request.quantity.as_ref().and_then(|q| q.as_number());
        if quantity.map_or(true, |q| q < 1) {
            errors.push("Quantity must be at least 1".to_string());
        }

        // 2. Description length, counted in characters after trimming
        let description_length = request
            .description
            .as_deref()
            .map(|d| d.trim().chars().count())
            .unwrap_or(0);
        if description_length < MIN_DESCRIPTION_LENGTH {
            errors.push(format!(
                "Description must be at least {} characters",
                MIN_DESCRIPTION_LENGTH
            ));
        }

        // 3. Identifiers
        if Self::is_blank(request.buyer_id.as_deref()) {
            errors.push("Buyer ID is required".to_string());
        }
        if Self::is_blank(request.product_id.as_deref()) {
            errors.push("Product ID is required".to_string());
        }

        // 4. Attachment, only when present
        if let Some(ref attachment) = request.attachment {
            errors.extend(Self::validate_attachment(attachment));
        }

        ValidationResult::from_errors(errors)
    }

    /// Size and type checks for a single attachment.
    pub fn validate_attachment(attachment: &Attachment) -> Vec<String> {
        let mut errors = Vec::new();

        if attachment.size > MAX_ATTACHMENT_SIZE {
            errors.push("Attachment size must be less than 10MB".to_string());
        }

        if !Self::is_allowed_mime_type(&attachment.mime_type) {
            errors.push(
                "Invalid file type. Allowed types: PDF, DOC, DOCX, XLS, XLSX, JPEG, PNG".to_string(),
            );
        }

        errors
    }

    pub fn is_allowed_mime_type(mime_type: &str) -> bool {
        let normalized = mime_type.trim().to_ascii_lowercase();
        ALLOWED_ATTACHMENT_TYPES.contains(&normalized.as_str())
    }

    fn is_blank(value: Option<&str>) -> bool {
        value.map_or(true, |v| v.trim().is_empty())
    }
}
