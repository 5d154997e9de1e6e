//! Normalization of validated inquiries for the API, and display formatting
//! of records that come back from it.
//!
//! Nothing here re-validates. Run `InquiryValidatorService` first.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::inquiry::{InquiryPayload, InquiryRecord, InquiryRequest};

const DISPLAY_DATE_TIME_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";
const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

/// Shape a validated request into the exact POST body.
///
/// Trims the description and coerces the quantity to a number; identifiers
/// and the attachment pass through untouched.
pub fn format_inquiry_for_api(request: &InquiryRequest) -> InquiryPayload {
    InquiryPayload {
        quantity: request
            .quantity
            .as_ref()
            .and_then(|q| q.as_number())
            .unwrap_or_default(),
        description: request
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        attachment: request.attachment.as_ref().map(|a| a.content.clone()),
        product_id: request.product_id.clone().unwrap_or_default(),
        buyer_id: request.buyer_id.clone().unwrap_or_default(),
    }
}

/// "October 19, 2026 at 2:05 PM"
pub fn format_inquiry_date(date: &DateTime<Utc>) -> String {
    date.format(DISPLAY_DATE_TIME_FORMAT).to_string()
}

/// "Oct 19, 2026"
pub fn format_inquiry_date_short(date: &DateTime<Utc>) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDisplayDates {
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

pub fn format_record_dates(record: &InquiryRecord) -> RecordDisplayDates {
    RecordDisplayDates {
        created_at: record.created_at.as_ref().map(format_inquiry_date),
        updated_at: record.updated_at.as_ref().map(format_inquiry_date),
    }
}
