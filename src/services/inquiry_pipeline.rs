use std::sync::Arc;

use crate::error_handling::{InquiryError, Result};
use crate::metrics;
use crate::models::inquiry::{InquiryRecord, InquiryRequest};
use crate::services::inquiry_api_client::InquiryTransport;
use crate::services::inquiry_formatter::format_inquiry_for_api;
use crate::services::inquiry_store::SubmissionStore;
use crate::services::inquiry_validator_service::InquiryValidatorService;

/// Validate, format and submit an inquiry, in that order.
///
/// Invalid requests never reach the store or the network.
pub struct InquiryPipeline<T> {
    store: Arc<SubmissionStore<T>>,
}

impl<T> Clone for InquiryPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: InquiryTransport> InquiryPipeline<T> {
    pub fn new(store: Arc<SubmissionStore<T>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<SubmissionStore<T>> {
        &self.store
    }

    pub async fn submit(&self, request: &InquiryRequest) -> Result<InquiryRecord> {
        let validation = InquiryValidatorService::validate_inquiry_data(request);
        if !validation.is_valid {
            metrics::record_submission(metrics::OUTCOME_REJECTED_INVALID);
            tracing::info!(errors = validation.errors.len(), "Inquiry rejected by validation");
            return Err(InquiryError::Validation(validation.errors));
        }

        let payload = format_inquiry_for_api(request);
        self.store.create_inquiry(&payload).await
    }
}
