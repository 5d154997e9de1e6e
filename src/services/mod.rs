pub mod inquiry_api_client;
pub mod inquiry_formatter;
pub mod inquiry_pipeline;
pub mod inquiry_store;
pub mod inquiry_validator_service;

pub use inquiry_api_client::{InquiryApiClient, InquiryTransport};
pub use inquiry_formatter::{
    format_inquiry_date, format_inquiry_date_short, format_inquiry_for_api, format_record_dates,
    RecordDisplayDates,
};
pub use inquiry_pipeline::InquiryPipeline;
pub use inquiry_store::{SubmissionPhase, SubmissionState, SubmissionStore};
pub use inquiry_validator_service::InquiryValidatorService;
