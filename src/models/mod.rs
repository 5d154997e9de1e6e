pub mod envelope;
pub mod inquiry;
pub mod product;
pub mod user;

pub use envelope::ApiEnvelope;
pub use inquiry::{
    Attachment, InquiryPayload, InquiryRecord, InquiryRequest, QuantityInput, ValidationResult,
};
pub use product::{CategorySnapshot, ProductSnapshot, SellerInfo};
pub use user::BuyerSnapshot;
