//! Webhook delivery of collected and extracted data.
//!
//! Two payload modes share one authenticated POST:
//! - `basic`: keywords plus the collected identifiers
//! - `enhanced`: the basic fields plus images, analysis and content packages
//!
//! Delivery is at-most-once; nothing is retried.

mod client;
mod credentials;
mod payload;

pub use client::{
    build_headers, masked_headers, validate_webhook_url, BatchSendResult, WebhookClient,
    WebhookResponse,
};
pub use credentials::{basic_auth_header, decode_password, encode_password};
pub use payload::{
    build_basic_payload, build_enhanced_payload, build_payload, payload_preview, validate_payload,
    BasicPayload, EnhancedPayload, ExtractionData, PayloadValidation, TestPayload,
};
