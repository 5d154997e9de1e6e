/// Observable state container for inquiry create/read operations
///
/// One `SubmissionStore` is created per session and shared by handle
/// (`Arc<SubmissionStore<_>>`). Observers subscribe to a `watch` channel and
/// see every state write. Records enter `records` only after the server has
/// acknowledged them, so no rollback is ever needed.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::watch;

use crate::error_handling::{InquiryError, Result};
use crate::metrics;
use crate::models::inquiry::{InquiryPayload, InquiryRecord};
use crate::services::inquiry_api_client::InquiryTransport;
use crate::utils::log_sanitizer::{description_preview, sanitize_for_log};

pub const CREATE_SUCCESS_MESSAGE: &str = "Inquiry created successfully";
pub const CREATE_FAILED_FALLBACK: &str = "Failed to create inquiry";
pub const FETCH_LIST_FAILED_FALLBACK: &str = "Failed to fetch inquiries";
pub const FETCH_ONE_FAILED_FALLBACK: &str = "Failed to fetch inquiry";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Creating,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionState {
    pub is_creating: bool,
    pub is_loading: bool,
    /// Newest first.
    pub records: Vec<InquiryRecord>,
    pub current_record: Option<InquiryRecord>,
    pub error: Option<String>,
    pub success_message: Option<String>,
}

impl SubmissionState {
    pub fn phase(&self) -> SubmissionPhase {
        if self.is_creating {
            SubmissionPhase::Creating
        } else if self.error.is_some() {
            SubmissionPhase::Failed
        } else if self.success_message.is_some() {
            SubmissionPhase::Succeeded
        } else {
            SubmissionPhase::Idle
        }
    }

    // `error` and `success_message` are never both set.
    fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.success_message = None;
    }

    fn set_success(&mut self, message: &str) {
        self.success_message = Some(message.to_string());
        self.error = None;
    }
}

pub struct SubmissionStore<T> {
    transport: T,
    state: watch::Sender<SubmissionState>,
    /// Single-flight token for creates. Only touched under the watch lock.
    in_flight: AtomicBool,
    /// Bumped by `reset`; a create started in an older epoch leaves state alone.
    epoch: AtomicU64,
}

impl<T: InquiryTransport> SubmissionStore<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(SubmissionState::default());
        Self {
            transport,
            state,
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Submit a formatted inquiry.
    ///
    /// Only one create may be in flight, even across `reset`; a second call
    /// returns `SubmissionInFlight` without dispatching or touching state.
    /// Failures are always written to `error` as well as returned. A create
    /// that completes after `reset` returns its result but does not write it
    /// into the fresh state.
    pub async fn create_inquiry(&self, payload: &InquiryPayload) -> Result<InquiryRecord> {
        let mut started_epoch = None;
        self.state.send_if_modified(|state| {
            if self.in_flight.load(Ordering::SeqCst) {
                return false;
            }
            self.in_flight.store(true, Ordering::SeqCst);
            started_epoch = Some(self.epoch.load(Ordering::SeqCst));
            state.error = None;
            state.success_message = None;
            state.is_creating = true;
            true
        });

        let Some(started_epoch) = started_epoch else {
            metrics::record_submission(metrics::OUTCOME_REJECTED_IN_FLIGHT);
            tracing::warn!(
                product_id = %sanitize_for_log(&payload.product_id),
                "Inquiry submission rejected: another submission is in flight"
            );
            return Err(InquiryError::SubmissionInFlight);
        };

        let mut guard = CreatingGuard::new(&self.state, &self.in_flight);

        tracing::info!(
            product_id = %sanitize_for_log(&payload.product_id),
            buyer_id = %sanitize_for_log(&payload.buyer_id),
            quantity = payload.quantity,
            description = %description_preview(&payload.description),
            has_attachment = payload.attachment.is_some(),
            "Submitting inquiry"
        );

        let result = self.transport.create_inquiry(payload).await;
        guard.disarm();

        let mut applied = false;
        self.state.send_modify(|state| {
            if self.epoch.load(Ordering::SeqCst) == started_epoch {
                match &result {
                    Ok(record) => {
                        state.records.insert(0, record.clone());
                        state.set_success(CREATE_SUCCESS_MESSAGE);
                    }
                    Err(e) => state.set_error(e.user_message(CREATE_FAILED_FALLBACK)),
                }
                applied = true;
            }
            state.is_creating = false;
            self.in_flight.store(false, Ordering::SeqCst);
        });

        if !applied {
            tracing::info!("Inquiry create finished after a store reset; state left untouched");
        }

        match result {
            Ok(record) => {
                metrics::record_submission(metrics::OUTCOME_SUCCEEDED);
                tracing::info!(inquiry_id = %sanitize_for_log(&record.id), "Inquiry created");
                Ok(record)
            }
            Err(e) => {
                metrics::record_submission(metrics::OUTCOME_FAILED);
                tracing::warn!(
                    "Inquiry creation failed: {}",
                    sanitize_for_log(&e.user_message(CREATE_FAILED_FALLBACK))
                );
                Err(e)
            }
        }
    }

    /// Replace `records` with every inquiry visible to the caller.
    pub async fn fetch_all_inquiries(&self) -> Result<Vec<InquiryRecord>> {
        self.begin_loading();
        let result = self.transport.list_inquiries().await;
        metrics::record_fetch("all", result.is_ok());
        self.settle(result, FETCH_LIST_FAILED_FALLBACK, |state, records| {
            state.records = records;
        })
    }

    /// Load a single inquiry into `current_record`.
    pub async fn fetch_inquiry_by_id(&self, id: &str) -> Result<InquiryRecord> {
        self.begin_loading();
        let result = self.transport.get_inquiry(id).await;
        metrics::record_fetch("by_id", result.is_ok());
        self.settle(result, FETCH_ONE_FAILED_FALLBACK, |state, record| {
            state.current_record = Some(record);
        })
    }

    /// Replace `records` with the inquiries submitted by one buyer.
    pub async fn fetch_inquiries_by_buyer(&self, buyer_id: &str) -> Result<Vec<InquiryRecord>> {
        self.begin_loading();
        let result = self.transport.list_inquiries_by_buyer(buyer_id).await;
        metrics::record_fetch("by_buyer", result.is_ok());
        self.settle(result, FETCH_LIST_FAILED_FALLBACK, |state, records| {
            state.records = records;
        })
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.error.take().is_some());
    }

    pub fn clear_success(&self) {
        self.state.send_if_modified(|state| state.success_message.take().is_some());
    }

    pub fn clear_current_record(&self) {
        self.state.send_if_modified(|state| state.current_record.take().is_some());
    }

    /// Restore the initial empty state.
    ///
    /// A pending create stays pending: `is_creating` is kept and the
    /// single-flight guard is not released.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            let initial = SubmissionState {
                is_creating: self.in_flight.load(Ordering::SeqCst),
                ..SubmissionState::default()
            };
            if *state == initial {
                return false;
            }
            *state = initial;
            true
        });
    }

    fn begin_loading(&self) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    fn settle<R: Clone>(
        &self,
        result: Result<R>,
        fallback: &str,
        apply: impl FnOnce(&mut SubmissionState, R),
    ) -> Result<R> {
        match result {
            Ok(value) => {
                let stored = value.clone();
                self.state.send_modify(|state| {
                    apply(state, stored);
                    state.is_loading = false;
                });
                Ok(value)
            }
            Err(e) => {
                let message = e.user_message(fallback);
                tracing::warn!("Inquiry fetch failed: {}", sanitize_for_log(&message));
                self.state.send_modify(|state| {
                    state.set_error(message);
                    state.is_loading = false;
                });
                Err(e)
            }
        }
    }
}

/// Releases the single-flight token if a create future is dropped before the response arrives.
struct CreatingGuard<'a> {
    state: &'a watch::Sender<SubmissionState>,
    in_flight: &'a AtomicBool,
    armed: bool,
}

impl<'a> CreatingGuard<'a> {
    fn new(state: &'a watch::Sender<SubmissionState>, in_flight: &'a AtomicBool) -> Self {
        Self {
            state,
            in_flight,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CreatingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let in_flight = self.in_flight;
            self.state.send_modify(|state| {
                state.is_creating = false;
                in_flight.store(false, Ordering::SeqCst);
            });
        }
    }
}
