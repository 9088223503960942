//! Client for the Saferpay hosting interface.
//!
//! A payment runs in three calls: `CreatePayInit` registers it and yields the
//! payer's redirect URL, `VerifyPayConfirm` checks the signed confirmation the
//! payer comes back with, and `PayCompleteV2` settles (or cancels) it. Requests
//! are form-encoded posts; answers are single-element XML fragments whose
//! attributes carry the data.

pub mod config;
pub mod logging;
pub mod payments;

pub use payments::{
    fields, Action, ParameterCollection, PayCompleteOptions, PayInitBuilder, SaferpayClient,
    SaferpayError, SaferpayResult, TransactionSession, TransactionState,
};
