use crate::payments::error::SaferpayError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Field names understood by the hosting interface.
pub mod fields {
    pub const ACCOUNTID: &str = "ACCOUNTID";
    pub const AMOUNT: &str = "AMOUNT";
    pub const CURRENCY: &str = "CURRENCY";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const ORDERID: &str = "ORDERID";
    pub const SUCCESSLINK: &str = "SUCCESSLINK";
    pub const FAILLINK: &str = "FAILLINK";
    pub const BACKLINK: &str = "BACKLINK";
    pub const NOTIFYURL: &str = "NOTIFYURL";
    pub const LANGID: &str = "LANGID";
    pub const ID: &str = "ID";
    pub const ACTION: &str = "ACTION";
    pub const DATA: &str = "DATA";
    pub const SIGNATURE: &str = "SIGNATURE";
    pub const SP_PASSWORD: &str = "spPassword";
    pub const STATUS: &str = "STATUS";
    pub const RESULT: &str = "RESULT";
    pub const TOKEN: &str = "TOKEN";

    /// Fields handed from a verified confirmation to the completion request.
    pub const CARRIED: [&str; 3] = [ID, AMOUNT, ACCOUNTID];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    PayInit,
    PayConfirm,
    PayComplete,
    PayCompleteResponse,
}

impl Phase {
    pub fn request_path(&self) -> &'static str {
        match self {
            Phase::PayInit => "/CreatePayInit.asp",
            Phase::PayConfirm => "/VerifyPayConfirm.asp",
            Phase::PayComplete | Phase::PayCompleteResponse => "/PayCompleteV2.asp",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PayInit => "pay_init",
            Phase::PayConfirm => "pay_confirm",
            Phase::PayComplete => "pay_complete",
            Phase::PayCompleteResponse => "pay_complete_response",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operation requested when completing a transaction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Action {
    #[default]
    Settlement,
    Cancel,
    CloseBatch,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Settlement => "Settlement",
            Action::Cancel => "Cancel",
            Action::CloseBatch => "CloseBatch",
        }
    }

    /// Anything but settlement has to be authorized with the account password.
    pub fn requires_credential(&self) -> bool {
        !matches!(self, Action::Settlement)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = SaferpayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "settlement" => Ok(Action::Settlement),
            "cancel" => Ok(Action::Cancel),
            "closebatch" | "close_batch" => Ok(Action::CloseBatch),
            _ => Err(SaferpayError::config(format!(
                "unsupported complete action: {}",
                value
            ))),
        }
    }
}
