use crate::payments::client::{PayCompleteOptions, SaferpayClient};
use crate::payments::error::{SaferpayError, SaferpayResult};
use crate::payments::params::ParameterCollection;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Uninitialized,
    Initialized,
    Confirmed,
    Completed,
}

impl TransactionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::Uninitialized => "uninitialized",
            TransactionState::Initialized => "initialized",
            TransactionState::Confirmed => "confirmed",
            TransactionState::Completed => "completed",
        }
    }

    fn allows(&self, operation: Operation) -> bool {
        matches!(
            (self, operation),
            (TransactionState::Uninitialized, Operation::Initialize)
                | (TransactionState::Uninitialized, Operation::Confirm)
                | (TransactionState::Initialized, Operation::Confirm)
                | (TransactionState::Confirmed, Operation::Complete)
        )
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Initialize,
    Confirm,
    Complete,
}

impl Operation {
    fn as_str(&self) -> &'static str {
        match self {
            Operation::Initialize => "initialize",
            Operation::Confirm => "confirm",
            Operation::Complete => "complete",
        }
    }
}

/// One payment's walk through init → confirm → complete.
///
/// The session owns its collections and borrows the (shareable) client, so
/// parallel payments just use one session each. A failed phase leaves the state
/// where it was.
#[derive(Debug)]
pub struct TransactionSession<'a> {
    client: &'a SaferpayClient,
    state: TransactionState,
    redirect: Option<String>,
    confirmation: Option<ParameterCollection>,
    completion: Option<ParameterCollection>,
}

impl<'a> TransactionSession<'a> {
    pub fn new(client: &'a SaferpayClient) -> Self {
        Self {
            client,
            state: TransactionState::Uninitialized,
            redirect: None,
            confirmation: None,
            completion: None,
        }
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Redirect URL returned by the init call.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn confirmation(&self) -> Option<&ParameterCollection> {
        self.confirmation.as_ref()
    }

    pub fn completion(&self) -> Option<&ParameterCollection> {
        self.completion.as_ref()
    }

    pub async fn initialize(&mut self, parameters: &ParameterCollection) -> SaferpayResult<&str> {
        self.ensure(Operation::Initialize)?;
        let redirect = self.client.create_pay_init(parameters).await?;
        self.transition(TransactionState::Initialized);
        Ok(self.redirect.insert(redirect).as_str())
    }

    /// Confirm may also be the first call, when the init happened elsewhere.
    pub async fn confirm(&mut self, xml: &str, signature: &str) -> SaferpayResult<&ParameterCollection> {
        self.ensure(Operation::Confirm)?;
        let confirmation = self.client.verify_pay_confirm(xml, signature, None).await?;
        self.transition(TransactionState::Confirmed);
        Ok(self.confirmation.insert(confirmation))
    }

    pub async fn complete(&mut self, options: PayCompleteOptions) -> SaferpayResult<&ParameterCollection> {
        let confirmation = match self.confirmation.as_ref() {
            Some(confirmation) => confirmation,
            None => return Err(self.client.confirm_required()),
        };
        self.ensure(Operation::Complete)?;
        let completion = self.client.pay_complete(confirmation, options).await?;
        self.transition(TransactionState::Completed);
        Ok(self.completion.insert(completion))
    }

    fn ensure(&self, operation: Operation) -> SaferpayResult<()> {
        if self.state.allows(operation) {
            Ok(())
        } else {
            Err(SaferpayError::InvalidState {
                state: self.state.to_string(),
                operation: operation.as_str(),
            })
        }
    }

    fn transition(&mut self, next: TransactionState) {
        debug!(from = %self.state, to = %next, "transaction state changed");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_phase_order() {
        use TransactionState::*;
        assert!(Uninitialized.allows(Operation::Initialize));
        assert!(Uninitialized.allows(Operation::Confirm));
        assert!(Initialized.allows(Operation::Confirm));
        assert!(Confirmed.allows(Operation::Complete));

        assert!(!Initialized.allows(Operation::Initialize));
        assert!(!Initialized.allows(Operation::Complete));
        assert!(!Confirmed.allows(Operation::Confirm));
        assert!(!Completed.allows(Operation::Complete));
        assert!(!Completed.allows(Operation::Initialize));
    }

    #[tokio::test]
    async fn complete_before_confirm_is_refused() {
        let client = SaferpayClient::default();
        let mut session = TransactionSession::new(&client);
        let result = session.complete(PayCompleteOptions::settlement()).await;
        assert!(matches!(result, Err(SaferpayError::ConfirmRequired)));
        assert_eq!(session.state(), TransactionState::Uninitialized);
    }

    #[tokio::test]
    async fn failed_phase_keeps_state() {
        let client = SaferpayClient::default();
        let mut session = TransactionSession::new(&client);
        let result = session
            .initialize(&ParameterCollection::pay_init().with("AMOUNT", "1"))
            .await;
        assert!(matches!(result, Err(SaferpayError::TransportNotConfigured)));
        assert_eq!(session.state(), TransactionState::Uninitialized);
        assert!(session.redirect().is_none());
    }
}
