use crate::config::SaferpayConfig;
use crate::logging::LogSink;
use crate::payments::error::{SaferpayError, SaferpayResult};
use crate::payments::gateway::Gateway;
use crate::payments::params::{encode_form, ParameterCollection};
use crate::payments::transport::HttpTransport;
use crate::payments::types::{fields, Action};
use crate::payments::xml;
use std::sync::Arc;

/// Non-XML characters the completion endpoint puts in front of its fragment.
const COMPLETE_RESPONSE_PREFIX_LEN: usize = 3;

/// Caller choices for [`SaferpayClient::pay_complete`].
#[derive(Debug, Clone, Default)]
pub struct PayCompleteOptions {
    pub action: Action,
    pub credential: Option<String>,
    pub parameters: Option<ParameterCollection>,
    pub response: Option<ParameterCollection>,
}

impl PayCompleteOptions {
    pub fn settlement() -> Self {
        Self::default()
    }

    pub fn with_action(action: Action) -> Self {
        Self {
            action,
            ..Self::default()
        }
    }

    pub fn credential(mut self, password: impl Into<String>) -> Self {
        self.credential = Some(password.into());
        self
    }

    pub fn parameters(mut self, parameters: ParameterCollection) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn response(mut self, response: ParameterCollection) -> Self {
        self.response = Some(response);
        self
    }
}

/// Drives the three hosting calls of a payment: init, confirm, complete.
///
/// The client itself keeps no transaction state; everything a later phase needs
/// travels in the collections returned by the earlier one. Use
/// [`TransactionSession`](crate::payments::session::TransactionSession) to have
/// the ordering enforced.
#[derive(Clone)]
pub struct SaferpayClient {
    gateway: Gateway,
}

impl SaferpayClient {
    /// A client with no transport and a no-op sink.
    pub fn new(config: SaferpayConfig) -> Self {
        Self {
            gateway: Gateway::new(config),
        }
    }

    /// A client wired with the reqwest transport and the `tracing` sink.
    #[cfg(feature = "reqwest-transport")]
    pub fn from_config(config: SaferpayConfig) -> SaferpayResult<Self> {
        config.validate()?;
        let transport = crate::payments::transport::ReqwestTransport::new(&config)?;
        tracing::info!(base_url = %config.base_url, "saferpay client initialized");
        Ok(Self::new(config)
            .with_transport(Arc::new(transport))
            .with_sink(Arc::new(crate::logging::TracingSink)))
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.gateway = self.gateway.with_transport(transport);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.gateway = self.gateway.with_sink(sink);
        self
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Registers the payment and returns the provider's answer, the URL the payer
    /// has to be redirected to.
    pub async fn create_pay_init(&self, parameters: &ParameterCollection) -> SaferpayResult<String> {
        self.gateway
            .send(parameters.request_path(), parameters.serialize())
            .await
    }

    /// Verifies the signed confirmation the payer's browser brought back.
    ///
    /// The attributes of `xml` land in `target` (or a fresh confirm collection),
    /// then `xml` and `signature` are posted back for verification. The
    /// collection is only handed out once the provider accepted it.
    pub async fn verify_pay_confirm(
        &self,
        xml: &str,
        signature: &str,
        target: Option<ParameterCollection>,
    ) -> SaferpayResult<ParameterCollection> {
        let mut confirm = target.unwrap_or_else(ParameterCollection::pay_confirm);
        self.fill_from_xml(&mut confirm, xml)?;

        let body = ParameterCollection::new(confirm.phase())
            .with(fields::DATA, xml)
            .with(fields::SIGNATURE, signature);
        self.gateway
            .send(confirm.request_path(), body.serialize())
            .await?;

        Ok(confirm)
    }

    /// Finishes a verified payment with `options.action` (settlement by default).
    ///
    /// Fails without touching the network when `confirm` carries no `ID` or when
    /// a non-settlement action comes without a password.
    pub async fn pay_complete(
        &self,
        confirm: &ParameterCollection,
        options: PayCompleteOptions,
    ) -> SaferpayResult<ParameterCollection> {
        if confirm.get(fields::ID).is_none() {
            return Err(self.confirm_required());
        }

        let PayCompleteOptions {
            action,
            credential,
            parameters,
            response,
        } = options;

        let mut complete = parameters.unwrap_or_else(ParameterCollection::pay_complete);
        complete
            .carry_from(confirm, &fields::CARRIED)
            .set(fields::ACTION, action.as_str());

        let has_credential = credential.as_deref().is_some_and(|c| !c.is_empty());
        if action.requires_credential() && !has_credential {
            return Err(SaferpayError::CredentialRequired {
                action: action.to_string(),
            });
        }

        // the password goes on the wire only, never into the caller's collection
        let mut pairs = complete.pairs().to_vec();
        if let Some(password) = credential {
            pairs.push((fields::SP_PASSWORD.to_string(), password));
        }

        let raw = self
            .gateway
            .send(complete.request_path(), encode_form(&pairs))
            .await?;

        let mut result = response.unwrap_or_else(ParameterCollection::pay_complete_response);
        self.fill_from_xml(&mut result, strip_complete_prefix(&raw))?;
        Ok(result)
    }

    /// Reports the missing confirmation on the sink and hands back the error.
    pub(crate) fn confirm_required(&self) -> SaferpayError {
        let err = SaferpayError::ConfirmRequired;
        self.gateway.sink().critical(&err.to_string(), Vec::new());
        err
    }

    fn fill_from_xml(&self, target: &mut ParameterCollection, xml: &str) -> SaferpayResult<()> {
        xml::fill_from_xml(target, xml).map_err(|err| {
            self.gateway.sink().critical(
                "Saferpay: Invalid xml received from saferpay",
                vec![("error", err.to_string())],
            );
            err
        })
    }
}

fn strip_complete_prefix(raw: &str) -> &str {
    match raw.char_indices().nth(COMPLETE_RESPONSE_PREFIX_LEN) {
        Some((idx, _)) => &raw[idx..],
        None => "",
    }
}

impl std::fmt::Debug for SaferpayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaferpayClient")
            .field("base_url", &self.gateway.config().base_url)
            .field("transport", &self.gateway.has_transport())
            .finish()
    }
}

impl Default for SaferpayClient {
    fn default() -> Self {
        Self::new(SaferpayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_stripped_by_characters() {
        assert_eq!(strip_complete_prefix("OK:<IDP/>"), "<IDP/>");
        assert_eq!(strip_complete_prefix("äöü<IDP/>"), "<IDP/>");
        assert_eq!(strip_complete_prefix("OK:"), "");
        assert_eq!(strip_complete_prefix("OK"), "");
    }

    #[tokio::test]
    async fn complete_without_id_fails_before_transport_lookup() {
        let client = SaferpayClient::default();
        let confirm = ParameterCollection::pay_confirm().with("AMOUNT", "500");
        let result = client
            .pay_complete(&confirm, PayCompleteOptions::settlement())
            .await;
        assert_eq!(result, Err(SaferpayError::ConfirmRequired));
    }

    #[tokio::test]
    async fn cancel_without_password_is_refused() {
        let client = SaferpayClient::default();
        let confirm = ParameterCollection::pay_confirm().with("ID", "123");
        let result = client
            .pay_complete(
                &confirm,
                PayCompleteOptions::with_action(Action::Cancel).credential(""),
            )
            .await;
        assert_eq!(
            result,
            Err(SaferpayError::CredentialRequired {
                action: "Cancel".to_string()
            })
        );
    }

    #[tokio::test]
    async fn unbound_client_reports_missing_transport() {
        let client = SaferpayClient::default();
        let result = client
            .create_pay_init(&ParameterCollection::pay_init().with("AMOUNT", "1"))
            .await;
        assert_eq!(result, Err(SaferpayError::TransportNotConfigured));
    }
}
