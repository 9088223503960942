use crate::payments::error::{SaferpayError, SaferpayResult};
use crate::payments::types::{fields, Phase};

/// Ordered bag of request/response fields bound to one phase of a transaction.
///
/// Field names are case-sensitive. Setting an existing name overwrites the value
/// in place, so serialization order is the order names were first set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterCollection {
    phase: Phase,
    fields: Vec<(String, String)>,
}

impl ParameterCollection {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            fields: Vec::new(),
        }
    }

    pub fn pay_init() -> Self {
        Self::new(Phase::PayInit)
    }

    pub fn pay_confirm() -> Self {
        Self::new(Phase::PayConfirm)
    }

    pub fn pay_complete() -> Self {
        Self::new(Phase::PayComplete)
    }

    pub fn pay_complete_response() -> Self {
        Self::new(Phase::PayCompleteResponse)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn request_path(&self) -> &'static str {
        self.phase.request_path()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.fields.iter().position(|(k, _)| k == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Takes the named fields over from `other`. A name absent in `other` is
    /// removed here as well, so no value of our own survives for it.
    pub fn carry_from(&mut self, other: &ParameterCollection, names: &[&str]) -> &mut Self {
        for name in names {
            match other.get(name) {
                Some(value) => {
                    self.set(*name, value);
                }
                None => {
                    self.remove(name);
                }
            }
        }
        self
    }

    /// `application/x-www-form-urlencoded` body for this collection.
    pub fn serialize(&self) -> String {
        encode_form(&self.fields)
    }

    pub fn from_form(phase: Phase, encoded: &str) -> SaferpayResult<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(encoded)
            .map_err(|e| SaferpayError::invalid_response_format(format!("invalid form body: {}", e)))?;
        let mut collection = Self::new(phase);
        for (name, value) in pairs {
            collection.set(name, value);
        }
        Ok(collection)
    }

    pub(crate) fn pairs(&self) -> &[(String, String)] {
        &self.fields
    }
}

pub(crate) fn encode_form(pairs: &[(String, String)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap_or_default()
}

/// Typed front end for the pay-init collection.
#[derive(Debug, Clone)]
pub struct PayInitBuilder {
    params: ParameterCollection,
}

impl Default for PayInitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PayInitBuilder {
    pub fn new() -> Self {
        Self {
            params: ParameterCollection::pay_init(),
        }
    }

    pub fn account_id(self, value: impl Into<String>) -> Self {
        self.field(fields::ACCOUNTID, value)
    }

    /// Amount in minor units, as the provider expects it.
    pub fn amount(self, minor_units: u64) -> Self {
        self.field(fields::AMOUNT, minor_units.to_string())
    }

    pub fn currency(self, value: impl Into<String>) -> Self {
        self.field(fields::CURRENCY, value)
    }

    pub fn description(self, value: impl Into<String>) -> Self {
        self.field(fields::DESCRIPTION, value)
    }

    pub fn order_id(self, value: impl Into<String>) -> Self {
        self.field(fields::ORDERID, value)
    }

    pub fn success_link(self, value: impl Into<String>) -> Self {
        self.field(fields::SUCCESSLINK, value)
    }

    pub fn fail_link(self, value: impl Into<String>) -> Self {
        self.field(fields::FAILLINK, value)
    }

    pub fn back_link(self, value: impl Into<String>) -> Self {
        self.field(fields::BACKLINK, value)
    }

    pub fn notify_url(self, value: impl Into<String>) -> Self {
        self.field(fields::NOTIFYURL, value)
    }

    pub fn lang_id(self, value: impl Into<String>) -> Self {
        self.field(fields::LANGID, value)
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.set(name, value);
        self
    }

    pub fn build(self) -> ParameterCollection {
        self.params
    }
}
