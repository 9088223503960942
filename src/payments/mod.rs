pub mod client;
pub mod error;
pub mod gateway;
pub mod params;
pub mod session;
pub mod transport;
pub mod types;
pub mod xml;

pub use client::{PayCompleteOptions, SaferpayClient};
pub use error::{SaferpayError, SaferpayResult};
pub use gateway::Gateway;
pub use params::{ParameterCollection, PayInitBuilder};
pub use session::{TransactionSession, TransactionState};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use types::{fields, Action, Phase};

#[cfg(feature = "reqwest-transport")]
pub use transport::ReqwestTransport;
