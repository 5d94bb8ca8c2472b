//! Pappers company registry client.
//!
//! Fetches the full company record for a SIREN from the Pappers REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use pappers_client::PappersClient;
//! use registry_common::Siren;
//!
//! let client = PappersClient::from_env()?;
//! let record = client.fetch_record(&Siren::parse("552100554")?).await?;
//! println!("{}", record["nom_entreprise"]);
//! ```

pub mod config;

pub use config::PappersConfig;

use registry_common::{decode, HttpTransport, ResponseBody, Result, RetryPolicy, Siren};
use serde_json::{json, Value};
use tracing::{debug, warn};

const SERVICE: &str = "pappers";
const USER_AGENT: &str = concat!("pappers-client/", env!("CARGO_PKG_VERSION"));

pub struct PappersClient {
    transport: HttpTransport,
    config: PappersConfig,
}

impl PappersClient {
    pub fn new(config: PappersConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(USER_AGENT, config.timeout)?;
        Ok(Self { transport, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(PappersConfig::from_env()?)
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.transport = self.transport.with_retry_policy(policy);
        self
    }

    /// Full company record.
    ///
    /// A successful response that is not JSON yields an empty object.
    pub async fn fetch_record(&self, siren: &Siren) -> Result<Value> {
        let url = self.config.company_url();
        let token = self.config.api_token.expose();
        debug!(%siren, "Fetching Pappers company");

        let response = self
            .transport
            .send(SERVICE, |client| {
                client
                    .get(&url)
                    .query(&[("api_token", token), ("siren", siren.as_str())])
            })
            .await?;

        match decode(SERVICE, response).await? {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::NonJson(non_json) => {
                warn!(
                    %siren,
                    status = non_json.status,
                    content_type = %non_json.content_type,
                    "Pappers answered without JSON"
                );
                Ok(json!({}))
            }
        }
    }
}
