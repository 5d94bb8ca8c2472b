//! Shared plumbing for the company registry API clients.
//!
//! Every client in this workspace (LegalMap, Pappers, the LLM providers) talks
//! HTTP through the same retrying transport and reports failures with the
//! same error taxonomy.
//!
//! # Example
//!
//! ```rust,ignore
//! use registry_common::{HttpTransport, Siren};
//!
//! let siren = Siren::parse("552100554")?;
//! let transport = HttpTransport::new("legalmap-client/0.1", Duration::from_secs(20))?;
//!
//! let response = transport
//!     .send("legalmap", |client| client.get(&url).header("x-api-key", token))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`siren`] - Validated 9-digit company identifier
//! - [`transport`] - reqwest wrapper with retry and exponential backoff
//! - [`body`] - JSON / non-JSON response decoding
//! - [`env`] - Environment lookups for configuration
//! - [`json_path`] - Typed optional lookups into nested JSON
//! - [`outcome`] - `Ok` / `Degraded` results for best-effort steps
//! - [`security`] - Redacted secret strings

pub mod body;
pub mod env;
pub mod error;
pub mod json_path;
pub mod outcome;
pub mod security;
pub mod siren;
pub mod transport;

pub use body::{decode, NonJsonBody, NonJsonResponse, ResponseBody, TEXT_PREVIEW_CHARS};
pub use error::{ApiError, Result};
pub use outcome::{ErrorMarker, Outcome};
pub use security::SecretString;
pub use siren::{Siren, SirenError};
pub use transport::{HttpTransport, RetryPolicy};
