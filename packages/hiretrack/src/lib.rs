//! HireTrack client library.
//!
//! Applicant and position services built on [`api_client::HttpClient`],
//! a persistent session store, and the route gate used by the web front.
//!
//! ```ignore
//! let hiretrack = HireTrack::from_config(&Config::from_env()?)?;
//! let page = hiretrack.applicants.list(&ApplicantFilters::new().limit(20)).await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod filters;
pub mod gating;
pub mod services;
pub mod storage;
pub mod types;

use std::sync::Arc;

use api_client::HttpClient;
use tracing::info;

pub use auth::{
    parse_cookie_header, profile_from_cookies, AuthStore, COOKIE_MAX_AGE_SECS, TOKEN_KEY, USER_KEY,
};
pub use config::Config;
pub use error::{HireTrackError, RequestFailure, Result};
pub use filters::{ApplicantFilters, ListFilters, PositionFilters};
pub use gating::{route_gate_middleware, Access, GateDecision, RouteGate, Rule};
pub use services::{ApplicantService, PositionService};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{
    Applicant, ApplicantStatus, EmploymentType, NewApplicant, NewPosition, Paginated, Position,
    PositionStatus, PositionUpdate, SortOrder, UserProfile, UserType,
};

/// Services wired to one shared client and session store.
#[derive(Clone)]
pub struct HireTrack {
    pub applicants: ApplicantService,
    pub positions: PositionService,
    pub auth: AuthStore,
}

impl HireTrack {
    pub fn new(client: HttpClient, store: Arc<dyn KeyValueStore>) -> Self {
        let client = Arc::new(client);
        let auth = AuthStore::new(store);
        Self {
            applicants: ApplicantService::new(client.clone(), auth.clone()),
            positions: PositionService::new(client, auth.clone()),
            auth,
        }
    }

    /// Client from `config`, session persisted at `config.storage_path`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HttpClient::with_config(config.client_config())?;
        let store = FileStore::new(&config.storage_path);
        info!(
            api_url = %config.api_url,
            storage = %config.storage_path.display(),
            "HireTrack client initialized"
        );
        Ok(Self::new(client, Arc::new(store)))
    }
}
