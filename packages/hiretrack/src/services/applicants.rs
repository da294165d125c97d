//! Applicant service functions.

use std::sync::Arc;

use api_client::HttpClient;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{
    auth_config, expect_payload, expect_success, optional_payload, require_ids, resource_path,
    IdsBody,
};
use crate::auth::AuthStore;
use crate::error::Result;
use crate::filters::ApplicantFilters;
use crate::types::{Applicant, ApplicantStatus, ListPayload, NewApplicant, Paginated, SinglePayload};

const APPLICANTS_ENDPOINT: &str = "/applicants";
const BATCH_DELETE_ENDPOINT: &str = "/applicants/batch";

const FETCH_ALL_FAILED: &str = "Failed to fetch applicants";
const FETCH_ONE_FAILED: &str = "Failed to fetch applicant";
const CREATE_FAILED: &str = "Failed to create applicant";
const UPDATE_STATUS_FAILED: &str = "Failed to update applicant status";
const DELETE_FAILED: &str = "Failed to delete applicant";
const DELETE_BATCH_FAILED: &str = "Failed to delete applicants";

#[derive(Debug, Serialize)]
struct StatusBody {
    status: ApplicantStatus,
}

#[derive(Clone)]
pub struct ApplicantService {
    client: Arc<HttpClient>,
    auth: AuthStore,
}

impl ApplicantService {
    pub fn new(client: Arc<HttpClient>, auth: AuthStore) -> Self {
        Self { client, auth }
    }

    pub async fn list(&self, filters: &ApplicantFilters) -> Result<Paginated<Applicant>> {
        let endpoint = filters.apply(APPLICANTS_ENDPOINT);
        let config = auth_config(&self.auth)?;
        debug!(endpoint = %endpoint, "Listing applicants");

        let result = self.client.get::<ListPayload<Applicant>>(&endpoint, config).await;
        expect_payload(result, FETCH_ALL_FAILED).map(ListPayload::into_page)
    }

    pub async fn get(&self, id: &str) -> Result<Applicant> {
        let endpoint = resource_path(APPLICANTS_ENDPOINT, id)?;
        let config = auth_config(&self.auth)?;

        let result = self.client.get::<SinglePayload<Applicant>>(&endpoint, config).await;
        expect_payload(result, FETCH_ONE_FAILED).map(SinglePayload::into_inner)
    }

    /// Returns `None` when the API accepted the record without echoing it.
    pub async fn create(&self, applicant: &NewApplicant) -> Result<Option<Applicant>> {
        applicant.validate()?;
        let config = auth_config(&self.auth)?;

        let result = self
            .client
            .post::<_, SinglePayload<Applicant>>(APPLICANTS_ENDPOINT, Some(applicant), config)
            .await;
        let created = optional_payload(result, CREATE_FAILED)?.map(SinglePayload::into_inner);
        match &created {
            Some(applicant) => debug!(applicant_id = %applicant.id, "Applicant created"),
            None => debug!("Applicant created"),
        }
        Ok(created)
    }

    pub async fn update_status(&self, id: &str, status: ApplicantStatus) -> Result<Option<Applicant>> {
        let endpoint = format!("{}/status", resource_path(APPLICANTS_ENDPOINT, id)?);
        let config = auth_config(&self.auth)?;

        let result = self
            .client
            .patch::<_, SinglePayload<Applicant>>(&endpoint, Some(&StatusBody { status }), config)
            .await;
        optional_payload(result, UPDATE_STATUS_FAILED).map(|data| data.map(SinglePayload::into_inner))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let endpoint = resource_path(APPLICANTS_ENDPOINT, id)?;
        let config = auth_config(&self.auth)?;

        let result = self.client.delete::<(), Value>(&endpoint, None, config).await;
        expect_success(result, DELETE_FAILED)
    }

    pub async fn delete_batch(&self, ids: &[String]) -> Result<()> {
        require_ids(ids)?;
        let config = auth_config(&self.auth)?;

        let result = self
            .client
            .delete::<_, Value>(BATCH_DELETE_ENDPOINT, Some(&IdsBody { ids }), config)
            .await;
        expect_success(result, DELETE_BATCH_FAILED)?;
        debug!(count = ids.len(), "Applicants deleted");
        Ok(())
    }
}
