//! Position service functions.

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
use crate::error::{HireTrackError, Result};
use crate::filters::PositionFilters;
use crate::types::{
    ListPayload, NewPosition, Paginated, Position, PositionStatus, PositionUpdate, SinglePayload,
};

const POSITIONS_ENDPOINT: &str = "/positions";
const BATCH_DELETE_ENDPOINT: &str = "/positions/batch";

const FETCH_ALL_FAILED: &str = "Failed to fetch positions";
const FETCH_ONE_FAILED: &str = "Failed to fetch position";
const CREATE_FAILED: &str = "Failed to create position";
const UPDATE_FAILED: &str = "Failed to update position";
const UPDATE_STATUS_FAILED: &str = "Failed to update position status";
const DELETE_FAILED: &str = "Failed to delete position";
const DELETE_BATCH_FAILED: &str = "Failed to delete positions";

#[derive(Debug, Serialize)]
struct StatusBody {
    status: PositionStatus,
}

#[derive(Clone)]
pub struct PositionService {
    client: Arc<HttpClient>,
    auth: AuthStore,
}

impl PositionService {
    pub fn new(client: Arc<HttpClient>, auth: AuthStore) -> Self {
        Self { client, auth }
    }

    pub async fn list(&self, filters: &PositionFilters) -> Result<Paginated<Position>> {
        let endpoint = filters.apply(POSITIONS_ENDPOINT);
        let config = auth_config(&self.auth)?;
        debug!(endpoint = %endpoint, "Listing positions");

        let result = self.client.get::<ListPayload<Position>>(&endpoint, config).await;
        expect_payload(result, FETCH_ALL_FAILED).map(ListPayload::into_page)
    }

    pub async fn get(&self, id: &str) -> Result<Position> {
        let endpoint = resource_path(POSITIONS_ENDPOINT, id)?;
        let config = auth_config(&self.auth)?;

        let result = self.client.get::<SinglePayload<Position>>(&endpoint, config).await;
        expect_payload(result, FETCH_ONE_FAILED).map(SinglePayload::into_inner)
    }

    /// Returns `None` when the API accepted the record without echoing it.
    pub async fn create(&self, position: &NewPosition) -> Result<Option<Position>> {
        position.validate()?;
        let config = auth_config(&self.auth)?;

        let result = self
            .client
            .post::<_, SinglePayload<Position>>(POSITIONS_ENDPOINT, Some(position), config)
            .await;
        let created = optional_payload(result, CREATE_FAILED)?.map(SinglePayload::into_inner);
        match &created {
            Some(position) => debug!(position_id = %position.id, "Position created"),
            None => debug!("Position created"),
        }
        Ok(created)
    }

    /// Replace the fields present in `changes`.
    pub async fn update(&self, id: &str, changes: &PositionUpdate) -> Result<Option<Position>> {
        if changes.is_empty() {
            return Err(HireTrackError::Validation(
                "at least one field must be updated".to_string(),
            ));
        }
        let endpoint = resource_path(POSITIONS_ENDPOINT, id)?;
        let config = auth_config(&self.auth)?;

        let result = self
            .client
            .put::<_, SinglePayload<Position>>(&endpoint, Some(changes), config)
            .await;
        optional_payload(result, UPDATE_FAILED).map(|data| data.map(SinglePayload::into_inner))
    }

    pub async fn update_status(&self, id: &str, status: PositionStatus) -> Result<Option<Position>> {
        let endpoint = format!("{}/status", resource_path(POSITIONS_ENDPOINT, id)?);
        let config = auth_config(&self.auth)?;

        let result = self
            .client
            .patch::<_, SinglePayload<Position>>(&endpoint, Some(&StatusBody { status }), config)
            .await;
        optional_payload(result, UPDATE_STATUS_FAILED).map(|data| data.map(SinglePayload::into_inner))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let endpoint = resource_path(POSITIONS_ENDPOINT, id)?;
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
        debug!(count = ids.len(), "Positions deleted");
        Ok(())
    }
}
