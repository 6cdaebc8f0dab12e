//! `/activities` gateway. Read-only.

use async_trait::async_trait;
use taskhub_core::{Activity, ListDescriptor, Page};

use super::{ApiClient, ListSource};
use crate::errors::ApiError;
use crate::transport::ApiRequest;

/// Page size used when the descriptor does not set one.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

/// Per-project activity feed.
#[derive(Debug, Clone)]
pub struct ActivityGateway {
    api: ApiClient,
}

impl ActivityGateway {
    /// Gateway over `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for ActivityGateway {
    type Item = Activity;

    /// `GET /activities/project/:projectId?page&limit`.
    ///
    /// Only the project, page and limit of `descriptor` are used.
    #[tracing::instrument(skip_all)]
    async fn list(&self, descriptor: &ListDescriptor) -> Result<Page<Activity>, ApiError> {
        let d = descriptor.normalized();
        let project = d
            .project_id
            .ok_or_else(|| ApiError::invalid("Project ID is required"))?;

        let request = ApiRequest::get(format!("/activities/project/{project}")).with_query([
            ("page", d.page.unwrap_or(1).to_string()),
            ("limit", d.limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT).to_string()),
        ]);
        self.api
            .fetch_list(request, "Failed to fetch activities")
            .await
    }
}
