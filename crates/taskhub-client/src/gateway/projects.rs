//! `/projects` gateway.

use async_trait::async_trait;
use serde_json::json;
use taskhub_core::validation::validate_member_email;
use taskhub_core::{
    ListDescriptor, MemberId, Page, Project, ProjectDraft, ProjectId, ProjectPatch, Validate,
};

use super::{ApiClient, ListSource, ResourceGateway, to_body};
use crate::errors::ApiError;
use crate::transport::ApiRequest;

/// Projects and their members.
#[derive(Debug, Clone)]
pub struct ProjectsGateway {
    api: ApiClient,
}

impl ProjectsGateway {
    /// Gateway over `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Invite a member by email; returns the updated project.
    #[tracing::instrument(skip_all, fields(project = %project))]
    pub async fn add_member(&self, project: &ProjectId, email: &str) -> Result<Project, ApiError> {
        validate_member_email(email)?;
        let request = ApiRequest::post(
            format!("/projects/{project}/members"),
            json!({ "email": email.trim() }),
        );
        self.api
            .fetch_entity(request, "project", "Failed to add member")
            .await
    }

    /// Remove a member; returns the updated project.
    #[tracing::instrument(skip_all, fields(project = %project, member = %member))]
    pub async fn remove_member(
        &self,
        project: &ProjectId,
        member: &MemberId,
    ) -> Result<Project, ApiError> {
        let request = ApiRequest::delete(format!("/projects/{project}/members/{member}"));
        self.api
            .fetch_entity(request, "project", "Failed to remove member")
            .await
    }
}

#[async_trait]
impl ListSource for ProjectsGateway {
    type Item = Project;

    #[tracing::instrument(skip_all)]
    async fn list(&self, descriptor: &ListDescriptor) -> Result<Page<Project>, ApiError> {
        let request =
            ApiRequest::get("/projects").with_query(descriptor.query_pairs(self.api.dialect()));
        self.api
            .fetch_list(request, "Failed to fetch projects")
            .await
    }
}

#[async_trait]
impl ResourceGateway for ProjectsGateway {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn get(&self, id: &ProjectId) -> Result<Project, ApiError> {
        self.api
            .fetch_existing(
                ApiRequest::get(format!("/projects/{id}")),
                "project",
                "Failed to fetch project",
                "Project not found",
            )
            .await
    }

    #[tracing::instrument(skip_all)]
    async fn create(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        draft.validate()?;
        let request = ApiRequest::post("/projects", to_body(draft)?);
        self.api
            .fetch_entity(request, "project", "Failed to create project")
            .await
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, ApiError> {
        patch.validate()?;
        let request = ApiRequest::put(format!("/projects/{id}"), to_body(patch)?);
        self.api
            .fetch_entity(request, "project", "Failed to update project")
            .await
    }

    #[tracing::instrument(skip_all, fields(id = %id))]
    async fn remove(&self, id: &ProjectId) -> Result<Option<Project>, ApiError> {
        self.api
            .fetch_optional(
                ApiRequest::delete(format!("/projects/{id}")),
                "project",
                "Failed to delete project",
            )
            .await
    }
}
