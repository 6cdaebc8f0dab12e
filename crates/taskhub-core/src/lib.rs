//! # taskhub-core
//!
//! Foundation types shared by every TaskHub client crate.
//!
//! - **Branded IDs**: `ProjectId`, `TaskId`, `UserId`, ... as newtypes that
//!   decode from either JSON strings or integers
//! - **Entities**: [`Project`], [`Task`], [`Member`], [`Activity`], [`User`]
//! - **Status vocabulary**: canonical [`TaskStatus`] plus the outbound
//!   [`StatusDialect`] shim
//! - **Descriptors**: [`ListDescriptor`] for filter/sort/page configuration
//! - **Envelope**: backend `{success, data, message}` parsing and message extraction
//! - **Validation**: client-side form checks run before any network call
//! - **Logging**: `tracing` subscriber initialization

#![deny(unsafe_code)]

pub mod descriptor;
pub mod envelope;
pub mod ids;
pub mod logging;
pub mod pagination;
pub mod status;
pub mod types;
pub mod validation;

pub use descriptor::{ListDescriptor, SortField, SortOrder};
pub use envelope::{ListPayload, RawEnvelope, extract_message};
pub use ids::{ActivityId, EntityId, MemberId, ProjectId, TaskId, UserId};
pub use pagination::{Page, Pagination};
pub use status::{StatusDialect, TaskPriority, TaskStatus};
pub use types::{
    Activity, Credentials, Member, MemberRole, Project, ProjectDraft, ProjectPatch,
    ProjectStatus, Resource, SignupRequest, Task, TaskDraft, TaskPatch, User, UserRef, UserRole,
    UserSummary,
};
pub use validation::{FieldError, Validate, ValidationErrors};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _descriptor = ListDescriptor::default();
        let _status = TaskStatus::default();
        let _dialect = StatusDialect::default();
        let _id = TaskId::from("t-1");
    }
}
