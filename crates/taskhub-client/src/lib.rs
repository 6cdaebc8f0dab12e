//! # taskhub-client
//!
//! Network layer of the TaskHub client.
//!
//! - [`Transport`] / [`HttpTransport`]: bearer auth, refresh-and-retry-once on 401
//! - [`ApiClient`]: envelope parsing, status dialect, error normalization
//! - Gateways: [`ProjectsGateway`], [`TasksGateway`], [`ActivityGateway`],
//!   behind the [`ListSource`] and [`ResourceGateway`] traits
//! - [`ApiError`]: the one error every gateway operation returns

#![deny(unsafe_code)]

pub mod errors;
pub mod gateway;
pub mod transport;

pub use errors::{ApiError, ApiErrorKind, TransportError};
pub use gateway::{
    ActivityGateway, ApiClient, AssignTasks, IdOf, ListSource, ProjectsGateway, ResourceGateway, TasksGateway,
};
pub use transport::{ApiRequest, HttpMethod, HttpTransport, RawResponse, Transport};
