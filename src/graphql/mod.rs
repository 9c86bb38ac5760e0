pub mod client;
pub mod operations;

pub use client::{GraphQlClient, GraphQlError, GraphQlRequest, GraphQlResponse};
pub use operations::{AuthPayload, PropertyFilter, PropertyPage, RegisterInput};
