//! AGRIHA real-estate marketplace client.
//!
//! The presentation logic of the marketplace (location search, map and list
//! synchronization, listing and sign-up forms, session handling) as plain
//! view models, plus the same-origin proxy that forwards GraphQL traffic to
//! the backend. All business data lives in that backend.

pub mod auth;
pub mod config;
pub mod error;
pub mod explore;
pub mod forms;
pub mod geocoding;
pub mod graphql;
pub mod listing;
pub mod map;
pub mod models;
pub mod proxy;
pub mod reviews;
pub mod search;
pub mod selection;

pub use error::{Error, Result};
