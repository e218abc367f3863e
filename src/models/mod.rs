//! Request and Response models for the maintenance API
//!
//! This module defines the DTOs used for serializing/deserializing
//! HTTP request parameters and response bodies.

pub mod requests;
pub mod responses;

pub use requests::ObjectQuery;
pub use responses::{
    CacheStatsResponse, ClearResponse, ErrorResponse, HealthResponse, KeyStatusResponse,
    ObjectStatsResponse, RemovedResponse,
};
