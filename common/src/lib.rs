//! Types shared between the catalog backend and its HTTP clients.

pub mod jobs;
pub mod model;
pub mod requests;
