pub mod client;
pub mod types;

pub use client::{ApiClient, FetchConfig, HttpClient, ReqwestClient};
pub use types::{EntityType, FieldSet};
