pub mod client;
pub mod gateway;
pub mod indices;

pub use client::{DatastoreClientConfig, DatastoreClientError, OpenSearchClient};
pub use gateway::{Datastore, SearchRequest};
pub use indices::IndexAlias;
