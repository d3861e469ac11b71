pub mod cache;
pub mod directory;
pub mod loader;
pub mod models;

pub use cache::{InMemoryTopology, TopologyCache};
pub use directory::{
    DirectoryClientError, DirectoryService, EmptyDirectory, HttpDirectoryClient,
    OrganisationServices, OrganizationDirectory,
};
pub use loader::TopologyLoader;
pub use models::{NodeKind, TopologyNode};
