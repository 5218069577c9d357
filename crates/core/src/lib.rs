//! Domain building blocks shared by the repository and HTTP layers.
//!
//! Nothing in here touches the database, the network, or the file system.

pub mod error;
pub mod feedback;
pub mod pagination;
pub mod photo;
pub mod search;
pub mod types;
