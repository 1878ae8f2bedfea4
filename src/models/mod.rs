// Domain models
pub mod dao;
pub mod deployment;
pub mod proposal;
pub mod query;

// Re-export commonly used types
pub use dao::*;
pub use deployment::*;
pub use proposal::*;
pub use query::*;
