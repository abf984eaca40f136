//! Auth-domain identifiers, secrets, and credential models.

pub mod credentials;
pub mod id;

pub use credentials::*;
pub use id::*;
