//! Storage contracts and built-in credential store implementations.
//!
//! The platform keeps exactly one session per client installation—an access token plus
//! the long-lived refresh token—so stores hold a single [`CredentialRecord`] rather
//! than a keyed map. Clearing the store is the required response to a failed refresh.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::CredentialRecord};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the client's credential pair.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the stored credential record.
	fn save(&self, record: CredentialRecord) -> StoreFuture<'_, ()>;

	/// Fetches the stored record, if present.
	fn load(&self) -> StoreFuture<'_, Option<CredentialRecord>>;

	/// Removes any stored credentials.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
