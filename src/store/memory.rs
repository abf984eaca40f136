//! Thread-safe in-memory [`CredentialStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::CredentialRecord,
	store::{CredentialStore, StoreError, StoreFuture},
};

type Slot = Arc<RwLock<Option<CredentialRecord>>>;

/// Keeps the credential pair in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	fn save_now(slot: Slot, record: CredentialRecord) -> Result<(), StoreError> {
		*slot.write() = Some(record);

		Ok(())
	}

	fn load_now(slot: Slot) -> Option<CredentialRecord> {
		slot.read().clone()
	}

	fn clear_now(slot: Slot) -> Result<(), StoreError> {
		*slot.write() = None;

		Ok(())
	}
}
impl CredentialStore for MemoryStore {
	fn save(&self, record: CredentialRecord) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move { Self::save_now(slot, record) })
	}

	fn load(&self) -> StoreFuture<'_, Option<CredentialRecord>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(Self::load_now(slot)) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move { Self::clear_now(slot) })
	}
}
