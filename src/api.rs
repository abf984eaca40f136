//! Typed platform operations layered on top of the authenticated gateway.

pub mod auth;
pub mod product;
pub mod store;

pub use auth::*;
pub use product::*;
pub use store::*;

// self
use crate::{
	_prelude::*,
	gateway::AuthGateway,
	http::ApiTransport,
	obs::{self, CallKind, CallOutcome, CallSpan},
	platform::PlatformDescriptor,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type DefaultClient = Client<ReqwestTransport>;

/// High-level platform client: account, store, and catalog operations.
///
/// All operations dispatch through the owned [`AuthGateway`], so bearer attachment,
/// 401-triggered refresh, and error-status normalization apply uniformly. The client is
/// cheap to clone and clones keep coordinating on one in-flight refresh.
#[derive(Clone)]
pub struct Client<C>
where
	C: ?Sized + ApiTransport,
{
	/// Gateway that authenticates and dispatches every call.
	pub gateway: AuthGateway<C>,
}
impl<C> Client<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a client that routes requests through the caller-provided transport.
	pub fn with_transport(
		descriptor: PlatformDescriptor,
		store: Arc<dyn CredentialStore>,
		transport: impl Into<Arc<C>>,
	) -> Self {
		Self { gateway: AuthGateway::with_transport(descriptor, store, transport) }
	}

	/// Bounds the gateway's refresh call with a deadline.
	pub fn with_refresh_timeout(mut self, timeout: StdDuration) -> Self {
		self.gateway = self.gateway.with_refresh_timeout(timeout);

		self
	}

	/// Ends the local session by discarding stored credentials.
	pub async fn sign_out(&self) -> Result<()> {
		self.gateway.discard_credentials().await
	}

	/// Wraps an operation body with the span + outcome-counter pair every public
	/// operation shares.
	pub(crate) async fn instrumented<F, T>(
		&self,
		kind: CallKind,
		stage: &'static str,
		fut: F,
	) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		let span = CallSpan::new(kind, stage);

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span.instrument(fut).await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client with the crate's default reqwest transport.
	pub fn new(descriptor: PlatformDescriptor, store: Arc<dyn CredentialStore>) -> Self {
		Self::with_transport(descriptor, store, ReqwestTransport::default())
	}
}
impl<C> Debug for Client<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("gateway", &self.gateway).finish()
	}
}
