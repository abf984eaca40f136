//! Authenticated request gateway with single-flight token refresh.
//!
//! Every API call flows through [`AuthGateway::send`]: the gateway attaches the stored
//! bearer secret, dispatches through the transport, and normalizes error statuses into
//! [`ApiRejection`] values. A 401 triggers the refresh path: one caller performs the
//! `POST /auth/refresh` exchange while every other 401-ed caller waits on the same
//! guard, then replays its original request with the rotated token. A failed refresh
//! clears the stored credentials and releases all waiters with the recorded failure.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{CredentialRecord, Secret},
	error::ApiRejection,
	http::{ApiRequest, ApiResponse, ApiTransport, Method},
	model::RefreshEnvelope,
	obs::{self, CallKind, CallOutcome, CallSpan},
	platform::PlatformDescriptor,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

const STATUS_UNAUTHORIZED: u16 = 401;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = AuthGateway<ReqwestTransport>;

/// Coordinates authenticated requests against a single platform deployment.
///
/// The gateway owns the transport, credential store, and platform descriptor so API
/// operations can focus on payload shapes. It is cheap to clone; clones share the
/// refresh guard, so concurrent request chains across clones still coordinate on a
/// single in-flight refresh.
#[derive(Clone)]
pub struct AuthGateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Transport used for every outbound platform request.
	pub transport: Arc<C>,
	/// Descriptor of the platform deployment.
	pub descriptor: PlatformDescriptor,
	/// Credential store that persists the session's token pair.
	pub store: Arc<dyn CredentialStore>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<()>>,
	refresh_failure: RefreshFailureSlot,
	refresh_timeout: Option<StdDuration>,
}
impl<C> AuthGateway<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a gateway that routes requests through the caller-provided transport.
	pub fn with_transport(
		descriptor: PlatformDescriptor,
		store: Arc<dyn CredentialStore>,
		transport: impl Into<Arc<C>>,
	) -> Self {
		Self {
			transport: transport.into(),
			descriptor,
			store,
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
			refresh_failure: Default::default(),
			refresh_timeout: None,
		}
	}

	/// Bounds the refresh call with a deadline enforced by the transport.
	///
	/// The observed platform behavior places no deadline on the refresh call, which
	/// leaves every queued request stalled if the backend hangs; setting a timeout
	/// converts such a hang into a refresh failure that clears the session and releases
	/// the waiters.
	pub fn with_refresh_timeout(mut self, timeout: StdDuration) -> Self {
		self.refresh_timeout = Some(timeout);

		self
	}

	/// Persists a freshly issued credential pair and resets any recorded refresh failure.
	pub async fn adopt_credentials(&self, record: CredentialRecord) -> Result<()> {
		self.store.save(record).await?;
		self.refresh_failure.clear();

		Ok(())
	}

	/// Removes the stored credential pair, ending the local session.
	pub async fn discard_credentials(&self) -> Result<()> {
		self.store.clear().await?;

		Ok(())
	}

	/// Returns the stored credential pair, if any.
	pub async fn credentials(&self) -> Result<Option<CredentialRecord>> {
		Ok(self.store.load().await?)
	}

	/// Executes the request with bearer attachment, refresh coordination, and status
	/// normalization.
	///
	/// Any 4xx/5xx response that survives the refresh path is returned as
	/// [`Error::Api`] carrying the normalized rejection.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		let bearer = self.store.load().await?.map(|record| record.access_token);
		let first = self.transport.execute(request.clone().with_bearer(bearer.clone())).await?;

		if first.status != STATUS_UNAUTHORIZED || request.retried {
			return Self::normalize(first);
		}

		// An anonymous 401 has no session to refresh.
		let Some(stale) = bearer else {
			return Self::normalize(first);
		};
		let fresh = self.refresh_after_unauthorized(stale).await?;
		let replay = self.transport.execute(request.mark_retried().with_bearer(Some(fresh))).await?;

		Self::normalize(replay)
	}

	fn normalize(response: ApiResponse) -> Result<ApiResponse> {
		if response.is_error() {
			Err(ApiRejection::from_payload(response.status, &response.body).into())
		} else {
			Ok(response)
		}
	}

	async fn refresh_after_unauthorized(&self, stale: Secret) -> Result<Secret> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "refresh_after_unauthorized");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.refresh_locked(stale)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn refresh_locked(&self, stale: Secret) -> Result<Secret> {
		// The guard is fair: 401-ed callers park here in arrival order and are released
		// FIFO once the winning refresh resolves.
		let _singleflight = self.refresh_guard.lock().await;
		let Some(current) = self.store.load().await? else {
			// A refresh ahead of us already failed and cleared the session.
			return Err(Error::SessionExpired(self.refresh_failure.recall_or_default()));
		};

		if current.access_token != stale {
			// Another caller already rotated the session; replay with its token.
			return Ok(current.access_token);
		}

		self.refresh_metrics.record_attempt();

		let Some(refresh_token) = current.refresh_token.clone() else {
			let rejection = ApiRejection {
				message: "No refresh token is stored for this session".into(),
				status: STATUS_UNAUTHORIZED,
			};

			return Err(self.fail_refresh(rejection).await);
		};
		let mut request = ApiRequest::new(Method::Post, self.descriptor.refresh()?)
			.json(serde_json::json!({ "refreshToken": refresh_token.expose() }));

		if let Some(timeout) = self.refresh_timeout {
			request = request.with_timeout(timeout);
		}

		let response = match self.transport.execute(request).await {
			Ok(response) => response,
			Err(error) => {
				let rejection = ApiRejection::from_transport(&error);

				return Err(self.fail_refresh(rejection).await);
			},
		};

		if response.is_error() {
			let rejection = ApiRejection::from_payload(response.status, &response.body);

			return Err(self.fail_refresh(rejection).await);
		}

		let envelope = match response.json::<RefreshEnvelope>() {
			Ok(envelope) => envelope,
			Err(error) => {
				let rejection =
					ApiRejection { message: error.to_string(), status: response.status };

				return Err(self.fail_refresh(rejection).await);
			},
		};
		let rotated = current.rotated(envelope.token, envelope.refresh_token);
		let fresh = rotated.access_token.clone();

		self.store.save(rotated).await?;
		self.refresh_failure.clear();
		self.refresh_metrics.record_success();

		Ok(fresh)
	}

	/// Marks the refresh as failed: counts it, records the rejection for queued callers,
	/// and clears the stored credentials.
	async fn fail_refresh(&self, rejection: ApiRejection) -> Error {
		self.refresh_metrics.record_failure();
		self.refresh_failure.record(rejection.clone());

		if let Err(error) = self.store.clear().await {
			return error.into();
		}

		Error::SessionExpired(rejection)
	}
}
#[cfg(feature = "reqwest")]
impl AuthGateway<ReqwestTransport> {
	/// Creates a gateway with the crate's default reqwest transport.
	pub fn new(descriptor: PlatformDescriptor, store: Arc<dyn CredentialStore>) -> Self {
		Self::with_transport(descriptor, store, ReqwestTransport::default())
	}
}
impl<C> Debug for AuthGateway<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthGateway")
			.field("descriptor", &self.descriptor)
			.field("refresh_timeout", &self.refresh_timeout)
			.finish()
	}
}

/// Shares the most recent refresh failure between the winning caller and the queue it
/// releases; cleared when a refresh succeeds or new credentials are adopted.
#[derive(Clone, Debug, Default)]
struct RefreshFailureSlot(Arc<Mutex<Option<ApiRejection>>>);
impl RefreshFailureSlot {
	fn record(&self, rejection: ApiRejection) {
		*self.0.lock() = Some(rejection);
	}

	fn recall_or_default(&self) -> ApiRejection {
		self.0.lock().clone().unwrap_or_else(|| ApiRejection {
			message: "Session was cleared after a failed token refresh".into(),
			status: STATUS_UNAUTHORIZED,
		})
	}

	fn clear(&self) {
		self.0.lock().take();
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn failure_slot_recall_falls_back_when_empty() {
		let slot = RefreshFailureSlot::default();
		let fallback = slot.recall_or_default();

		assert_eq!(fallback.status, STATUS_UNAUTHORIZED);

		slot.record(ApiRejection { message: "refresh token revoked".into(), status: 403 });

		assert_eq!(slot.recall_or_default().status, 403);

		slot.clear();

		assert_eq!(slot.recall_or_default().status, STATUS_UNAUTHORIZED);
	}
}
