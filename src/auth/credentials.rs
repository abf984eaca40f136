//! Secret wrappers and the persisted credential pair.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping token material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Secret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access/refresh token pair persisted by the credential store.
///
/// The platform does not advertise an access-token lifetime, so the expiry instant is
/// optional; expiry is usually discovered through a 401 and handled by the gateway's
/// refresh path instead.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
	/// Short-lived bearer secret attached to authenticated requests.
	pub access_token: Secret,
	/// Long-lived secret used to mint a new access token without re-authenticating.
	pub refresh_token: Option<Secret>,
	/// Instant the pair was stored.
	pub issued_at: OffsetDateTime,
	/// Expiry instant, when the backend reported one.
	pub expires_at: Option<OffsetDateTime>,
}
impl CredentialRecord {
	/// Creates a record for the access token, stamped with the current clock.
	pub fn new(access_token: impl Into<String>) -> Self {
		Self {
			access_token: Secret::new(access_token),
			refresh_token: None,
			issued_at: OffsetDateTime::now_utc(),
			expires_at: None,
		}
	}

	/// Attaches the refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(Secret::new(token));

		self
	}

	/// Overrides the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = instant;

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry measured from the issued-at instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_at = Some(self.issued_at + duration);

		self
	}

	/// Returns `true` when the record is known to be expired at the provided instant.
	///
	/// Records without a recorded expiry are never considered expired locally.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expiry| instant >= expiry)
	}

	/// Returns `true` when the record is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Produces the rotated record a successful refresh yields.
	///
	/// When the backend omits a replacement refresh token the previous one is retained,
	/// matching the platform's rotation behavior.
	pub fn rotated(&self, access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
		Self {
			access_token: Secret::new(access_token),
			refresh_token: refresh_token.map(Secret::new).or_else(|| self.refresh_token.clone()),
			issued_at: OffsetDateTime::now_utc(),
			expires_at: None,
		}
	}
}
impl Debug for CredentialRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialRecord")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
