//! Client-level error types shared across the gateway, stores, and API operations.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Backend rejected the request with an error status.
	#[error(transparent)]
	Api(#[from] ApiRejection),
	/// Token refresh failed; stored credentials have been cleared and the caller must
	/// authenticate again.
	#[error("Session expired and could not be refreshed: {0}")]
	SessionExpired(ApiRejection),
}

/// Uniform `{message, status}` shape every backend error status is normalized into.
///
/// The backend reports failures as a JSON object carrying a `message` field; when the
/// payload is opaque (HTML error pages, empty bodies) the rejection falls back to a
/// canned reason so callers always receive something displayable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("Request rejected with status {status}: {message}")]
pub struct ApiRejection {
	/// Human-readable reason reported by the backend, or a fallback.
	pub message: String,
	/// HTTP status code carried by the response.
	pub status: u16,
}
impl ApiRejection {
	/// Builds a rejection from an error-status response payload.
	pub fn from_payload(status: u16, body: &[u8]) -> Self {
		#[derive(Deserialize)]
		struct MessageBody {
			message: String,
		}

		let message = serde_json::from_slice::<MessageBody>(body)
			.map(|payload| payload.message)
			.unwrap_or_else(|_| format!("Request failed with status {status}"));

		Self { message, status }
	}

	/// Builds a rejection for a request that failed before any response arrived.
	///
	/// Mirrors the platform's normalization policy for transport-level failures: the
	/// error text becomes the message and the status defaults to 500.
	pub fn from_transport(error: &TransportError) -> Self {
		Self { message: error.to_string(), status: 500 }
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Platform descriptor contains an invalid base URL.
	#[error("Platform base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A route could not be joined onto the platform base URL.
	#[error("Route `{route}` cannot be joined onto the platform base URL.")]
	InvalidRoute {
		/// Relative route that failed to join.
		route: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Identifier validation failed.
	#[error("Identifier is invalid.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// An operation that requires an authenticated session found no stored credentials.
	#[error("No credentials are stored; authenticate first.")]
	MissingCredentials,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Backend responded with malformed JSON that could not be parsed.
	#[error("Backend returned a malformed response body.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code of the offending response.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn rejection_prefers_backend_message() {
		let rejection = ApiRejection::from_payload(404, br#"{"message":"Store not found"}"#);

		assert_eq!(rejection.message, "Store not found");
		assert_eq!(rejection.status, 404);
	}

	#[test]
	fn rejection_falls_back_on_opaque_bodies() {
		let rejection = ApiRejection::from_payload(502, b"<html>Bad Gateway</html>");

		assert_eq!(rejection.message, "Request failed with status 502");
		assert_eq!(rejection.status, 502);
	}

	#[test]
	fn transport_rejection_defaults_to_500() {
		let error = TransportError::Io(std::io::Error::other("socket closed"));
		let rejection = ApiRejection::from_transport(&error);

		assert_eq!(rejection.status, 500);
		assert!(rejection.message.contains("I/O error"));
	}

	#[test]
	fn store_error_converts_with_source() {
		let store_error = crate::store::StoreError::Backend { message: "disk unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unreachable"));

		let source = StdError::source(&error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
