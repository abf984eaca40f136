//! Transport primitives for platform API calls.
//!
//! The module exposes [`ApiTransport`] alongside the request/response value types so
//! downstream crates can integrate custom HTTP clients without losing the gateway's
//! refresh behavior. Multipart bodies are represented structurally: the transport owns
//! content-type negotiation, so the boundary-bearing multipart header is always supplied
//! by the HTTP stack and never by the caller's JSON default.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	auth::Secret,
	error::{TransientError, TransportError},
};

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing platform API requests.
///
/// The trait is the crate's only dependency on an HTTP implementation. Callers provide
/// an implementation (typically behind `Arc<T>` where `T: ApiTransport`) and the gateway
/// routes every outbound request through it, including the refresh call it issues on
/// behalf of queued callers. Implementations must be `Send + Sync + 'static` so a single
/// transport can serve all concurrent request chains, and the futures they return must
/// be `Send` for the lifetime of the in-flight call.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes the request and resolves with the raw response.
	///
	/// Implementations must report HTTP error statuses as successful [`ApiResponse`]
	/// values; only failures that prevent a response from arriving at all (DNS, TCP,
	/// TLS, timeouts) map to [`TransportError`]. Status normalization is the gateway's
	/// responsibility.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse>;
}

/// HTTP methods used by the platform's REST surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// Resource reads.
	Get,
	/// Resource creation and authentication calls.
	Post,
	/// Partial updates.
	Patch,
	/// Resource removal.
	Delete,
}
impl Method {
	/// Returns the canonical uppercase method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request body variants accepted by the platform.
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// JSON payload; transports send it with the `application/json` content type.
	Json(serde_json::Value),
	/// Multipart form payload; the transport's multipart encoder supplies the
	/// boundary-bearing content type.
	Multipart(MultipartForm),
}

/// Structural multipart form that fake transports can inspect field by field.
#[derive(Clone, Debug, Default)]
pub struct MultipartForm {
	parts: Vec<MultipartPart>,
}
impl MultipartForm {
	/// Creates an empty form.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parts.push(MultipartPart { name: name.into(), value: PartValue::Text(value.into()) });

		self
	}

	/// Appends a file field.
	pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
		self.parts.push(MultipartPart { name: name.into(), value: PartValue::File(file) });

		self
	}

	/// Iterates over the collected parts in insertion order.
	pub fn parts(&self) -> impl Iterator<Item = &MultipartPart> {
		self.parts.iter()
	}

	/// Returns `true` when the form carries no parts.
	pub fn is_empty(&self) -> bool {
		self.parts.is_empty()
	}

	/// Returns the textual value of the named field, if present.
	pub fn text_value(&self, name: &str) -> Option<&str> {
		self.parts.iter().find_map(|part| match &part.value {
			PartValue::Text(value) if part.name == name => Some(value.as_str()),
			_ => None,
		})
	}
}

/// Single named entry of a [`MultipartForm`].
#[derive(Clone, Debug)]
pub struct MultipartPart {
	/// Form field name.
	pub name: String,
	/// Field payload.
	pub value: PartValue,
}

/// Payload of a multipart field.
#[derive(Clone, Debug)]
pub enum PartValue {
	/// Plain text value.
	Text(String),
	/// Uploaded file contents.
	File(FilePart),
}

/// File payload attached to a multipart upload.
#[derive(Clone)]
pub struct FilePart {
	/// File name reported to the backend.
	pub file_name: String,
	/// MIME type of the upload.
	pub content_type: String,
	/// Raw file bytes.
	pub bytes: Vec<u8>,
}
impl FilePart {
	/// Builds a file part from its name, MIME type, and contents.
	pub fn new(
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		bytes: impl Into<Vec<u8>>,
	) -> Self {
		Self { file_name: file_name.into(), content_type: content_type.into(), bytes: bytes.into() }
	}
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("file_name", &self.file_name)
			.field("content_type", &self.content_type)
			.field("bytes", &self.bytes.len())
			.finish()
	}
}

/// Outbound request routed through the gateway.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL.
	pub url: Url,
	/// Request body.
	pub body: RequestBody,
	/// Bearer secret attached by the gateway; `None` for anonymous calls.
	pub bearer: Option<Secret>,
	/// Marks a request replayed after a token refresh. A request carrying this marker is
	/// never queued for a second refresh.
	pub retried: bool,
	/// Per-request deadline enforced by the transport, when set.
	pub timeout: Option<StdDuration>,
}
impl ApiRequest {
	/// Creates a bodyless request for the method and URL.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, body: RequestBody::Empty, bearer: None, retried: false, timeout: None }
	}

	/// Attaches a JSON body.
	pub fn json(mut self, payload: serde_json::Value) -> Self {
		self.body = RequestBody::Json(payload);

		self
	}

	/// Attaches a multipart body.
	pub fn multipart(mut self, form: MultipartForm) -> Self {
		self.body = RequestBody::Multipart(form);

		self
	}

	/// Attaches (or replaces) the bearer secret.
	pub fn with_bearer(mut self, bearer: Option<Secret>) -> Self {
		self.bearer = bearer;

		self
	}

	/// Marks the request as a post-refresh replay.
	pub fn mark_retried(mut self) -> Self {
		self.retried = true;

		self
	}

	/// Applies a per-request deadline.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}
}

/// Raw response captured from the transport.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` when the status is a 4xx/5xx error.
	pub fn is_error(&self) -> bool {
		is_error_status(self.status)
	}

	/// Decodes the body as JSON, reporting the failing path on malformed payloads.
	pub fn json<T>(&self) -> Result<T, TransientError>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| TransientError::ResponseParse { source, status: self.status })
	}
}

/// Returns `true` for 4xx and 5xx status codes, `false` otherwise.
pub fn is_error_status(status: u16) -> bool {
	(400..600).contains(&status)
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Callers supplying a custom [`ReqwestClient`] can configure connection pooling, proxy,
/// and timeout policy there; the transport forwards per-request deadlines set on
/// [`ApiRequest`] (the gateway uses these for refresh calls when a refresh timeout is
/// configured).
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn into_reqwest_form(form: MultipartForm) -> Result<reqwest::multipart::Form, TransportError> {
		let mut assembled = reqwest::multipart::Form::new();

		for part in form.parts {
			assembled = match part.value {
				PartValue::Text(value) => assembled.text(part.name, value),
				PartValue::File(file) => {
					let encoded = reqwest::multipart::Part::bytes(file.bytes)
						.file_name(file.file_name)
						.mime_str(&file.content_type)
						.map_err(TransportError::from)?;

					assembled.part(part.name, encoded)
				},
			};
		}

		Ok(assembled)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Patch => reqwest::Method::PATCH,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url);

			if let Some(bearer) = &request.bearer {
				builder = builder.bearer_auth(bearer.expose());
			}
			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout);
			}

			builder = match request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(payload) => builder.json(&payload),
				RequestBody::Multipart(form) => builder.multipart(Self::into_reqwest_form(form)?),
			};

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}
