#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use storefront_client::{
	api::{Client, LoginRequest, SignupRequest},
	auth::{CredentialRecord, Secret},
	error::Error,
	http::{
		ApiRequest, ApiResponse, ApiTransport, FilePart, PartValue, RequestBody, ReqwestTransport,
		TransportFuture,
	},
	platform::PlatformDescriptor,
	store::{CredentialStore, MemoryStore},
};

fn build_client(server: &MockServer) -> (Client<ReqwestTransport>, Arc<MemoryStore>) {
	let descriptor = PlatformDescriptor::builder(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse."),
	)
	.allow_insecure_http()
	.build()
	.expect("Platform descriptor should build for the mock server.");
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn CredentialStore> = store_backend.clone();
	let client = Client::with_transport(descriptor, store, ReqwestTransport::default());

	(client, store_backend)
}

#[tokio::test]
async fn login_persists_token_pair() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.header("content-type", "application/json")
				.body(r#"{"email":"ada@example.com","password":"open-sesame"}"#);
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"user": {"_id": "u-1", "userName": "ada", "email": "ada@example.com"},
					"token": "access-1",
					"refreshToken": "refresh-1"
				}"#,
			);
		})
		.await;
	let user = client
		.login(LoginRequest::new("ada@example.com", "open-sesame"))
		.await
		.expect("Login should succeed against the mock backend.");

	mock.assert_async().await;

	assert_eq!(user.user_name, "ada");

	let stored = store
		.load()
		.await
		.expect("Store load should succeed after login.")
		.expect("Login must persist the minted credential pair.");

	assert_eq!(stored.access_token.expose(), "access-1");
	assert_eq!(stored.refresh_token.as_ref().map(Secret::expose), Some("refresh-1"));
}

#[tokio::test]
async fn authenticated_check_carries_bearer() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);

	store
		.save(CredentialRecord::new("seeded-access").with_refresh_token("seeded-refresh"))
		.await
		.expect("Failed to seed credentials for the bearer test.");

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth").header("authorization", "Bearer seeded-access");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"user":{"_id":"u-1","userName":"ada","email":"ada@example.com"}}"#);
		})
		.await;
	let user = client.check_auth().await.expect("Auth check should succeed with the seeded token.");

	mock.assert_async().await;

	assert_eq!(user.email, "ada@example.com");
}

#[tokio::test]
async fn failed_check_clears_credentials() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);

	store
		.save(CredentialRecord::new("seeded-access").with_refresh_token("seeded-refresh"))
		.await
		.expect("Failed to seed credentials for the failed-check test.");

	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth");
			then.status(403)
				.header("content-type", "application/json")
				.body(r#"{"message":"account disabled"}"#);
		})
		.await;
	let error = client.check_auth().await.expect_err("A 403 check should surface the rejection.");

	mock.assert_async().await;

	match error {
		Error::Api(rejection) => {
			assert_eq!(rejection.status, 403);
			assert_eq!(rejection.message, "account disabled");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert!(
		store.load().await.expect("Store load should succeed after the check.").is_none(),
		"A failed auth check must clear the stored credentials."
	);
}

#[tokio::test]
async fn expired_token_is_refreshed_and_replayed() {
	let server = MockServer::start_async().await;
	let (client, store) = build_client(&server);

	store
		.save(CredentialRecord::new("expired-access").with_refresh_token("refresh-1"))
		.await
		.expect("Failed to seed expired credentials.");

	let rejected = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth").header("authorization", "Bearer expired-access");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"jwt expired"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh").body(r#"{"refreshToken":"refresh-1"}"#);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"token":"renewed-access"}"#);
		})
		.await;
	let replayed = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth").header("authorization", "Bearer renewed-access");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"user":{"_id":"u-1","userName":"ada","email":"ada@example.com"}}"#);
		})
		.await;
	let user = client.check_auth().await.expect("Auth check should succeed after the refresh.");

	rejected.assert_async().await;
	refresh.assert_async().await;
	replayed.assert_async().await;

	assert_eq!(user.user_name, "ada");

	let rotated = store
		.load()
		.await
		.expect("Store load should succeed after rotation.")
		.expect("Rotated credentials should remain stored.");

	assert_eq!(rotated.access_token.expose(), "renewed-access");
	assert_eq!(
		rotated.refresh_token.as_ref().map(Secret::expose),
		Some("refresh-1"),
		"The previous refresh token is retained when the backend omits a replacement."
	);
}

/// Records the request it receives and answers with a scripted signup envelope.
struct CaptureTransport {
	seen: parking_lot::Mutex<Option<ApiRequest>>,
}
impl CaptureTransport {
	fn new() -> Arc<Self> {
		Arc::new(Self { seen: parking_lot::Mutex::new(None) })
	}
}
impl ApiTransport for CaptureTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_, ApiResponse> {
		Box::pin(async move {
			*self.seen.lock() = Some(request);

			Ok(ApiResponse {
				status: 200,
				body: br#"{
					"user": {"_id": "u-2", "userName": "grace", "email": "grace@example.com"},
					"token": "access-2",
					"refreshToken": "refresh-2"
				}"#
				.to_vec(),
			})
		})
	}
}

#[tokio::test]
async fn signup_submits_structural_multipart() {
	let descriptor = PlatformDescriptor::builder(
		Url::parse("https://backend.test/api/v1").expect("Base URL fixture should parse."),
	)
	.build()
	.expect("Platform descriptor fixture should build.");
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn CredentialStore> = store_backend.clone();
	let transport = CaptureTransport::new();
	let client: Client<CaptureTransport> = Client::with_transport(descriptor, store, transport.clone());
	let request = SignupRequest::new("grace", "grace@example.com", "hopper")
		.with_profile_image(FilePart::new("grace.png", "image/png", vec![7_u8; 16]));
	let user = client.signup(request).await.expect("Signup should succeed.");

	assert_eq!(user.user_name, "grace");

	let seen = transport.seen.lock().clone().expect("Transport should capture the signup request.");

	assert!(seen.bearer.is_none(), "Signup is an anonymous call.");

	let RequestBody::Multipart(form) = &seen.body else {
		panic!("Signup must be submitted as multipart, got {:?}.", seen.body);
	};

	assert_eq!(form.text_value("userName"), Some("grace"));
	assert_eq!(form.text_value("email"), Some("grace@example.com"));
	assert_eq!(form.text_value("password"), Some("hopper"));
	assert!(
		form.parts().any(|part| part.name == "profileImage"
			&& matches!(&part.value, PartValue::File(file) if file.file_name == "grace.png")),
		"The profile image must travel as a file part."
	);

	let stored = store_backend
		.load()
		.await
		.expect("Store load should succeed after signup.")
		.expect("Signup must persist the minted credential pair.");

	assert_eq!(stored.access_token.expose(), "access-2");
}
