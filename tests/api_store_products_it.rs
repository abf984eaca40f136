#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use url::Url;
// self
use storefront_client::{
	api::{Client, CreateStoreRequest, NewProduct, ProductUpdate, StoreUpdate},
	auth::{CredentialRecord, ProductId, StoreId, UserId},
	http::ReqwestTransport,
	platform::PlatformDescriptor,
	store::{CredentialStore, MemoryStore},
};

const STORE_JSON: &str = r#"{
	"_id": "s-1",
	"storeName": "Mug Haven",
	"description": "Hand-thrown ceramics",
	"type": "homeware",
	"ownerId": "u-1"
}"#;
const PRODUCT_JSON: &str = r#"{
	"_id": "p-1",
	"title": "Ceramic mug",
	"desc": "Hand-thrown stoneware",
	"price": 18.5,
	"type": "homeware",
	"storeId": "s-1"
}"#;

async fn build_seller_client(server: &MockServer) -> Client<ReqwestTransport> {
	let descriptor = PlatformDescriptor::builder(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse."),
	)
	.allow_insecure_http()
	.build()
	.expect("Platform descriptor should build for the mock server.");
	let store_backend = Arc::new(MemoryStore::default());
	let store: Arc<dyn CredentialStore> = store_backend.clone();

	store_backend
		.save(CredentialRecord::new("seller-access").with_refresh_token("seller-refresh"))
		.await
		.expect("Failed to seed seller credentials.");

	Client::with_transport(descriptor, store, ReqwestTransport::default())
}

fn store_id() -> StoreId {
	StoreId::new("s-1").expect("Store identifier fixture should be valid.")
}

fn product_id() -> ProductId {
	ProductId::new("p-1").expect("Product identifier fixture should be valid.")
}

#[tokio::test]
async fn create_store_returns_updated_owner() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/store").header("authorization", "Bearer seller-access");
			then.status(201).header("content-type", "application/json").body(
				r#"{
					"user": {
						"_id": "u-1",
						"userName": "ada",
						"email": "ada@example.com",
						"storeId": "s-1"
					}
				}"#,
			);
		})
		.await;
	let owner_id = UserId::new("u-1").expect("User identifier fixture should be valid.");
	let user = client
		.create_store(CreateStoreRequest::new("Mug Haven", "Hand-thrown ceramics", "homeware", owner_id))
		.await
		.expect("Store creation should succeed.");

	mock.assert_async().await;

	assert_eq!(user.store_id.as_ref().map(AsRef::as_ref), Some("s-1"));
}

#[tokio::test]
async fn fetch_store_unwraps_envelope() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/store").header("authorization", "Bearer seller-access");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!(r#"{{"store":{STORE_JSON}}}"#));
		})
		.await;
	let store = client.fetch_store().await.expect("Store fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(store.store_name, "Mug Haven");
	assert_eq!(store.owner_id.as_ref(), "u-1");
}

#[tokio::test]
async fn update_store_sends_only_set_fields() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/store").body(r#"{"storeName":"Mug Palace"}"#);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"user":{"_id":"u-1","userName":"ada","email":"ada@example.com"}}"#);
		})
		.await;
	let user = client
		.update_store(StoreUpdate::new().store_name("Mug Palace"))
		.await
		.expect("Store update should succeed.");

	mock.assert_async().await;

	assert_eq!(user.user_name, "ada");
}

#[tokio::test]
async fn delete_store_acknowledges() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/store").body(r#"{"storeId":"s-1"}"#);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"message":"store deleted"}"#);
		})
		.await;
	let message = client.delete_store(&store_id()).await.expect("Store deletion should succeed.");

	mock.assert_async().await;

	assert_eq!(message, "store deleted");
}

#[tokio::test]
async fn add_product_returns_refreshed_listing() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/store/products")
				.header("authorization", "Bearer seller-access");
			then.status(201)
				.header("content-type", "application/json")
				.body(format!(r#"{{"products":[{PRODUCT_JSON}]}}"#));
		})
		.await;
	let products = client
		.add_product(
			&store_id(),
			NewProduct::new("Ceramic mug", "Hand-thrown stoneware", 18.5, "homeware", 40),
		)
		.await
		.expect("Product creation should succeed.");

	mock.assert_async().await;

	assert_eq!(products.len(), 1);
	assert_eq!(products[0].title, "Ceramic mug");
	assert_eq!(products[0].store_id.as_ref(), "s-1");
}

#[tokio::test]
async fn store_products_scopes_by_store() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/store/products").query_param("storeId", "s-1");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!(r#"{{"products":[{PRODUCT_JSON}]}}"#));
		})
		.await;
	let products =
		client.store_products(&store_id()).await.expect("Product listing should succeed.");

	mock.assert_async().await;

	assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn update_product_targets_listing_route() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/store/products/p-1");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!(r#"{{"products":[{PRODUCT_JSON}]}}"#));
		})
		.await;
	let update = ProductUpdate::new("Ceramic mug", "Hand-thrown stoneware", 19.0, "homeware")
		.with_previous_url("https://cdn.example.com/mug.png");
	let products =
		client.update_product(&product_id(), update).await.expect("Product edit should succeed.");

	mock.assert_async().await;

	assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn delete_product_scopes_by_store() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/store/products/p-1").query_param("storeId", "s-1");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"products":[]}"#);
		})
		.await;
	let products = client
		.delete_product(&store_id(), &product_id())
		.await
		.expect("Product deletion should succeed.");

	mock.assert_async().await;

	assert!(products.is_empty());
}

#[tokio::test]
async fn catalog_passes_limit_through() {
	let server = MockServer::start_async().await;
	let client = build_seller_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/products").query_param("limit", "8");
			then.status(200)
				.header("content-type", "application/json")
				.body(format!(r#"{{"products":[{PRODUCT_JSON}]}}"#));
		})
		.await;
	let products = client.catalog(Some(8)).await.expect("Catalog browse should succeed.");

	mock.assert_async().await;

	assert_eq!(products.len(), 1);
	assert_eq!(products[0].price, 18.5);
}
