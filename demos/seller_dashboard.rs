//! Walks the seller workflow against a mock deployment: authenticate, create a store,
//! add a product listing, and read the dashboard's product list back.

// std
use std::sync::Arc;
// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use url::Url;
// self
use storefront_client::{
	api::{Client, CreateStoreRequest, LoginRequest, NewProduct},
	http::FilePart,
	platform::PlatformDescriptor,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"user": {"_id": "u-1", "userName": "ada", "email": "ada@example.com"},
					"token": "seller-access",
					"refreshToken": "seller-refresh"
				}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/store");
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
	server
		.mock_async(|when, then| {
			when.method(POST).path("/store/products");
			then.status(201).header("content-type", "application/json").body(
				r#"{
					"products": [{
						"_id": "p-1",
						"title": "Ceramic mug",
						"desc": "Hand-thrown stoneware",
						"price": 18.5,
						"type": "homeware",
						"storeId": "s-1",
						"totalProducts": 40
					}]
				}"#,
			);
		})
		.await;

	let descriptor = PlatformDescriptor::builder(Url::parse(&server.base_url())?)
		.allow_insecure_http()
		.build()?;
	let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::default());
	let client = Client::new(descriptor, store);
	let user = client.login(LoginRequest::new("ada@example.com", "open-sesame")).await?;
	let owner = client
		.create_store(
			CreateStoreRequest::new("Mug Haven", "Hand-thrown ceramics", "homeware", user.id.clone())
				.with_store_image(FilePart::new("banner.png", "image/png", vec![0_u8; 32])),
		)
		.await?;
	let store_id =
		owner.store_id.clone().ok_or_else(|| eyre!("Store creation did not assign a store id."))?;
	let listing = client
		.add_product(
			&store_id,
			NewProduct::new("Ceramic mug", "Hand-thrown stoneware", 18.5, "homeware", 40)
				.with_product_image(FilePart::new("mug.png", "image/png", vec![0_u8; 32])),
		)
		.await?;

	println!("Store {} now lists {} product(s).", store_id, listing.len());

	Ok(())
}
