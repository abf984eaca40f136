//! Demonstrates logging in against a mock deployment and browsing the public catalog
//! with the default reqwest transport and in-memory credential store.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use storefront_client::{
	api::{Client, LoginRequest},
	platform::PlatformDescriptor,
	store::{CredentialStore, MemoryStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"user": {"_id": "u-1", "userName": "ada", "email": "ada@example.com"},
					"token": "demo-access",
					"refreshToken": "demo-refresh"
				}"#,
			);
		})
		.await;
	let catalog_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/products");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"products": [{
						"_id": "p-1",
						"title": "Ceramic mug",
						"desc": "Hand-thrown stoneware",
						"price": 18.5,
						"type": "homeware",
						"storeId": "s-1"
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

	println!("Signed in as {}.", user.user_name);

	let products = client.catalog(Some(10)).await?;

	for product in &products {
		println!("{} - {:.2}", product.title, product.price);
	}

	login_mock.assert_async().await;
	catalog_mock.assert_async().await;

	Ok(())
}
