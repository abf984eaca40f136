//! Seller store operations: create, fetch, update, and delete the workspace.

// self
use crate::{
	_prelude::*,
	api::Client,
	auth::{StoreId, UserId},
	http::{ApiRequest, ApiTransport, FilePart, Method, MultipartForm},
	model::{MessageEnvelope, Store, StoreEnvelope, User, UserEnvelope},
	obs::CallKind,
};

/// Payload for `POST /store` (workspace creation).
///
/// Sent as multipart because the creation form may carry a banner image.
#[derive(Clone, Debug)]
pub struct CreateStoreRequest {
	/// Store display name.
	pub store_name: String,
	/// Free-form store description.
	pub description: String,
	/// Store category label.
	pub store_type: String,
	/// Identifier of the owning user.
	pub owner_id: UserId,
	/// Optional banner image upload.
	pub store_image: Option<FilePart>,
}
impl CreateStoreRequest {
	/// Creates a store-creation payload from the mandatory fields.
	pub fn new(
		store_name: impl Into<String>,
		description: impl Into<String>,
		store_type: impl Into<String>,
		owner_id: UserId,
	) -> Self {
		Self {
			store_name: store_name.into(),
			description: description.into(),
			store_type: store_type.into(),
			owner_id,
			store_image: None,
		}
	}

	/// Attaches a banner image upload.
	pub fn with_store_image(mut self, image: FilePart) -> Self {
		self.store_image = Some(image);

		self
	}
}

/// Payload for `PATCH /store`; unset fields are left untouched by the backend.
#[derive(Clone, Debug, Default)]
pub struct StoreUpdate {
	/// Replacement store name.
	pub store_name: Option<String>,
	/// Replacement description.
	pub description: Option<String>,
	/// Replacement category label.
	pub store_type: Option<String>,
}
impl StoreUpdate {
	/// Creates an empty update.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the replacement store name.
	pub fn store_name(mut self, value: impl Into<String>) -> Self {
		self.store_name = Some(value.into());

		self
	}

	/// Sets the replacement description.
	pub fn description(mut self, value: impl Into<String>) -> Self {
		self.description = Some(value.into());

		self
	}

	/// Sets the replacement category label.
	pub fn store_type(mut self, value: impl Into<String>) -> Self {
		self.store_type = Some(value.into());

		self
	}
}

impl<C> Client<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates the seller's store workspace.
	///
	/// The backend responds with the updated owner profile, whose `store_id` points at
	/// the new workspace.
	pub async fn create_store(&self, request: CreateStoreRequest) -> Result<User> {
		self.instrumented(CallKind::Store, "create_store", async move {
			let mut form = MultipartForm::new()
				.text("storeName", request.store_name)
				.text("description", request.description)
				.text("ownerId", String::from(request.owner_id))
				.text("type", request.store_type);

			if let Some(image) = request.store_image {
				form = form.file("storeImage", image);
			}

			let response = self
				.gateway
				.send(
					ApiRequest::new(Method::Post, self.gateway.descriptor.store()?).multipart(form),
				)
				.await?;

			Ok(response.json::<UserEnvelope>()?.user)
		})
		.await
	}

	/// Fetches the authenticated seller's store workspace.
	pub async fn fetch_store(&self) -> Result<Store> {
		self.instrumented(CallKind::Store, "fetch_store", async {
			let response = self
				.gateway
				.send(ApiRequest::new(Method::Get, self.gateway.descriptor.store()?))
				.await?;

			Ok(response.json::<StoreEnvelope>()?.store)
		})
		.await
	}

	/// Applies a partial update to the store workspace.
	pub async fn update_store(&self, update: StoreUpdate) -> Result<User> {
		self.instrumented(CallKind::Store, "update_store", async move {
			let mut fields = serde_json::Map::new();

			if let Some(value) = update.store_name {
				fields.insert("storeName".into(), value.into());
			}
			if let Some(value) = update.description {
				fields.insert("description".into(), value.into());
			}
			if let Some(value) = update.store_type {
				fields.insert("type".into(), value.into());
			}

			let payload = serde_json::Value::Object(fields);
			let response = self
				.gateway
				.send(ApiRequest::new(Method::Patch, self.gateway.descriptor.store()?).json(payload))
				.await?;

			Ok(response.json::<UserEnvelope>()?.user)
		})
		.await
	}

	/// Deletes the store workspace and every product it owns.
	pub async fn delete_store(&self, store_id: &StoreId) -> Result<String> {
		self.instrumented(CallKind::Store, "delete_store", async move {
			let payload = serde_json::json!({ "storeId": store_id.as_ref() });
			let response = self
				.gateway
				.send(
					ApiRequest::new(Method::Delete, self.gateway.descriptor.store()?).json(payload),
				)
				.await?;

			Ok(response.json::<MessageEnvelope>()?.message)
		})
		.await
	}
}
