//! Product operations: the seller's listings and the public catalog.

// self
use crate::{
	_prelude::*,
	api::Client,
	auth::{ProductId, StoreId},
	http::{ApiRequest, ApiTransport, FilePart, Method, MultipartForm},
	model::{Product, ProductsEnvelope},
	obs::CallKind,
};

/// Payload for `POST /store/products` (new listing).
///
/// Sent as multipart: numeric fields travel as their decimal text form alongside the
/// image upload, matching the platform's form encoding.
#[derive(Clone, Debug)]
pub struct NewProduct {
	/// Listing title.
	pub title: String,
	/// Listing description.
	pub description: String,
	/// Unit price.
	pub price: f64,
	/// Product category label.
	pub product_type: String,
	/// Stock size declared by the seller.
	pub total_products: u32,
	/// Optional image upload.
	pub product_image: Option<FilePart>,
}
impl NewProduct {
	/// Creates a listing payload from the mandatory fields.
	pub fn new(
		title: impl Into<String>,
		description: impl Into<String>,
		price: f64,
		product_type: impl Into<String>,
		total_products: u32,
	) -> Self {
		Self {
			title: title.into(),
			description: description.into(),
			price,
			product_type: product_type.into(),
			total_products,
			product_image: None,
		}
	}

	/// Attaches an image upload.
	pub fn with_product_image(mut self, image: FilePart) -> Self {
		self.product_image = Some(image);

		self
	}
}

/// Payload for `PATCH /store/products/{id}` (listing edit).
///
/// The edit form resubmits every field; `previous_url` tells the backend which hosted
/// image the listing held before, so it can drop it when a replacement is uploaded.
#[derive(Clone, Debug)]
pub struct ProductUpdate {
	/// Replacement title.
	pub title: String,
	/// Replacement description.
	pub description: String,
	/// Replacement unit price.
	pub price: f64,
	/// Replacement category label.
	pub product_type: String,
	/// URL of the image currently on file.
	pub previous_url: Option<String>,
	/// Replacement image upload.
	pub product_image: Option<FilePart>,
}
impl ProductUpdate {
	/// Creates an edit payload from the mandatory fields.
	pub fn new(
		title: impl Into<String>,
		description: impl Into<String>,
		price: f64,
		product_type: impl Into<String>,
	) -> Self {
		Self {
			title: title.into(),
			description: description.into(),
			price,
			product_type: product_type.into(),
			previous_url: None,
			product_image: None,
		}
	}

	/// Records the URL of the image currently on file.
	pub fn with_previous_url(mut self, url: impl Into<String>) -> Self {
		self.previous_url = Some(url.into());

		self
	}

	/// Attaches a replacement image upload.
	pub fn with_product_image(mut self, image: FilePart) -> Self {
		self.product_image = Some(image);

		self
	}
}

impl<C> Client<C>
where
	C: ?Sized + ApiTransport,
{
	/// Adds a listing to the store and returns the store's refreshed product list.
	pub async fn add_product(&self, store_id: &StoreId, product: NewProduct) -> Result<Vec<Product>> {
		self.instrumented(CallKind::Product, "add_product", async move {
			let mut form = MultipartForm::new()
				.text("description", product.description)
				.text("title", product.title)
				.text("price", product.price.to_string())
				.text("totalProducts", product.total_products.to_string())
				.text("type", product.product_type)
				.text("storeId", store_id.as_ref().to_owned());

			if let Some(image) = product.product_image {
				form = form.file("productImage", image);
			}

			let response = self
				.gateway
				.send(
					ApiRequest::new(Method::Post, self.gateway.descriptor.store_products()?)
						.multipart(form),
				)
				.await?;

			Ok(response.json::<ProductsEnvelope>()?.products)
		})
		.await
	}

	/// Lists the products owned by the store (the seller dashboard view).
	pub async fn store_products(&self, store_id: &StoreId) -> Result<Vec<Product>> {
		self.instrumented(CallKind::Product, "store_products", async move {
			let mut url = self.gateway.descriptor.store_products()?;

			url.query_pairs_mut().append_pair("storeId", store_id.as_ref());

			let response = self.gateway.send(ApiRequest::new(Method::Get, url)).await?;

			Ok(response.json::<ProductsEnvelope>()?.products)
		})
		.await
	}

	/// Edits an existing listing and returns the store's refreshed product list.
	pub async fn update_product(
		&self,
		product_id: &ProductId,
		update: ProductUpdate,
	) -> Result<Vec<Product>> {
		self.instrumented(CallKind::Product, "update_product", async move {
			let mut form = MultipartForm::new()
				.text("title", update.title)
				.text("desc", update.description)
				.text("price", update.price.to_string())
				.text("type", update.product_type);

			if let Some(url) = update.previous_url {
				form = form.text("previousUrl", url);
			}
			if let Some(image) = update.product_image {
				form = form.file("productImage", image);
			}

			let response = self
				.gateway
				.send(
					ApiRequest::new(Method::Patch, self.gateway.descriptor.store_product(product_id)?)
						.multipart(form),
				)
				.await?;

			Ok(response.json::<ProductsEnvelope>()?.products)
		})
		.await
	}

	/// Removes a listing and returns the store's refreshed product list.
	pub async fn delete_product(
		&self,
		store_id: &StoreId,
		product_id: &ProductId,
	) -> Result<Vec<Product>> {
		self.instrumented(CallKind::Product, "delete_product", async move {
			let mut url = self.gateway.descriptor.store_product(product_id)?;

			url.query_pairs_mut().append_pair("storeId", store_id.as_ref());

			let response = self.gateway.send(ApiRequest::new(Method::Delete, url)).await?;

			Ok(response.json::<ProductsEnvelope>()?.products)
		})
		.await
	}

	/// Browses the public catalog; `limit` caps the page size when set.
	pub async fn catalog(&self, limit: Option<u32>) -> Result<Vec<Product>> {
		self.instrumented(CallKind::Catalog, "catalog", async move {
			let mut url = self.gateway.descriptor.catalog()?;

			if let Some(limit) = limit {
				url.query_pairs_mut().append_pair("limit", &limit.to_string());
			}

			let response = self.gateway.send(ApiRequest::new(Method::Get, url)).await?;

			Ok(response.json::<ProductsEnvelope>()?.products)
		})
		.await
	}
}
