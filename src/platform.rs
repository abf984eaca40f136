//! Platform descriptor: the validated base URL and the REST routes the client consumes.
//!
//! The descriptor is the single source of truth for the platform's surface:
//! `/auth` (+ `/auth/login`, `/auth/refresh`), `/store`, `/store/products`, and the
//! public `/products` catalog. Routes are joined onto the base URL at call time so a
//! descriptor can be serialized into configuration files.

// self
use crate::{_prelude::*, auth::ProductId, error::ConfigError};

const ROUTE_AUTH: &str = "auth";
const ROUTE_LOGIN: &str = "auth/login";
const ROUTE_REFRESH: &str = "auth/refresh";
const ROUTE_STORE: &str = "store";
const ROUTE_STORE_PRODUCTS: &str = "store/products";
const ROUTE_CATALOG: &str = "products";

/// Errors raised while constructing or validating a platform descriptor.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum PlatformDescriptorError {
	/// The base URL must use HTTPS unless plain HTTP is explicitly allowed.
	#[error("The platform base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// The base URL cannot serve as a base for relative routes.
	#[error("The platform base URL cannot be a base for API routes: {url}.")]
	CannotBeBase {
		/// Base URL that failed validation.
		url: String,
	},
}

/// Immutable descriptor of the platform deployment the client talks to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
	/// Base API URL; always carries a trailing slash so routes join cleanly.
	pub base_url: Url,
}
impl PlatformDescriptor {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> PlatformDescriptorBuilder {
		PlatformDescriptorBuilder::new(base_url)
	}

	/// Route of the account resource (`GET`/`POST`/`PATCH /auth`).
	pub fn auth(&self) -> Result<Url> {
		self.route(ROUTE_AUTH)
	}

	/// Route of the login operation (`POST /auth/login`).
	pub fn login(&self) -> Result<Url> {
		self.route(ROUTE_LOGIN)
	}

	/// Route of the token refresh operation (`POST /auth/refresh`).
	pub fn refresh(&self) -> Result<Url> {
		self.route(ROUTE_REFRESH)
	}

	/// Route of the seller's store resource (`POST`/`GET`/`PATCH`/`DELETE /store`).
	pub fn store(&self) -> Result<Url> {
		self.route(ROUTE_STORE)
	}

	/// Route of the store's product collection (`POST`/`GET /store/products`).
	pub fn store_products(&self) -> Result<Url> {
		self.route(ROUTE_STORE_PRODUCTS)
	}

	/// Route of a single store product (`PATCH`/`DELETE /store/products/{id}`).
	pub fn store_product(&self, product_id: &ProductId) -> Result<Url> {
		self.base_url
			.join(&format!("{ROUTE_STORE_PRODUCTS}/{}", product_id.as_ref()))
			.map_err(|source| ConfigError::InvalidRoute { route: ROUTE_STORE_PRODUCTS, source })
			.map_err(Error::from)
	}

	/// Route of the public catalog listing (`GET /products`).
	pub fn catalog(&self) -> Result<Url> {
		self.route(ROUTE_CATALOG)
	}

	fn route(&self, route: &'static str) -> Result<Url> {
		self.base_url
			.join(route)
			.map_err(|source| ConfigError::InvalidRoute { route, source })
			.map_err(Error::from)
	}
}

/// Builder for [`PlatformDescriptor`] values.
#[derive(Debug)]
pub struct PlatformDescriptorBuilder {
	/// Base URL for the deployment being described.
	pub base_url: Url,
	/// Permits `http://` bases for local development deployments.
	pub allow_insecure_http: bool,
}
impl PlatformDescriptorBuilder {
	/// Creates a new builder seeded with the provided base URL.
	pub fn new(base_url: Url) -> Self {
		Self { base_url, allow_insecure_http: false }
	}

	/// Allows a plain-HTTP base URL (local development only).
	pub fn allow_insecure_http(mut self) -> Self {
		self.allow_insecure_http = true;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<PlatformDescriptor, PlatformDescriptorError> {
		let mut base_url = self.base_url;

		if base_url.cannot_be_a_base() {
			return Err(PlatformDescriptorError::CannotBeBase { url: base_url.to_string() });
		}
		if base_url.scheme() != "https" && !(self.allow_insecure_http && base_url.scheme() == "http")
		{
			return Err(PlatformDescriptorError::InsecureBaseUrl { url: base_url.to_string() });
		}
		if !base_url.path().ends_with('/') {
			let normalized = format!("{}/", base_url.path());

			base_url.set_path(&normalized);
		}

		Ok(PlatformDescriptor { base_url })
	}
}
