//! Wire models for the platform's REST payloads.
//!
//! Field names mirror the backend's JSON exactly (Mongo-style `_id`, camelCase keys,
//! and the `desc`/`itemSelled` spellings the product endpoints actually emit), so these
//! types are the only place renames live.

// self
use crate::{
	_prelude::*,
	auth::{ProductId, StoreId, UserId},
};

/// Registered platform user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Backend-assigned identifier.
	#[serde(rename = "_id")]
	pub id: UserId,
	/// Display name chosen at signup.
	pub user_name: String,
	/// Account email address.
	pub email: String,
	/// Avatar image URL, when one was uploaded.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	/// Identifier of the user's store, once one has been created.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub store_id: Option<StoreId>,
	/// Human-readable join date reported by the backend.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub joined: Option<String>,
}

/// Seller store workspace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
	/// Backend-assigned identifier.
	#[serde(rename = "_id")]
	pub id: StoreId,
	/// Store display name.
	pub store_name: String,
	/// Free-form store description.
	pub description: String,
	/// Store category label.
	#[serde(rename = "type")]
	pub store_type: String,
	/// Identifier of the owning user.
	pub owner_id: UserId,
	/// Banner image URL, when one was uploaded.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub store_image: Option<String>,
}

/// Product listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	/// Backend-assigned identifier.
	#[serde(rename = "_id")]
	pub id: ProductId,
	/// Listing title.
	pub title: String,
	/// Listing description.
	#[serde(rename = "desc")]
	pub description: String,
	/// Unit price.
	pub price: f64,
	/// Product category label.
	#[serde(rename = "type")]
	pub product_type: String,
	/// Identifier of the store that owns the listing.
	pub store_id: StoreId,
	/// Image URL, when one was uploaded.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub product_image: Option<String>,
	/// Stock size declared by the seller.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_products: Option<u32>,
	/// Average customer rating.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rating: Option<f64>,
	/// Units sold so far.
	#[serde(default, rename = "itemSelled", skip_serializing_if = "Option::is_none")]
	pub items_sold: Option<u32>,
	/// Units still in stock.
	#[serde(default, rename = "itemRemained", skip_serializing_if = "Option::is_none")]
	pub items_remaining: Option<u32>,
}

/// `{user, token?, refreshToken?}` envelope returned by account operations.
///
/// `GET /auth` responds with the user alone; signup and login additionally mint the
/// token pair.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEnvelope {
	/// Authenticated user.
	pub user: User,
	/// Freshly minted access token, when the operation authenticates.
	#[serde(default)]
	pub token: Option<String>,
	/// Freshly minted refresh token, when the operation authenticates.
	#[serde(default)]
	pub refresh_token: Option<String>,
}

/// `{token, refreshToken?}` envelope returned by `POST /auth/refresh`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshEnvelope {
	/// Replacement access token.
	pub token: String,
	/// Replacement refresh token; the previous one stays valid when omitted.
	#[serde(default)]
	pub refresh_token: Option<String>,
}

/// `{user}` envelope returned by store mutations, which respond with the updated owner
/// profile.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserEnvelope {
	/// Updated owner profile.
	pub user: User,
}

/// `{store}` envelope returned by `GET /store`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StoreEnvelope {
	/// Seller's store workspace.
	pub store: Store,
}

/// `{products}` envelope returned by product operations and the public catalog.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProductsEnvelope {
	/// Product listings, already scoped by the endpoint that produced them.
	pub products: Vec<Product>,
}

/// `{message}` envelope returned by operations that only acknowledge.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MessageEnvelope {
	/// Acknowledgement text.
	pub message: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn product_decodes_backend_spellings() {
		let payload = r#"{
			"_id": "665f1c2ab9d3",
			"title": "Ceramic mug",
			"desc": "Hand-thrown stoneware",
			"price": 18.5,
			"type": "homeware",
			"storeId": "6649bf1a2c",
			"productImage": "https://cdn.example.com/mug.png",
			"totalProducts": 40,
			"itemSelled": 12,
			"itemRemained": 28
		}"#;
		let product: Product =
			serde_json::from_str(payload).expect("Product payload should deserialize.");

		assert_eq!(product.description, "Hand-thrown stoneware");
		assert_eq!(product.store_id.as_ref(), "6649bf1a2c");
		assert_eq!(product.items_sold, Some(12));
		assert!(product.rating.is_none());
	}

	#[test]
	fn auth_envelope_token_pair_is_optional() {
		let check_only = r#"{"user":{"_id":"u-1","userName":"ada","email":"ada@example.com"}}"#;
		let envelope: AuthEnvelope =
			serde_json::from_str(check_only).expect("Check-auth payload should deserialize.");

		assert!(envelope.token.is_none());

		let login = r#"{
			"user": {"_id": "u-1", "userName": "ada", "email": "ada@example.com"},
			"token": "access-1",
			"refreshToken": "refresh-1"
		}"#;
		let envelope: AuthEnvelope =
			serde_json::from_str(login).expect("Login payload should deserialize.");

		assert_eq!(envelope.token.as_deref(), Some("access-1"));
		assert_eq!(envelope.refresh_token.as_deref(), Some("refresh-1"));
	}
}
