//! Account operations: signup, login, auth checks, and profile maintenance.

// self
use crate::{
	_prelude::*,
	api::Client,
	auth::{CredentialRecord, Secret},
	error::ApiRejection,
	http::{ApiRequest, ApiResponse, ApiTransport, FilePart, Method, MultipartForm},
	model::{AuthEnvelope, User},
	obs::CallKind,
};

/// Payload for `POST /auth` (account creation).
///
/// Sent as multipart because the signup form may carry a profile image.
#[derive(Clone, Debug)]
pub struct SignupRequest {
	/// Display name for the new account.
	pub user_name: String,
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: Secret,
	/// Optional profile image upload.
	pub profile_image: Option<FilePart>,
}
impl SignupRequest {
	/// Creates a signup payload from the mandatory fields.
	pub fn new(
		user_name: impl Into<String>,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			user_name: user_name.into(),
			email: email.into(),
			password: Secret::new(password),
			profile_image: None,
		}
	}

	/// Attaches a profile image upload.
	pub fn with_profile_image(mut self, image: FilePart) -> Self {
		self.profile_image = Some(image);

		self
	}
}

/// Payload for `POST /auth/login`.
#[derive(Clone, Debug)]
pub struct LoginRequest {
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: Secret,
}
impl LoginRequest {
	/// Creates a login payload.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: Secret::new(password) }
	}
}

/// Image reference carried by profile updates: either a fresh upload or the URL of the
/// image already on file (the form always resubmits one of the two).
#[derive(Clone, Debug)]
pub enum ImageSource {
	/// Newly selected file to upload.
	Upload(FilePart),
	/// URL of an image the backend already hosts.
	Url(String),
}

/// Payload for `PATCH /auth` (profile maintenance).
#[derive(Clone, Debug)]
pub struct ProfileUpdate {
	/// Replacement display name.
	pub user_name: String,
	/// Replacement email address.
	pub email: String,
	/// Avatar to keep or replace.
	pub avatar: Option<ImageSource>,
}
impl ProfileUpdate {
	/// Creates a profile update from the mandatory fields.
	pub fn new(user_name: impl Into<String>, email: impl Into<String>) -> Self {
		Self { user_name: user_name.into(), email: email.into(), avatar: None }
	}

	/// Sets the avatar reference.
	pub fn with_avatar(mut self, avatar: ImageSource) -> Self {
		self.avatar = Some(avatar);

		self
	}
}

impl<C> Client<C>
where
	C: ?Sized + ApiTransport,
{
	/// Registers a new account and stores the minted token pair.
	pub async fn signup(&self, request: SignupRequest) -> Result<User> {
		self.instrumented(CallKind::Auth, "signup", async move {
			let mut form = MultipartForm::new()
				.text("userName", request.user_name)
				.text("email", request.email)
				.text("password", request.password.expose().to_owned());

			if let Some(image) = request.profile_image {
				form = form.file("profileImage", image);
			}

			let response = self
				.gateway
				.send(
					ApiRequest::new(Method::Post, self.gateway.descriptor.auth()?).multipart(form),
				)
				.await?;

			self.adopt_session(response).await
		})
		.await
	}

	/// Authenticates with email + password and stores the minted token pair.
	pub async fn login(&self, request: LoginRequest) -> Result<User> {
		self.instrumented(CallKind::Auth, "login", async move {
			let payload = serde_json::json!({
				"email": request.email,
				"password": request.password.expose(),
			});
			let response = self
				.gateway
				.send(ApiRequest::new(Method::Post, self.gateway.descriptor.login()?).json(payload))
				.await?;

			self.adopt_session(response).await
		})
		.await
	}

	/// Validates the stored session against `GET /auth` and returns the account profile.
	///
	/// A check that comes back with an error status ends the local session: the stored
	/// credentials are discarded before the error is surfaced, so a stale token never
	/// lingers past a failed check.
	pub async fn check_auth(&self) -> Result<User> {
		self.instrumented(CallKind::Auth, "check_auth", async {
			let request = ApiRequest::new(Method::Get, self.gateway.descriptor.auth()?);

			match self.gateway.send(request).await {
				Ok(response) => Ok(response.json::<AuthEnvelope>()?.user),
				Err(error) => {
					if matches!(error, Error::Api(_)) {
						self.gateway.discard_credentials().await?;
					}

					Err(error)
				},
			}
		})
		.await
	}

	/// Updates display name, email, and avatar via `PATCH /auth`.
	pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
		self.instrumented(CallKind::Auth, "update_profile", async move {
			let mut form = MultipartForm::new()
				.text("userName", update.user_name)
				.text("email", update.email);

			match update.avatar {
				Some(ImageSource::Upload(image)) => form = form.file("profileImage", image),
				Some(ImageSource::Url(url)) => form = form.text("profileImage", url),
				None => {},
			}

			let response = self
				.gateway
				.send(
					ApiRequest::new(Method::Patch, self.gateway.descriptor.auth()?).multipart(form),
				)
				.await?;

			Ok(response.json::<AuthEnvelope>()?.user)
		})
		.await
	}

	/// Rotates the account password via `PATCH /auth`.
	pub async fn change_password(
		&self,
		current: impl Into<String>,
		replacement: impl Into<String>,
	) -> Result<User> {
		let current = Secret::new(current);
		let replacement = Secret::new(replacement);

		self.instrumented(CallKind::Auth, "change_password", async move {
			let form = MultipartForm::new()
				.text("currentPass", current.expose().to_owned())
				.text("newPass", replacement.expose().to_owned());
			let response = self
				.gateway
				.send(
					ApiRequest::new(Method::Patch, self.gateway.descriptor.auth()?).multipart(form),
				)
				.await?;

			Ok(response.json::<AuthEnvelope>()?.user)
		})
		.await
	}

	/// Persists the token pair an authentication envelope carries and returns the user.
	async fn adopt_session(&self, response: ApiResponse) -> Result<User> {
		let envelope = response.json::<AuthEnvelope>()?;
		let Some(token) = envelope.token else {
			return Err(ApiRejection {
				message: "Authentication response did not include a token".into(),
				status: response.status,
			}
			.into());
		};
		let mut record = CredentialRecord::new(token);

		if let Some(refresh) = envelope.refresh_token {
			record = record.with_refresh_token(refresh);
		}

		self.gateway.adopt_credentials(record).await?;

		Ok(envelope.user)
	}
}
