use tracing::info;

use crate::{
	api::{self, Api, MessageReceipt},
	attachment::Attachment,
	monday::Monday,
	order::{self, Order},
	storage::{self, Storage},
	vault::{self, Vault},
	webauthn::Authenticator,
};

// Tracked independently of the vault record, so a resubmission after a
// partial failure never registers twice.
const REGISTERED_KEY: &str = "eco-taxi-registered";

#[derive(Debug)]
pub enum Error {
	Order(order::Error),
	Vault(vault::Error),
	Api(api::Error),
	Storage(storage::Error),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Order(e) => write!(f, "{}", e),
			Error::Vault(e) => write!(f, "{}", e),
			Error::Api(e) => write!(f, "{}", e),
			Error::Storage(e) => write!(f, "{}", e),
		}
	}
}

impl std::error::Error for Error {}

impl From<order::Error> for Error {
	fn from(err: order::Error) -> Self {
		Error::Order(err)
	}
}

impl From<vault::Error> for Error {
	fn from(err: vault::Error) -> Self {
		Error::Vault(err)
	}
}

impl From<api::Error> for Error {
	fn from(err: api::Error) -> Self {
		Error::Api(err)
	}
}

impl From<storage::Error> for Error {
	fn from(err: storage::Error) -> Self {
		Error::Storage(err)
	}
}

// Sequences one order submission: once-ever registration, attachment uploads,
// then the order text. A failure anywhere aborts the remaining steps; nothing
// already sent is rolled back or retried, the user simply resubmits.
pub struct Submitter<'a, S> {
	api: &'a Api,
	storage: &'a S,
	monday: Option<&'a Monday>,
}

impl<'a, S: Storage> Submitter<'a, S> {
	pub fn new(api: &'a Api, storage: &'a S) -> Self {
		Self {
			api,
			storage,
			monday: None,
		}
	}

	pub fn with_monday(mut self, monday: &'a Monday) -> Self {
		self.monday = Some(monday);
		self
	}

	pub async fn submit<VS, A>(
		&self,
		vault: &Vault<VS, A>,
		order: &Order,
		files: &[Attachment],
		mut on_progress: impl FnMut(f64, &str),
	) -> Result<MessageReceipt, Error>
	where
		VS: Storage,
		A: Authenticator,
	{
		order.validate()?;

		let keypair = vault.keypair()?;

		// the flag is written only after the call succeeds, so a failed
		// registration is attempted again on the next submission
		if self.storage.get(REGISTERED_KEY)?.is_none() {
			info!("first submission; registering user");

			self.api
				.register_user(order.registrant_name(), keypair)
				.await?;
			self.storage.set(REGISTERED_KEY, "true")?;
		}

		if !files.is_empty() {
			info!(count = files.len(), "uploading attachments");

			self.api
				.upload_files(keypair, files, &mut on_progress)
				.await?;
		}

		let receipt = self.api.send_text(keypair, &order.summary()).await?;

		if let Some(monday) = self.monday {
			// best effort; a crm failure never fails the submission
			monday.create_item(order).await;
		}

		info!(id = %receipt.id, "order submitted");

		Ok(receipt)
	}
}
