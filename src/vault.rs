use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
	base64_blobs::{deserialize_vec_base64, serialize_vec_base64},
	id,
	secp256k1::{self, KeyPairSecp256k1},
	storage::{self, Storage},
	webauthn::{self, Authenticator, CredentialCreationOptions, CredentialId},
};

// The vault binds a display identity to a secp256k1 keypair and a platform
// credential, persisted under `vault-id` (pointer) and `local-vault-<id>`
// (record). Two deliberate properties: unlock trusts the persisted record
// without a fresh authenticator assertion, and key material is stored in
// cleartext. Changing either would break compatibility with existing stores.

const VAULT_ID_KEY: &str = "vault-id";
const VAULT_RECORD_PREFIX: &str = "local-vault-";

const RP_NAME: &str = "Eco-Taxi Form";
const USER_NAME: &str = "eco-taxi-user";
const USER_DISPLAY_NAME: &str = "Eco-Taxi User";

fn record_key(vault_id: &str) -> String {
	format!("{}{}", VAULT_RECORD_PREFIX, vault_id)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserData {
	#[serde(rename = "userName")]
	pub user_name: String,
	// the field name carries a historical typo; existing records expect it
	#[serde(rename = "userKeipair")]
	pub keypair: KeyPairSecp256k1,
	#[serde(
		rename = "credentialId",
		serialize_with = "serialize_vec_base64",
		deserialize_with = "deserialize_vec_base64"
	)]
	pub credential_id: CredentialId,
}

// `data` carries UserData JSON-encoded a second time; existing stores expect
// that exact shape.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct VaultRecord {
	pub data: String,
	#[serde(rename = "accountID")]
	pub account_id: String,
	#[serde(rename = "rpID")]
	pub rp_id: String,
}

#[derive(Debug)]
pub enum Error {
	CredentialCreation(webauthn::Error),
	KeypairGeneration(secp256k1::Error),
	NotFound,
	Corrupt(serde_json::Error),
	NotAuthenticated,
	Storage(storage::Error),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::CredentialCreation(e) => write!(f, "failed to create a credential: {}", e),
			Error::KeypairGeneration(e) => write!(f, "failed to generate a keypair: {}", e),
			Error::NotFound => write!(f, "vault record not found"),
			Error::Corrupt(e) => write!(f, "vault record unreadable: {}", e),
			Error::NotAuthenticated => write!(f, "not authenticated"),
			Error::Storage(e) => write!(f, "{}", e),
		}
	}
}

impl std::error::Error for Error {}

impl From<storage::Error> for Error {
	fn from(err: storage::Error) -> Self {
		Error::Storage(err)
	}
}

pub struct Vault<S, A> {
	storage: S,
	authenticator: A,
	rp_id: String,
	vault_id: Option<String>,
	session: Option<UserData>,
}

impl<S: Storage, A: Authenticator> Vault<S, A> {
	pub fn new(storage: S, authenticator: A, rp_id: &str) -> Self {
		Self {
			storage,
			authenticator,
			rp_id: rp_id.to_string(),
			vault_id: None,
			session: None,
		}
	}

	// Picks up a previously created vault, if any. A broken record is logged
	// and left alone; the caller may register again.
	pub fn initialize(&mut self) -> Result<(), Error> {
		self.vault_id = self.storage.get(VAULT_ID_KEY)?;

		if let Some(vault_id) = self.vault_id.clone() {
			info!(vault_id = %vault_id, "vault found");

			if let Err(e) = self.unlock() {
				warn!(error = %e, "failed to load vault; re-registration required");
			}
		} else {
			info!("no vault found");
		}

		Ok(())
	}

	pub fn login(&mut self) -> Result<(), Error> {
		if self.vault_id.is_some() {
			self.unlock()
		} else {
			self.register()
		}
	}

	pub fn register(&mut self) -> Result<(), Error> {
		let options =
			CredentialCreationOptions::new(&self.rp_id, RP_NAME, USER_NAME, USER_DISPLAY_NAME);
		let credential = self
			.authenticator
			.create(&options)
			.map_err(Error::CredentialCreation)?;
		let keypair = KeyPairSecp256k1::generate().map_err(Error::KeypairGeneration)?;

		let user_data = UserData {
			user_name: USER_DISPLAY_NAME.to_string(),
			keypair,
			credential_id: credential.id.clone(),
		};
		let record = VaultRecord {
			data: serde_json::to_string(&user_data).map_err(Error::Corrupt)?,
			account_id: credential.account_id(),
			rp_id: self.rp_id.clone(),
		};

		let vault_id = id::generate();

		self.storage.set(VAULT_ID_KEY, &vault_id)?;
		self.storage.set(
			&record_key(&vault_id),
			&serde_json::to_string(&record).map_err(Error::Corrupt)?,
		)?;

		info!(
			vault_id = %vault_id,
			public_key = %user_data.keypair.public_key().abbrev(),
			"vault created"
		);

		self.vault_id = Some(vault_id);
		self.session = Some(user_data);

		Ok(())
	}

	// No fresh authenticator assertion here; the persisted record alone is
	// trusted.
	pub fn unlock(&mut self) -> Result<(), Error> {
		let vault_id = self.vault_id.clone().ok_or(Error::NotFound)?;
		let raw = self
			.storage
			.get(&record_key(&vault_id))?
			.ok_or(Error::NotFound)?;

		let record: VaultRecord = serde_json::from_str(&raw).map_err(Error::Corrupt)?;
		let user_data: UserData = serde_json::from_str(&record.data).map_err(Error::Corrupt)?;

		info!(user = %user_data.user_name, "vault unlocked");

		self.session = Some(user_data);

		Ok(())
	}

	// Clears in-memory state only; the persisted record stays, so a later
	// unlock restores the same identity without re-registration.
	pub fn logout(&mut self) {
		self.session = None;

		info!("logged out");
	}

	pub fn is_authenticated(&self) -> bool {
		self.session.is_some()
	}

	pub fn user_name(&self) -> Option<&str> {
		self.session.as_ref().map(|u| u.user_name.as_str())
	}

	pub fn keypair(&self) -> Result<&KeyPairSecp256k1, Error> {
		self.session
			.as_ref()
			.map(|u| &u.keypair)
			.ok_or(Error::NotAuthenticated)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::storage::MemStorage;
	use crate::webauthn::{Credential, SoftwareAuthenticator};
	use std::cell::Cell;

	struct CountingAuthenticator {
		calls: Cell<usize>,
	}

	impl CountingAuthenticator {
		fn new() -> Self {
			Self { calls: Cell::new(0) }
		}
	}

	impl Authenticator for &CountingAuthenticator {
		fn create(&self, options: &CredentialCreationOptions) -> Result<Credential, webauthn::Error> {
			self.calls.set(self.calls.get() + 1);

			SoftwareAuthenticator.create(options)
		}
	}

	struct DecliningAuthenticator;

	impl Authenticator for DecliningAuthenticator {
		fn create(&self, _: &CredentialCreationOptions) -> Result<Credential, webauthn::Error> {
			Err(webauthn::Error::Declined)
		}
	}

	#[test]
	fn test_initialize_empty_store() {
		let storage = MemStorage::new();
		let authenticator = CountingAuthenticator::new();
		let mut vault = Vault::new(&storage, &authenticator, "eco-taxi.one");

		vault.initialize().unwrap();

		assert!(!vault.is_authenticated());
		assert_eq!(authenticator.calls.get(), 0);
		assert!(matches!(vault.keypair(), Err(Error::NotAuthenticated)));
	}

	#[test]
	fn test_register_persists_record() {
		let storage = MemStorage::new();
		let authenticator = CountingAuthenticator::new();
		let mut vault = Vault::new(&storage, &authenticator, "eco-taxi.one");

		vault.initialize().unwrap();
		vault.login().unwrap();

		assert!(vault.is_authenticated());
		assert_eq!(authenticator.calls.get(), 1);

		let vault_id = storage.get("vault-id").unwrap().unwrap();
		let raw = storage
			.get(&format!("local-vault-{}", vault_id))
			.unwrap()
			.unwrap();
		let record: VaultRecord = serde_json::from_str(&raw).unwrap();

		assert_eq!(record.rp_id, "eco-taxi.one");

		// data is double-encoded: a json string holding the user payload
		let user_data: UserData = serde_json::from_str(&record.data).unwrap();

		assert_eq!(user_data.user_name, "Eco-Taxi User");
		assert_eq!(&user_data.keypair, vault.keypair().unwrap());
	}

	#[test]
	fn test_logout_keeps_store() {
		let storage = MemStorage::new();
		let authenticator = CountingAuthenticator::new();
		let mut vault = Vault::new(&storage, &authenticator, "eco-taxi.one");

		vault.login().unwrap();
		let keypair = vault.keypair().unwrap().clone();

		vault.logout();

		assert!(!vault.is_authenticated());
		assert!(storage.get("vault-id").unwrap().is_some());

		// second login unlocks instead of re-registering
		vault.login().unwrap();

		assert_eq!(authenticator.calls.get(), 1);
		assert_eq!(vault.keypair().unwrap(), &keypair);
	}

	#[test]
	fn test_restart_restores_identity() {
		let storage = MemStorage::new();
		let authenticator = CountingAuthenticator::new();

		let keypair = {
			let mut vault = Vault::new(&storage, &authenticator, "eco-taxi.one");
			vault.login().unwrap();
			vault.keypair().unwrap().clone()
		};

		let mut vault = Vault::new(&storage, &authenticator, "eco-taxi.one");
		vault.initialize().unwrap();

		assert!(vault.is_authenticated());
		assert_eq!(vault.keypair().unwrap(), &keypair);
		assert_eq!(authenticator.calls.get(), 1);
	}

	#[test]
	fn test_initialize_downgrades_corrupt_record() {
		let storage = MemStorage::new();
		storage.set("vault-id", "abc").unwrap();
		storage.set("local-vault-abc", "not json").unwrap();

		let mut vault = Vault::new(&storage, SoftwareAuthenticator, "eco-taxi.one");

		// non-fatal: the caller may re-register
		vault.initialize().unwrap();

		assert!(!vault.is_authenticated());
	}

	#[test]
	fn test_unlock_missing_record() {
		let storage = MemStorage::new();
		storage.set("vault-id", "abc").unwrap();

		let mut vault = Vault::new(&storage, SoftwareAuthenticator, "eco-taxi.one");
		vault.initialize().unwrap();

		assert!(matches!(vault.login(), Err(Error::NotFound)));
	}

	#[test]
	fn test_unlock_corrupt_record() {
		let storage = MemStorage::new();
		storage.set("vault-id", "abc").unwrap();
		storage.set("local-vault-abc", "{}").unwrap();

		let mut vault = Vault::new(&storage, SoftwareAuthenticator, "eco-taxi.one");
		vault.initialize().unwrap();

		assert!(matches!(vault.login(), Err(Error::Corrupt(_))));
	}

	#[test]
	fn test_declined_credential() {
		let storage = MemStorage::new();
		let mut vault = Vault::new(&storage, DecliningAuthenticator, "eco-taxi.one");

		assert!(matches!(
			vault.login(),
			Err(Error::CredentialCreation(webauthn::Error::Declined))
		));
		assert!(!vault.is_authenticated());
		// nothing was persisted for the failed attempt
		assert!(storage.get("vault-id").unwrap().is_none());
	}
}
