use serde::{Deserialize, Serialize};

use crate::base64_blobs::{
	deserialize_array_base64, deserialize_vec_base64, serialize_array_base64, serialize_vec_base64,
};
use rand::rngs::OsRng;
use rand::RngCore;

// See https://www.w3.org/TR/webauthn-2/ for details

// COSE algorithm identifiers requested at registration
pub const ALG_ES256: i32 = -7;
pub const ALG_RS256: i32 = -257;

const CHALLENGE_SIZE: usize = 32;
const USER_HANDLE_SIZE: usize = 16;
const CREDENTIAL_ID_SIZE: usize = 32;
const TIMEOUT_MS: u32 = 60_000;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Challenge {
	#[serde(
		serialize_with = "serialize_array_base64::<_, CHALLENGE_SIZE>",
		deserialize_with = "deserialize_array_base64::<_, CHALLENGE_SIZE>"
	)]
	pub bytes: [u8; Self::SIZE],
}

impl Challenge {
	pub const SIZE: usize = CHALLENGE_SIZE;

	pub fn generate() -> Self {
		let mut bytes = [0u8; Self::SIZE];
		OsRng.fill_bytes(&mut bytes);

		Self { bytes }
	}
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum UserVerification {
	Required,
	Preferred,
	Discouraged,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Attestation {
	None,
	Indirect,
	Direct,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub enum AuthenticatorAttachment {
	#[serde(rename = "platform")]
	Platform,
	#[serde(rename = "cross-platform")]
	CrossPlatform,
}

// The create() ceremony request: platform-resident credential scoped to the
// current origin, ec + rsa in the preference list, verification preferred but
// not required, no attestation.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CredentialCreationOptions {
	pub challenge: Challenge,
	pub rp_id: String,
	pub rp_name: String,
	#[serde(
		serialize_with = "serialize_array_base64::<_, USER_HANDLE_SIZE>",
		deserialize_with = "deserialize_array_base64::<_, USER_HANDLE_SIZE>"
	)]
	pub user_handle: [u8; USER_HANDLE_SIZE],
	pub user_name: String,
	pub user_display_name: String,
	pub algorithms: Vec<i32>,
	pub attachment: AuthenticatorAttachment,
	pub user_verification: UserVerification,
	pub attestation: Attestation,
	pub timeout_ms: u32,
}

impl CredentialCreationOptions {
	pub fn new(rp_id: &str, rp_name: &str, user_name: &str, user_display_name: &str) -> Self {
		Self {
			challenge: Challenge::generate(),
			rp_id: rp_id.to_string(),
			rp_name: rp_name.to_string(),
			user_handle: [0u8; USER_HANDLE_SIZE],
			user_name: user_name.to_string(),
			user_display_name: user_display_name.to_string(),
			algorithms: vec![ALG_ES256, ALG_RS256],
			attachment: AuthenticatorAttachment::Platform,
			user_verification: UserVerification::Preferred,
			attestation: Attestation::None,
			timeout_ms: TIMEOUT_MS,
		}
	}
}

pub type CredentialId = Vec<u8>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Credential {
	#[serde(
		serialize_with = "serialize_vec_base64",
		deserialize_with = "deserialize_vec_base64"
	)]
	pub id: CredentialId,
	// hostname the credential is scoped to
	pub rp_id: String,
}

impl Credential {
	pub fn account_id(&self) -> String {
		base64::encode(&self.id)
	}
}

#[derive(Debug, PartialEq)]
pub enum Error {
	// user cancelled, platform refused, or policy rejected the request
	Declined,
	Unsupported,
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Declined => write!(f, "credential creation declined"),
			Error::Unsupported => write!(f, "no usable platform authenticator"),
		}
	}
}

impl std::error::Error for Error {}

pub trait Authenticator {
	fn create(&self, options: &CredentialCreationOptions) -> Result<Credential, Error>;
}

// Local stand-in for a platform authenticator: mints a random credential id
// scoped to the requested rp. No assertion is ever verified afterwards, so
// nothing beyond the id needs to be kept.
pub struct SoftwareAuthenticator;

impl Authenticator for SoftwareAuthenticator {
	fn create(&self, options: &CredentialCreationOptions) -> Result<Credential, Error> {
		if !options.algorithms.contains(&ALG_ES256) {
			return Err(Error::Unsupported);
		}

		let mut id = vec![0u8; CREDENTIAL_ID_SIZE];
		OsRng.fill_bytes(&mut id);

		Ok(Credential {
			id,
			rp_id: options.rp_id.clone(),
		})
	}
}
