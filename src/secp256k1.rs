use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use rand::rngs::OsRng;

use crate::{
	key_pair::{KeyPair, KeyPairSize},
	private_key::PrivateKey,
	public_key::PublicKey,
};

#[derive(Debug, PartialEq)]
pub struct KeyTypeSecp256k1;

impl KeyPairSize for KeyTypeSecp256k1 {
	const PRIV: usize = 32;
	// compressed sec1 point
	const PUB: usize = 33;
}

pub type PrivateKeySecp256k1 = PrivateKey<KeyTypeSecp256k1, { KeyTypeSecp256k1::PRIV }>;
pub type PublicKeySecp256k1 = PublicKey<KeyTypeSecp256k1, { KeyTypeSecp256k1::PUB }>;
pub type KeyPairSecp256k1 =
	KeyPair<KeyTypeSecp256k1, { KeyTypeSecp256k1::PRIV }, { KeyTypeSecp256k1::PUB }>;

#[derive(Debug, PartialEq)]
pub enum Error {
	BadPrivateKey,
	BadPublicKey,
	// the freshly generated pair failed its own re-derivation check
	DerivationMismatch,
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::BadPrivateKey => write!(f, "bad secp256k1 private key"),
			Error::BadPublicKey => write!(f, "bad secp256k1 public key"),
			Error::DerivationMismatch => {
				write!(f, "derived public key does not match the generated one")
			}
		}
	}
}

impl std::error::Error for Error {}

impl PrivateKeySecp256k1 {
	pub fn generate() -> Self {
		let secret = SecretKey::random(&mut OsRng);
		let bytes: [u8; KeyTypeSecp256k1::PRIV] = secret.to_bytes().into();

		Self::new(bytes)
	}
}

impl PublicKeySecp256k1 {
	pub fn from_private(key: &PrivateKeySecp256k1) -> Result<Self, Error> {
		let secret = SecretKey::from_slice(key.as_bytes()).map_err(|_| Error::BadPrivateKey)?;
		let point = secret.public_key().to_encoded_point(true);
		let bytes: [u8; KeyTypeSecp256k1::PUB] =
			point.as_bytes().try_into().map_err(|_| Error::BadPublicKey)?;

		Ok(Self::new(bytes))
	}

	pub fn from_hex(s: &str) -> Result<Self, Error> {
		let bytes = hex::decode(s).map_err(|_| Error::BadPublicKey)?;

		Self::try_from(bytes).map_err(|_| Error::BadPublicKey)
	}
}

impl KeyPairSecp256k1 {
	// The re-derivation check is mandatory: a mismatched pair would make every
	// subsequent addressed operation unverifiable, so fail here, not later.
	pub fn generate() -> Result<Self, Error> {
		let private = PrivateKeySecp256k1::generate();
		let public = PublicKeySecp256k1::from_private(&private)?;
		let rederived = PublicKeySecp256k1::from_private(&private)?;

		if rederived != public {
			return Err(Error::DerivationMismatch);
		}

		Ok(Self::new(private, public))
	}
}
