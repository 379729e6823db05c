use crate::{private_key::PrivateKey, public_key::PublicKey};
use serde::{Deserialize, Serialize};

// Field names follow the persisted record shape; both halves land in local
// storage as base64 strings.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
	serialize = "PrivateKey<T, PRIV_SIZE>: Serialize, PublicKey<T, PUB_SIZE>: Serialize",
	deserialize = "PrivateKey<T, PRIV_SIZE>: Deserialize<'de>, PublicKey<T, PUB_SIZE>: Deserialize<'de>"
))]
pub struct KeyPair<T, const PRIV_SIZE: usize, const PUB_SIZE: usize> {
	#[serde(rename = "privateKey")]
	pub private: PrivateKey<T, PRIV_SIZE>,
	#[serde(rename = "publicKey")]
	pub public: PublicKey<T, PUB_SIZE>,
}

impl<T, const PRIV_SIZE: usize, const PUB_SIZE: usize> KeyPair<T, PRIV_SIZE, PUB_SIZE> {
	pub fn new(private: PrivateKey<T, PRIV_SIZE>, public: PublicKey<T, PUB_SIZE>) -> Self {
		Self { private, public }
	}

	pub fn public_key(&self) -> &PublicKey<T, PUB_SIZE> {
		&self.public
	}

	pub fn private_key(&self) -> &PrivateKey<T, PRIV_SIZE> {
		&self.private
	}
}

impl<T, const PRIV_SIZE: usize, const PUB_SIZE: usize> Clone for KeyPair<T, PRIV_SIZE, PUB_SIZE> {
	fn clone(&self) -> Self {
		Self::new(self.private.clone(), self.public.clone())
	}
}

pub trait KeyPairSize {
	const PRIV: usize;
	const PUB: usize;
}
