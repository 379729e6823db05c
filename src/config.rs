use serde::Deserialize;
use std::path::Path;

use crate::secp256k1::PublicKeySecp256k1;

// Deployment constants with the production values baked in as defaults; a
// toml file overrides them per environment.

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
	pub eco_taxi: EcoTaxi,
	pub monday: Option<Monday>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EcoTaxi {
	pub base_url: String,
	// dispatcher public key, hex
	pub admin_key: String,
	pub chunk_size: u64,
}

impl Default for EcoTaxi {
	fn default() -> Self {
		Self {
			base_url: "https://eco-taxi.one".to_string(),
			admin_key: "028f6245d765045c4a8cfe3b44d5e3b4d3dc1d969e4d4d19220b56ac3f77ce19bf"
				.to_string(),
			chunk_size: 10 * 1024 * 1024,
		}
	}
}

#[derive(Deserialize, Debug, Clone)]
pub struct Monday {
	pub board_id: String,
	pub worker_url: String,
	pub api_key: String,
}

#[derive(Debug)]
pub enum Error {
	Io(std::io::Error),
	Parse(toml::de::Error),
	BadAdminKey,
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Io(e) => write!(f, "failed to read config: {}", e),
			Error::Parse(e) => write!(f, "failed to parse config: {}", e),
			Error::BadAdminKey => write!(f, "admin_key is not a hex-encoded public key"),
		}
	}
}

impl std::error::Error for Error {}

impl Config {
	pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
		let raw = std::fs::read_to_string(path).map_err(Error::Io)?;

		toml::from_str(&raw).map_err(Error::Parse)
	}

	pub fn admin_key(&self) -> Result<PublicKeySecp256k1, Error> {
		PublicKeySecp256k1::from_hex(&self.eco_taxi.admin_key).map_err(|_| Error::BadAdminKey)
	}

	// the host the credential is scoped to; the browser build takes it from
	// window.location
	pub fn rp_id(&self) -> String {
		reqwest::Url::parse(&self.eco_taxi.base_url)
			.ok()
			.and_then(|url| url.host_str().map(str::to_string))
			.unwrap_or_else(|| "localhost".to_string())
	}
}
