use reqwest::header::CONTENT_RANGE;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::{
	attachment::{fmt_bytes, Attachment},
	content_range::ContentRange,
	graphql,
	secp256k1::{KeyPairSecp256k1, PublicKeySecp256k1},
	upload::{batch_progress, ChunkPlan},
};

pub const CHUNK_SIZE: u64 = 10 * 1024 * 1024;

const GRAPHQL_PATH: &str = "/naive_api";
const CHUNK_PATH: &str = "/upload_chunk";

const SIGN_UP: &str = r#"
mutation SignUp($name: String!, $keypair: InputKeyPair) {
	userSignUp(name: $name, keypair: $keypair) {
		name
		keys {
			private_key
			public_key
		}
	}
}"#;

const CHAT_SEND_TEXT: &str = r#"
mutation ChatSendText(
	$keypair: InputKeyPair!
	$peer: PublicKey!
	$text: String!
	$timestamp: Int!
) {
	chatSendText(
		myKeypair: $keypair
		peerPublicKey: $peer
		text: $text
		timestamp: $timestamp
	) {
		id
		index
	}
}"#;

const GET_UPLOAD_KEY: &str = r#"
mutation GetUploadKey(
	$myKeypair: InputKeyPair!
	$destination: InputUploadDestination!
	$entry: InputUploadEntry!
	$timestamp: Int!
) {
	uploadKey(
		myKeypair: $myKeypair
		destination: $destination
		entry: $entry
		timestamp: $timestamp
	)
}"#;

const CHAT_SEND_FILE: &str = r#"
mutation ChatSendFile(
	$keypair: InputKeyPair!
	$peer: PublicKey!
	$uploadKey: FileKey!
	$timestamp: Int!
) {
	chatSendFile(
		myKeypair: $keypair
		peerPublicKey: $peer
		uploadKey: $uploadKey
		timestamp: $timestamp
	) {
		id
		index
	}
}"#;

#[derive(Debug)]
pub enum Error {
	Http(reqwest::Error),
	Transport { status: u16, body: String },
	// the response carried an `errors` field; the payload is kept verbatim
	Application(Vec<Value>),
	MissingData,
	BadUploadKey,
	Chunk { index: usize, total: usize, status: u16 },
	Io(std::io::Error),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Http(e) => write!(f, "request failed: {}", e),
			Error::Transport { status, body } => {
				write!(f, "request failed with status {}: {}", status, body)
			}
			Error::Application(errors) => write!(
				f,
				"server rejected the call: {}",
				serde_json::to_string(errors).unwrap_or_default()
			),
			Error::MissingData => write!(f, "response carried no data"),
			Error::BadUploadKey => write!(f, "upload key is not valid base64"),
			Error::Chunk {
				index,
				total,
				status,
			} => write!(
				f,
				"upload failed for chunk {}/{} with status {}",
				index + 1,
				total,
				status
			),
			Error::Io(e) => write!(f, "failed to read attachment: {}", e),
		}
	}
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Error::Http(err)
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::Io(err)
	}
}

// Keys cross the wire as hex; the at-rest base64 encoding never leaves the
// process.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct WireKeyPair {
	public_key: String,
	private_key: String,
}

impl WireKeyPair {
	fn from_keypair(keypair: &KeyPairSecp256k1) -> Self {
		Self {
			public_key: keypair.public_key().to_hex(),
			private_key: keypair.private_key().to_hex(),
		}
	}

	fn peer(public: &PublicKeySecp256k1) -> Self {
		Self {
			public_key: public.to_hex(),
			private_key: String::new(),
		}
	}
}

#[derive(Serialize, Debug)]
struct UploadDestination {
	#[serde(rename = "type")]
	kind: &'static str,
	keypair: WireKeyPair,
}

impl UploadDestination {
	fn dialog(peer: &PublicKeySecp256k1) -> Self {
		Self {
			kind: "DIALOG",
			keypair: WireKeyPair::peer(peer),
		}
	}
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UploadEntry {
	client_name: String,
	client_type: String,
	client_size: u64,
	client_relative_path: &'static str,
	client_last_modified: i64,
}

impl From<&Attachment> for UploadEntry {
	fn from(file: &Attachment) -> Self {
		Self {
			client_name: file.name.clone(),
			client_type: file.mime.clone(),
			client_size: file.size,
			client_relative_path: "/",
			client_last_modified: file.last_modified,
		}
	}
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MessageReceipt {
	pub id: String,
	pub index: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserKeys {
	pub private_key: String,
	pub public_key: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserRecord {
	pub name: String,
	pub keys: UserKeys,
}

#[derive(Deserialize)]
struct SignUpData {
	#[serde(rename = "userSignUp")]
	user: UserRecord,
}

#[derive(Deserialize)]
struct SendTextData {
	#[serde(rename = "chatSendText")]
	receipt: MessageReceipt,
}

#[derive(Deserialize)]
struct UploadKeyData {
	#[serde(rename = "uploadKey")]
	key: String,
}

#[derive(Deserialize)]
struct SendFileData {
	#[serde(rename = "chatSendFile")]
	receipt: MessageReceipt,
}

// Server-issued destination token for one pending upload; base64 as issued,
// hex only when addressing the chunk endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadKey(String);

impl UploadKey {
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn to_hex(&self) -> Result<String, Error> {
		base64::decode(&self.0)
			.map(hex::encode)
			.map_err(|_| Error::BadUploadKey)
	}
}

pub struct Api {
	http: reqwest::Client,
	base_url: String,
	admin_key: PublicKeySecp256k1,
	chunk_size: u64,
}

impl Api {
	pub fn new(base_url: &str, admin_key: PublicKeySecp256k1) -> Self {
		Self {
			http: reqwest::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
			admin_key,
			chunk_size: CHUNK_SIZE,
		}
	}

	pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
		self.chunk_size = chunk_size;
		self
	}

	async fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, Error> {
		let url = format!("{}{}", self.base_url, GRAPHQL_PATH);
		let response = self
			.http
			.post(&url)
			.json(&graphql::Request { query, variables })
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(Error::Transport {
				status: status.as_u16(),
				body: response.text().await.unwrap_or_default(),
			});
		}

		let body: graphql::Response<T> = response.json().await?;

		if let Some(errors) = body.errors {
			return Err(Error::Application(errors));
		}

		body.data.ok_or(Error::MissingData)
	}

	// Safe to repeat for the same public key server-side; the submission flow
	// still calls it at most once per local identity.
	pub async fn register_user(
		&self,
		name: &str,
		keypair: &KeyPairSecp256k1,
	) -> Result<UserRecord, Error> {
		info!(name, public_key = %keypair.public_key().abbrev(), "registering user");

		let variables = json!({
			"name": name,
			"keypair": WireKeyPair::from_keypair(keypair),
		});

		let data: SignUpData = self.graphql(SIGN_UP, variables).await?;

		Ok(data.user)
	}

	pub async fn send_text(
		&self,
		keypair: &KeyPairSecp256k1,
		text: &str,
	) -> Result<MessageReceipt, Error> {
		let variables = json!({
			"keypair": WireKeyPair::from_keypair(keypair),
			"peer": self.admin_key.to_hex(),
			"text": text,
			"timestamp": now(),
		});

		let data: SendTextData = self.graphql(CHAT_SEND_TEXT, variables).await?;

		info!(id = %data.receipt.id, "text message sent");

		Ok(data.receipt)
	}

	pub async fn upload_key(
		&self,
		keypair: &KeyPairSecp256k1,
		file: &Attachment,
	) -> Result<UploadKey, Error> {
		let variables = json!({
			"myKeypair": WireKeyPair::from_keypair(keypair),
			"destination": UploadDestination::dialog(&self.admin_key),
			"entry": UploadEntry::from(file),
			"timestamp": now(),
		});

		let data: UploadKeyData = self.graphql(GET_UPLOAD_KEY, variables).await?;

		Ok(UploadKey::new(data.key))
	}

	// Chunks go out strictly in ascending order, one at a time; the first
	// failing chunk aborts the rest with no retry.
	pub async fn upload_chunks(
		&self,
		file: &Attachment,
		key: &UploadKey,
		mut on_progress: impl FnMut(f64),
	) -> Result<(), Error> {
		let plan = ChunkPlan::new(file.size, self.chunk_size);
		let url = format!("{}{}/{}", self.base_url, CHUNK_PATH, key.to_hex()?);

		for (index, span) in plan.spans().enumerate() {
			let bytes = file.read_chunk(span.start, span.len()).await?;
			let range = ContentRange::for_span(span.start, span.end, file.size);

			let response = self
				.http
				.put(&url)
				.header(CONTENT_RANGE, range.to_string())
				.body(bytes)
				.send()
				.await?;

			if !response.status().is_success() {
				return Err(Error::Chunk {
					index,
					total: plan.num_chunks,
					status: response.status().as_u16(),
				});
			}

			debug!(chunk = index + 1, total = plan.num_chunks, "chunk uploaded");

			on_progress((index + 1) as f64 / plan.num_chunks as f64 * 100.0);
		}

		Ok(())
	}

	pub async fn send_file(
		&self,
		keypair: &KeyPairSecp256k1,
		key: &UploadKey,
	) -> Result<MessageReceipt, Error> {
		let variables = json!({
			"keypair": WireKeyPair::from_keypair(keypair),
			"peer": self.admin_key.to_hex(),
			"uploadKey": key.as_str(),
			"timestamp": now(),
		});

		let data: SendFileData = self.graphql(CHAT_SEND_FILE, variables).await?;

		Ok(data.receipt)
	}

	// key -> chunks -> chat message; fails fast at whichever step breaks, and
	// already completed steps are left as they are
	pub async fn upload_file(
		&self,
		keypair: &KeyPairSecp256k1,
		file: &Attachment,
		mut on_progress: impl FnMut(f64),
	) -> Result<UploadKey, Error> {
		info!(file = %file.name, size = %fmt_bytes(file.size), "uploading file");

		let key = self.upload_key(keypair, file).await?;

		self.upload_chunks(file, &key, &mut on_progress).await?;
		self.send_file(keypair, &key).await?;

		Ok(key)
	}

	// Strictly sequential; the first failing file aborts the remaining batch.
	// Progress spans the whole batch and reaches 100 only after the last chunk
	// of the last file.
	pub async fn upload_files(
		&self,
		keypair: &KeyPairSecp256k1,
		files: &[Attachment],
		mut on_progress: impl FnMut(f64, &str),
	) -> Result<Vec<UploadKey>, Error> {
		let count = files.len();
		let mut keys = Vec::with_capacity(count);

		for (index, file) in files.iter().enumerate() {
			let label = format!("{} ({}/{})", file.name, index + 1, count);
			let key = self
				.upload_file(keypair, file, |progress| {
					on_progress(batch_progress(index, count, progress), &label)
				})
				.await?;

			keys.push(key);
		}

		Ok(keys)
	}
}

fn now() -> i64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or_default()
}
