use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

// A file picked for upload. Only metadata is held here; chunk reads open the
// file and pull one range at a time, so a single chunk is resident in memory
// regardless of the file size.
#[derive(Debug, Clone)]
pub struct Attachment {
	pub name: String,
	pub mime: String,
	pub size: u64,
	// unix seconds
	pub last_modified: i64,
	path: PathBuf,
}

impl Attachment {
	pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
		let path = path.as_ref().to_path_buf();
		let metadata = tokio::fs::metadata(&path).await?;
		let name = path
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.ok_or_else(|| {
				std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
			})?;
		let mime = mime_guess::from_path(&path)
			.first_or_octet_stream()
			.essence_str()
			.to_string();
		let last_modified = metadata
			.modified()
			.ok()
			.and_then(|t| t.duration_since(UNIX_EPOCH).ok())
			.map(|d| d.as_secs() as i64)
			.unwrap_or(0);

		Ok(Self {
			name,
			mime,
			size: metadata.len(),
			last_modified,
			path,
		})
	}

	pub async fn read_chunk(&self, start: u64, len: u64) -> Result<Vec<u8>, std::io::Error> {
		let mut file = File::open(&self.path).await?;

		file.seek(SeekFrom::Start(start)).await?;

		let mut buf = vec![0u8; len as usize];

		file.read_exact(&mut buf).await?;

		Ok(buf)
	}
}

pub fn fmt_bytes(bytes: u64) -> String {
	if bytes == 0 {
		return "0 Bytes".to_string();
	}

	const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
	const K: f64 = 1024.0;

	let exp = ((bytes as f64).ln() / K.ln()).floor() as usize;
	let exp = exp.min(UNITS.len() - 1);
	let value = (bytes as f64 / K.powi(exp as i32) * 100.0).round() / 100.0;

	if value.fract() == 0.0 {
		format!("{} {}", value as u64, UNITS[exp])
	} else {
		format!("{} {}", value, UNITS[exp])
	}
}
