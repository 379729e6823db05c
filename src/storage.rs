use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

// The local durable key-value store the vault and the submission flow persist
// into; the browser build keeps the same keys in localStorage.

#[derive(Debug)]
pub enum Error {
	Io(std::io::Error),
	Poisoned,
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Io(e) => write!(f, "storage io error: {}", e),
			Error::Poisoned => write!(f, "storage lock poisoned"),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::Io(err)
	}
}

pub trait Storage {
	fn get(&self, key: &str) -> Result<Option<String>, Error>;
	fn set(&self, key: &str, value: &str) -> Result<(), Error>;
	fn remove(&self, key: &str) -> Result<(), Error>;
}

impl<S: Storage + ?Sized> Storage for &S {
	fn get(&self, key: &str) -> Result<Option<String>, Error> {
		(**self).get(key)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), Error> {
		(**self).set(key, value)
	}

	fn remove(&self, key: &str) -> Result<(), Error> {
		(**self).remove(key)
	}
}

// One file per key under a root directory. Keys are plain tokens
// (`vault-id`, `local-vault-<id>`, ..), safe to use as file names as is.
pub struct FileStorage {
	root: PathBuf,
}

impl FileStorage {
	pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
		let root = root.into();

		std::fs::create_dir_all(&root)?;

		Ok(Self { root })
	}

	fn path_for(&self, key: &str) -> PathBuf {
		self.root.join(key)
	}
}

impl Storage for FileStorage {
	fn get(&self, key: &str) -> Result<Option<String>, Error> {
		match std::fs::read_to_string(self.path_for(key)) {
			Ok(value) => Ok(Some(value)),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e.into()),
		}
	}

	fn set(&self, key: &str, value: &str) -> Result<(), Error> {
		Ok(std::fs::write(self.path_for(key), value)?)
	}

	fn remove(&self, key: &str) -> Result<(), Error> {
		match std::fs::remove_file(self.path_for(key)) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}
}

pub struct MemStorage {
	entries: Mutex<HashMap<String, String>>,
}

impl MemStorage {
	pub fn new() -> Self {
		Self {
			entries: Mutex::new(HashMap::new()),
		}
	}
}

impl Storage for MemStorage {
	fn get(&self, key: &str) -> Result<Option<String>, Error> {
		let entries = self.entries.lock().map_err(|_| Error::Poisoned)?;

		Ok(entries.get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), Error> {
		let mut entries = self.entries.lock().map_err(|_| Error::Poisoned)?;

		entries.insert(key.to_string(), value.to_string());

		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), Error> {
		let mut entries = self.entries.lock().map_err(|_| Error::Poisoned)?;

		entries.remove(key);

		Ok(())
	}
}
