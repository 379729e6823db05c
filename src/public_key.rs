use crate::key::key;

key!(PublicKey);

impl<T, const SIZE: usize> PublicKey<T, SIZE> {
	// short prefix for logs; never use for addressing
	pub fn abbrev(&self) -> String {
		let hex = self.to_hex();
		let len = hex.len().min(16);

		hex[..len].to_string()
	}
}
