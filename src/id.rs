use rand::{rngs::OsRng, RngCore};

const TOKEN_BYTES: usize = 12;
const TOKEN_LEN: usize = 16;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// Short, locally unique token used to name a vault record. Not a secret and
// not globally unique; collisions within one local store are what matters.
pub fn generate() -> String {
	let mut bytes = [0u8; TOKEN_BYTES];
	OsRng.fill_bytes(&mut bytes);

	bytes
		.iter()
		.flat_map(|b| {
			let hi = ALPHABET[(*b as usize / ALPHABET.len()) % ALPHABET.len()];
			let lo = ALPHABET[*b as usize % ALPHABET.len()];
			[hi as char, lo as char]
		})
		.take(TOKEN_LEN)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::{generate, TOKEN_LEN};

	#[test]
	fn test_len() {
		assert_eq!(generate().len(), TOKEN_LEN);
	}

	#[test]
	fn test_charset() {
		let token = generate();

		assert!(token
			.chars()
			.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
	}

	#[test]
	fn test_no_trivial_repeats() {
		let a = generate();
		let b = generate();

		assert_ne!(a, b);
	}
}
