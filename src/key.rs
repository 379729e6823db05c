// Accepts a type name, outputs a generic key type, eg PrivateKey<T, SIZE>, PublicKey<T, SIZE>, etc.
// Keys serialize as base64 strings (the at-rest encoding); hex is produced only at the network edge.
macro_rules! key {
	($type: ident) => {
		#[derive(Debug, PartialEq)]
		pub struct $type<T, const SIZE: usize> {
			bytes: [u8; SIZE],
			_marker: std::marker::PhantomData<T>,
		}

		impl<T, const SIZE: usize> $type<T, SIZE> {
			pub fn new(bytes: [u8; SIZE]) -> Self {
				Self {
					bytes,
					_marker: std::marker::PhantomData,
				}
			}

			pub fn as_bytes(&self) -> &[u8; SIZE] {
				&self.bytes
			}

			// wire encoding; never persisted
			pub fn to_hex(&self) -> String {
				hex::encode(self.bytes)
			}
		}

		impl<T, const SIZE: usize> From<&[u8; SIZE]> for $type<T, SIZE> {
			fn from(bytes: &[u8; SIZE]) -> Self {
				Self::new(bytes.clone())
			}
		}

		impl<T, const SIZE: usize> TryFrom<Vec<u8>> for $type<T, SIZE> {
			type Error = std::array::TryFromSliceError;

			fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
				let slice: [u8; SIZE] = value.as_slice().try_into()?;

				Ok(Self::new(slice))
			}
		}

		impl<T, const SIZE: usize> Clone for $type<T, SIZE> {
			fn clone(&self) -> Self {
				Self::new(self.bytes.clone())
			}
		}

		impl<T, const SIZE: usize> serde::Serialize for $type<T, SIZE> {
			fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				crate::base64_blobs::serialize_array_base64::<_, SIZE>(&self.bytes, serializer)
			}
		}

		impl<'de, T, const SIZE: usize> serde::Deserialize<'de> for $type<T, SIZE> {
			fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
			where
				D: serde::Deserializer<'de>,
			{
				crate::base64_blobs::deserialize_array_base64::<_, SIZE>(deserializer).map(Self::new)
			}
		}
	};
}

pub(crate) use key;

#[cfg(test)]
mod tests {
	use super::key;

	key!(Key);
	#[derive(Debug, PartialEq)]
	struct KeyType;
	type TestKey = Key<KeyType, 10>;

	#[test]
	fn test_as_bytes() {
		let key = TestKey::new(b"0123456789".to_owned());

		assert_eq!(key.as_bytes(), b"0123456789");
	}

	#[test]
	fn test_from_bytes() {
		let key: TestKey = b"0123456789".into();

		assert_eq!(key.as_bytes(), b"0123456789");
	}

	#[test]
	fn test_try_from_vec() {
		let k0 = TestKey::try_from(b"0123456789".to_vec());

		assert!(k0.is_ok());

		let k1 = TestKey::try_from(b"0123".to_vec());

		assert!(k1.is_err());
	}

	#[test]
	fn test_to_hex() {
		let key = TestKey::new([0u8, 1, 2, 3, 4, 5, 6, 7, 8, 255]);

		assert_eq!(key.to_hex(), "000102030405060708ff");
	}

	#[test]
	fn test_serializes_as_base64_string() {
		let key = Key::<KeyType, 3>::new([1, 2, 3]);
		let serialized = serde_json::to_string(&key).unwrap();

		assert_eq!(serialized, r#""AQID""#);
	}

	#[test]
	fn test_serialize_deserialize() {
		let key = TestKey::try_from(b"0123456789".to_vec()).unwrap();
		let serialized = serde_json::to_vec(&key).unwrap();
		let deserialized = serde_json::from_slice(&serialized).unwrap();

		assert_eq!(key, deserialized);
	}

	#[test]
	fn test_deserialize_wrong_len() {
		let deserialized: Result<TestKey, _> = serde_json::from_str(r#""AQID""#);

		assert!(deserialized.is_err());
	}
}
