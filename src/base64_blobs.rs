use base64::DecodeError;
use serde::de::Visitor;
use serde::de::Unexpected;
use serde::{Deserializer, Serializer};

struct Base64Visitor;

impl<'de> Visitor<'de> for Base64Visitor {
	type Value = Vec<u8>;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(formatter, "Expected base64 encoded string")
	}

	fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
	where
		E: serde::de::Error,
	{
		let decode_result = base64::decode(s);
		match decode_result {
			Ok(value) => Ok(value),
			Err(error) => match error {
				DecodeError::InvalidByte(_, _) => Err(E::invalid_value(Unexpected::Str(s), &self)),
				DecodeError::InvalidLastSymbol(_, _) => {
					Err(E::invalid_value(Unexpected::Str(s), &self))
				}
				DecodeError::InvalidLength => Err(E::invalid_length(s.len(), &self)),
			},
		}
	}
}

pub fn deserialize_vec_base64<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<Vec<u8>, D::Error> {
	deserializer.deserialize_str(Base64Visitor {})
}

pub fn serialize_vec_base64<S: Serializer>(
	blob: &Vec<u8>,
	serializer: S,
) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(base64::encode(blob.as_slice()).as_str())
}

pub fn deserialize_array_base64<'de, D, const N: usize>(
	deserializer: D,
) -> Result<[u8; N], D::Error>
where
	D: Deserializer<'de>,
{
	struct ArrayVisitor<const N: usize>;

	impl<'de, const N: usize> Visitor<'de> for ArrayVisitor<N> {
		type Value = [u8; N];

		fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
			formatter.write_str("a valid base64 string")
		}

		fn visit_str<E>(self, v: &str) -> Result<[u8; N], E>
		where
			E: serde::de::Error,
		{
			let decoded = base64::decode(v).map_err(E::custom)?;
			let mut array = [0u8; N];

			if decoded.len() != N {
				return Err(E::custom(format!("expected a byte array of length {}", N)));
			}

			array.copy_from_slice(&decoded);

			Ok(array)
		}
	}

	deserializer.deserialize_str(ArrayVisitor::<N>)
}

pub fn serialize_array_base64<S, const N: usize>(
	blob: &[u8; N],
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&base64::encode(blob))
}
