use serde::{Deserialize, Serialize};
use serde_json::Value;

// Single-endpoint GraphQL plumbing: every mutation goes out as an HTTPS POST
// with a `{query, variables}` json body.

#[derive(Serialize, Debug)]
pub struct Request<'a> {
	pub query: &'a str,
	pub variables: Value,
}

// `errors` is kept as raw json so the server payload survives intact all the
// way up to whoever displays it.
#[derive(Deserialize, Debug)]
pub struct Response<T> {
	pub data: Option<T>,
	pub errors: Option<Vec<Value>>,
}

#[cfg(test)]
mod tests {
	use super::{Request, Response};
	use serde_json::json;

	#[test]
	fn test_request_body_shape() {
		let request = Request {
			query: "mutation SignUp { userSignUp }",
			variables: json!({ "name": "User" }),
		};
		let body = serde_json::to_value(&request).unwrap();

		assert_eq!(
			body,
			json!({
				"query": "mutation SignUp { userSignUp }",
				"variables": { "name": "User" }
			})
		);
	}

	#[test]
	fn test_response_with_data() {
		let raw = r#"{"data":{"value":42}}"#;
		let response: Response<serde_json::Value> = serde_json::from_str(raw).unwrap();

		assert_eq!(response.data.unwrap()["value"], 42);
		assert!(response.errors.is_none());
	}

	#[test]
	fn test_response_with_errors() {
		let raw = r#"{"data":null,"errors":[{"message":"no such user"}]}"#;
		let response: Response<serde_json::Value> = serde_json::from_str(raw).unwrap();

		assert!(response.data.is_none());

		let errors = response.errors.unwrap();

		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0]["message"], "no such user");
	}
}
