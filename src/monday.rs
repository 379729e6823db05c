use reqwest::header::AUTHORIZATION;
use serde_json::json;
use tracing::{info, warn};

use crate::order::Order;

// CRM side channel. The order has already reached the dispatcher by the time
// this runs, so failures are logged and swallowed, never surfaced.

const CREATE_ITEM: &str = r#"
mutation CreateItem($boardId: ID!, $itemName: String!, $columnVals: JSON!) {
	create_item(
		board_id: $boardId
		item_name: $itemName
		column_values: $columnVals
	) {
		id
	}
}"#;

#[derive(Debug)]
enum Error {
	Http(reqwest::Error),
	Status { status: u16, body: String },
	BadResponse,
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Http(e) => write!(f, "request failed: {}", e),
			Error::Status { status, body } => {
				write!(f, "request failed with status {}: {}", status, body)
			}
			Error::BadResponse => write!(f, "response carried no item id"),
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Error::Http(err)
	}
}

pub struct Monday {
	http: reqwest::Client,
	worker_url: String,
	board_id: String,
	api_key: String,
}

impl Monday {
	pub fn new(worker_url: &str, board_id: &str, api_key: &str) -> Self {
		Self {
			http: reqwest::Client::new(),
			worker_url: worker_url.trim_end_matches('/').to_string(),
			board_id: board_id.to_string(),
			api_key: api_key.to_string(),
		}
	}

	pub async fn create_item(&self, order: &Order) -> Option<String> {
		match self.try_create_item(order).await {
			Ok(id) => {
				info!(item = %id, "crm item created");

				Some(id)
			}
			Err(e) => {
				warn!(error = %e, "crm item creation failed; continuing without it");

				None
			}
		}
	}

	async fn try_create_item(&self, order: &Order) -> Result<String, Error> {
		let phone: String = order.phone.split_whitespace().collect();
		let column_values = json!({
			"dup__of_name": order.address,
			"email0": order.email,
			"phone": { "phone": phone, "countryShortName": "GE" },
			"dropdown": order.area,
			"dup__of_language": order.tariff,
			"dup__of_tariff": order.payment.code(),
			"text9": order.comment.clone().unwrap_or_default(),
			"text3": order.quantity(),
			"text0": order.dates.join(", "),
		});
		let payload = json!({
			"query": CREATE_ITEM,
			"variables": {
				"boardId": self.board_id,
				"itemName": format!("Order from {}", order.email),
				"columnVals": column_values.to_string(),
			}
		});

		let response = self
			.http
			.post(format!("{}/item", self.worker_url))
			.header(AUTHORIZATION, self.api_key.as_str())
			.json(&payload)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(Error::Status {
				status: status.as_u16(),
				body: response.text().await.unwrap_or_default(),
			});
		}

		let body: serde_json::Value = response.json().await?;
		let id = &body["data"]["create_item"]["id"];

		match id {
			serde_json::Value::String(s) => Ok(s.clone()),
			serde_json::Value::Number(n) => Ok(n.to_string()),
			_ => Err(Error::BadResponse),
		}
	}
}
