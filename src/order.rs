use serde::{Deserialize, Serialize};

// Typed order payload filled in by the presentation layer. Validation happens
// here at the boundary; the network path only ever sees a valid order.

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum PaymentMethod {
	#[serde(rename = "1")]
	Cash,
	#[serde(rename = "2")]
	Transfer,
	#[serde(rename = "3")]
	Invoice,
}

impl PaymentMethod {
	pub fn label(&self) -> &'static str {
		match self {
			PaymentMethod::Cash => "Cash",
			PaymentMethod::Transfer => "Transfer to account",
			PaymentMethod::Invoice => "Invoice",
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			PaymentMethod::Cash => "1",
			PaymentMethod::Transfer => "2",
			PaymentMethod::Invoice => "3",
		}
	}
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Order {
	#[serde(default)]
	pub name: Option<String>,
	pub area: String,
	pub address: String,
	pub email: String,
	pub phone: String,
	#[serde(default)]
	pub quantity: Option<String>,
	pub tariff: String,
	pub payment: PaymentMethod,
	#[serde(default)]
	pub comment: Option<String>,
	#[serde(default)]
	pub dates: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum Error {
	MissingField(&'static str),
	NoDates,
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::MissingField(field) => write!(f, "required field missing: {}", field),
			Error::NoDates => write!(f, "no schedule slot selected"),
		}
	}
}

impl std::error::Error for Error {}

impl Order {
	pub fn validate(&self) -> Result<(), Error> {
		let required = [
			("area", &self.area),
			("address", &self.address),
			("email", &self.email),
			("phone", &self.phone),
			("tariff", &self.tariff),
		];

		for (name, value) in required {
			if value.trim().is_empty() {
				return Err(Error::MissingField(name));
			}
		}

		if self.dates.is_empty() {
			return Err(Error::NoDates);
		}

		Ok(())
	}

	pub fn quantity(&self) -> &str {
		self.quantity
			.as_deref()
			.filter(|q| !q.trim().is_empty())
			.unwrap_or("1")
	}

	pub fn registrant_name(&self) -> &str {
		self.name
			.as_deref()
			.filter(|n| !n.trim().is_empty())
			.unwrap_or("User")
	}

	// Field order is fixed; an empty comment drops its line entirely.
	pub fn summary(&self) -> String {
		let mut lines = vec![
			format!("Date: {}", self.dates.join(", ")),
			format!("Area: {}", self.area),
			format!("Address: {}", self.address),
			format!("Email: {}", self.email),
			format!("Phone: {}", self.phone),
			format!("Quantity: {}", self.quantity()),
			format!("Tariff: {}", self.tariff),
			format!("Payment: {}", self.payment.label()),
		];

		if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
			lines.push(format!("Comment: {}", comment));
		}

		lines.join("\n\n")
	}
}

#[cfg(test)]
mod tests {
	use super::{Error, Order, PaymentMethod};

	fn order() -> Order {
		Order {
			name: None,
			area: "Vake".to_string(),
			address: "1 Rustaveli".to_string(),
			email: "a@b.com".to_string(),
			phone: "+995500000000".to_string(),
			quantity: Some("2".to_string()),
			tariff: "Standard".to_string(),
			payment: PaymentMethod::Cash,
			comment: Some("".to_string()),
			dates: vec!["Monday 9:00-11:00".to_string()],
		}
	}

	#[test]
	fn test_summary_fixed_order_empty_comment_omitted() {
		assert_eq!(
			order().summary(),
			"Date: Monday 9:00-11:00\n\n\
			 Area: Vake\n\n\
			 Address: 1 Rustaveli\n\n\
			 Email: a@b.com\n\n\
			 Phone: +995500000000\n\n\
			 Quantity: 2\n\n\
			 Tariff: Standard\n\n\
			 Payment: Cash"
		);
	}

	#[test]
	fn test_summary_with_comment() {
		let mut order = order();
		order.comment = Some("call on arrival".to_string());

		assert!(order
			.summary()
			.ends_with("Payment: Cash\n\nComment: call on arrival"));
	}

	#[test]
	fn test_summary_multiple_dates() {
		let mut order = order();
		order.dates.push("Tuesday 14:00-16:00".to_string());

		assert!(order
			.summary()
			.starts_with("Date: Monday 9:00-11:00, Tuesday 14:00-16:00\n\n"));
	}

	#[test]
	fn test_quantity_defaults_to_one() {
		let mut order = order();
		order.quantity = None;

		assert_eq!(order.quantity(), "1");

		order.quantity = Some(" ".to_string());

		assert_eq!(order.quantity(), "1");
	}

	#[test]
	fn test_registrant_name_default() {
		let mut order = order();

		assert_eq!(order.registrant_name(), "User");

		order.name = Some("Nino".to_string());

		assert_eq!(order.registrant_name(), "Nino");
	}

	#[test]
	fn test_validate_ok() {
		assert_eq!(order().validate(), Ok(()));
	}

	#[test]
	fn test_validate_missing_fields() {
		let mut missing_area = order();
		missing_area.area = "  ".to_string();

		assert_eq!(missing_area.validate(), Err(Error::MissingField("area")));

		let mut missing_phone = order();
		missing_phone.phone = String::new();

		assert_eq!(missing_phone.validate(), Err(Error::MissingField("phone")));
	}

	#[test]
	fn test_validate_no_dates() {
		let mut order = order();
		order.dates.clear();

		assert_eq!(order.validate(), Err(Error::NoDates));
	}

	#[test]
	fn test_payment_codes() {
		assert_eq!(PaymentMethod::Cash.code(), "1");
		assert_eq!(PaymentMethod::Transfer.label(), "Transfer to account");

		let parsed: PaymentMethod = serde_json::from_str(r#""3""#).unwrap();

		assert_eq!(parsed, PaymentMethod::Invoice);
	}
}
