//! The order record and its monetary amount

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{FieldValidationError, ValidationError};

/// Maximum length (in code points) of `customerName` and `product`
pub const TEXT_MAX_CHARS: usize = 200;

/// A persisted order.
///
/// `id` and `created_at` are assigned by the record store on creation and
/// never change afterwards. Orders have no update operation; the only
/// transition after creation is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Store-assigned identifier, never reused after deletion
    #[serde(rename = "orderId")]
    pub id: Uuid,

    pub customer_name: String,

    pub product: String,

    pub amount: Amount,

    /// Store-assigned creation time (UTC)
    pub created_at: DateTime<Utc>,
}

/// An order that has not been persisted yet (no id, no creation time)
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub product: String,
    pub amount: Amount,
}

impl NewOrder {
    pub fn new(customer_name: impl Into<String>, product: impl Into<String>, amount: Amount) -> Self {
        Self {
            customer_name: customer_name.into(),
            product: product.into(),
            amount,
        }
    }

    /// Attach store-assigned fields, producing the persisted record
    pub fn into_order(self, id: Uuid, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            customer_name: self.customer_name,
            product: self.product,
            amount: self.amount,
            created_at,
        }
    }
}

/// Create payload accepted at the HTTP boundary.
///
/// The `Validate` rules run on the amount exactly as sent; rounding to cents
/// happens afterwards in [`CreateOrderRequest::into_new_order`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(
        length(
            min = 2,
            max = 200,
            message = "Customer name must be between 2 and 200 characters"
        ),
        custom(function = "not_blank", message = "Customer name is required")
    )]
    pub customer_name: String,

    #[validate(
        length(min = 2, max = 200, message = "Product must be between 2 and 200 characters"),
        custom(function = "not_blank", message = "Product is required")
    )]
    pub product: String,

    #[validate(custom(function = "amount_in_range"))]
    pub amount: DecimalAmount,
}

impl CreateOrderRequest {
    /// Round the amount to cents and drop the boundary wrapper
    pub fn into_new_order(self) -> Result<NewOrder, ValidationError> {
        let amount = self.amount.rounded().ok_or_else(|| {
            ValidationError::FieldErrors(vec![FieldValidationError {
                field: "amount".to_string(),
                message: amount_too_large().to_string(),
            }])
        })?;
        Ok(NewOrder::new(self.customer_name, self.product, amount))
    }
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

fn amount_in_range(amount: &DecimalAmount) -> Result<(), validator::ValidationError> {
    if !amount.meets_minimum() {
        return Err(amount_error("min_amount", "Amount must be at least 0.01".to_string()));
    }
    if amount.rounded().is_none() {
        return Err(amount_error("max_amount", amount_too_large()));
    }
    Ok(())
}

fn amount_too_large() -> String {
    format!("Amount must not exceed {}", Amount::MAX)
}

fn amount_error(code: &'static str, message: String) -> validator::ValidationError {
    let mut error = validator::ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// A decimal amount with fixed two-digit precision, held as integer cents.
///
/// On the wire it is a plain JSON number (`12.5`, `0.01`); a numeric string
/// (`"12.50"`) is accepted on input as well. Parsing works on decimal digits,
/// and values with more than two decimals are rounded half away from zero,
/// the way a `DECIMAL(18, 2)` column stores them.
///
/// The magnitude is capped at [`Amount::MAX`]: up to that bound every cent
/// value survives the trip through a JSON number unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Smallest amount an order may carry (0.01)
    pub const MIN: Amount = Amount(1);

    /// Largest amount an order may carry (9 999 999 999 999.99)
    pub const MAX: Amount = Amount(999_999_999_999_999);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Whether the magnitude fits within [`Amount::MAX`]
    pub fn is_representable(self) -> bool {
        self.0.unsigned_abs() <= Self::MAX.0.unsigned_abs()
    }

    /// Round a decimal value to two digits.
    ///
    /// The float is read through its shortest decimal representation, so
    /// `1.005` rounds to `1.01`. Returns `None` for non-finite values and
    /// values beyond [`Amount::MAX`].
    pub fn from_decimal(value: f64) -> Option<Self> {
        DecimalAmount::from_f64(value)?.rounded()
    }

    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<DecimalAmount>()?
            .rounded()
            .ok_or_else(|| format!("'{}' is out of range", s))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_representable() {
            return Err(serde::ser::Error::custom(format!(
                "amount {} exceeds {}",
                self,
                Amount::MAX
            )));
        }
        // Within MAX the value has at most 15 significant digits, so the
        // shortest float repr is the two-digit decimal itself
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let decimal = DecimalAmount::deserialize(deserializer)?;
        decimal
            .rounded()
            .ok_or_else(|| serde::de::Error::custom(format!("amount exceeds {}", Amount::MAX)))
    }
}

/// A decimal amount as written by a client, before rounding to cents.
///
/// Keeps enough of the original digits to compare against the 0.01 minimum
/// exactly and to round half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecimalAmount {
    negative: bool,
    /// Magnitude in cents with further decimals cut off
    truncated_cents: u64,
    /// Whether the first cut-off digit is 5 or more
    round_up: bool,
}

impl DecimalAmount {
    fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // `Display` for f64 is the shortest round-tripping decimal, never
        // in exponent form
        value.to_string().parse().ok()
    }

    /// Whether the exact value is at least [`Amount::MIN`]
    pub fn meets_minimum(&self) -> bool {
        !self.negative && self.truncated_cents >= Amount::MIN.0.unsigned_abs()
    }

    /// Round half away from zero; `None` beyond [`Amount::MAX`]
    pub fn rounded(&self) -> Option<Amount> {
        let magnitude = self.truncated_cents.checked_add(u64::from(self.round_up))?;
        let magnitude = i64::try_from(magnitude).ok()?;
        let amount = Amount(if self.negative { -magnitude } else { magnitude });
        amount.is_representable().then_some(amount)
    }
}

impl FromStr for DecimalAmount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(format!("'{}' is not a decimal number", s));
        }

        let mut cut = fraction.bytes();
        let tenths = cut.next().unwrap_or(b'0');
        let hundredths = cut.next().unwrap_or(b'0');
        let round_up = cut.next().is_some_and(|d| d >= b'5');

        let truncated_cents = whole
            .bytes()
            .chain([tenths, hundredths])
            .try_fold(0u64, |acc, d| acc.checked_mul(10)?.checked_add(u64::from(d - b'0')))
            .ok_or_else(|| format!("'{}' is out of range", s))?;

        Ok(Self {
            negative,
            truncated_cents,
            round_up,
        })
    }
}

impl<'de> Deserialize<'de> for DecimalAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => DecimalAmount::from_f64(value).ok_or_else(|| {
                serde::de::Error::custom(format!("amount {} is out of range", value))
            }),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}
