use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid currency code: {0}")]
  InvalidCurrency(String),
  #[error("Currency mismatch: expected {expected}, got {actual}")]
  CurrencyMismatch { expected: String, actual: String },
  #[error("Invalid product id: {0}")]
  InvalidProductId(String),
  #[error("Invalid product name: {0}")]
  InvalidProductName(String),
  #[error("Invalid price: {0}")]
  InvalidPrice(String),
  #[error("Invalid stock: {0}")]
  InvalidStock(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid stock movement type: {0}")]
  InvalidMovementType(String),
}

// Currency - trimmed, uppercase code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
  pub const DEFAULT_CODE: &'static str = "MXN";

  pub fn new(code: &str) -> Result<Self, ValueObjectError> {
    let normalized = code.trim().to_uppercase();
    if normalized.is_empty() {
      return Err(ValueObjectError::InvalidCurrency(
        "Currency cannot be empty".to_string(),
      ));
    }
    Ok(Self(normalized))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Default for Currency {
  fn default() -> Self {
    Self(Self::DEFAULT_CODE.to_string())
  }
}

impl TryFrom<String> for Currency {
  type Error = ValueObjectError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Currency::new(&value)
  }
}

impl From<Currency> for String {
  fn from(currency: Currency) -> Self {
    currency.0
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Non-negative amount of a single currency.
///
/// Every operation returns a new value; arithmetic across currencies and
/// arithmetic that would go below zero is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MoneyRecord", into = "MoneyRecord")]
pub struct Money {
  amount: Decimal,
  currency: Currency,
}

#[derive(Serialize, Deserialize)]
struct MoneyRecord {
  amount: Decimal,
  currency: String,
}

impl Money {
  pub fn new(amount: Decimal, currency: &str) -> Result<Self, ValueObjectError> {
    Self::of(amount, Currency::new(currency)?)
  }

  pub fn of(amount: Decimal, currency: Currency) -> Result<Self, ValueObjectError> {
    if amount < Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(format!(
        "Amount cannot be negative: {}",
        amount
      )));
    }
    Ok(Self { amount, currency })
  }

  /// For amounts already known to be non-negative.
  pub(crate) fn non_negative(amount: Decimal, currency: Currency) -> Self {
    debug_assert!(amount >= Decimal::ZERO);
    Self { amount, currency }
  }

  pub fn zero(currency: Currency) -> Self {
    Self {
      amount: Decimal::ZERO,
      currency,
    }
  }

  pub fn amount(&self) -> Decimal {
    self.amount
  }

  pub fn currency(&self) -> &Currency {
    &self.currency
  }

  pub fn is_zero(&self) -> bool {
    self.amount.is_zero()
  }

  pub fn add(&self, other: &Money) -> Result<Money, ValueObjectError> {
    self.ensure_same_currency(other)?;
    let amount = self.amount.checked_add(other.amount).ok_or_else(overflow)?;
    Money::of(amount, self.currency.clone())
  }

  pub fn subtract(&self, other: &Money) -> Result<Money, ValueObjectError> {
    self.ensure_same_currency(other)?;
    let amount = self.amount.checked_sub(other.amount).ok_or_else(overflow)?;
    Money::of(amount, self.currency.clone())
  }

  pub fn multiply(&self, factor: Decimal) -> Result<Money, ValueObjectError> {
    if factor < Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(format!(
        "Factor cannot be negative: {}",
        factor
      )));
    }
    let amount = self.amount.checked_mul(factor).ok_or_else(overflow)?;
    Money::of(amount, self.currency.clone())
  }

  /// Multiplies by a unit count.
  pub fn times(&self, quantity: u32) -> Result<Money, ValueObjectError> {
    let amount = self
      .amount
      .checked_mul(Decimal::from(quantity))
      .ok_or_else(overflow)?;
    Ok(Money::non_negative(amount, self.currency.clone()))
  }

  /// Sum of `amounts`, all in `currency`.
  pub(crate) fn sum<'a, I>(currency: Currency, amounts: I) -> Result<Money, ValueObjectError>
  where
    I: IntoIterator<Item = &'a Money>,
  {
    amounts
      .into_iter()
      .try_fold(Money::zero(currency), |total, money| total.add(money))
  }

  pub fn is_greater_than(&self, other: &Money) -> Result<bool, ValueObjectError> {
    self.ensure_same_currency(other)?;
    Ok(self.amount > other.amount)
  }

  pub fn is_less_than(&self, other: &Money) -> Result<bool, ValueObjectError> {
    self.ensure_same_currency(other)?;
    Ok(self.amount < other.amount)
  }

  fn ensure_same_currency(&self, other: &Money) -> Result<(), ValueObjectError> {
    if self.currency != other.currency {
      return Err(ValueObjectError::CurrencyMismatch {
        expected: self.currency.to_string(),
        actual: other.currency.to_string(),
      });
    }
    Ok(())
  }
}

fn overflow() -> ValueObjectError {
  ValueObjectError::InvalidAmount("Amount is too large".to_string())
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {:.2}", self.currency, self.amount)
  }
}

impl TryFrom<MoneyRecord> for Money {
  type Error = ValueObjectError;

  fn try_from(record: MoneyRecord) -> Result<Self, Self::Error> {
    Money::new(record.amount, &record.currency)
  }
}

impl From<Money> for MoneyRecord {
  fn from(money: Money) -> Self {
    MoneyRecord {
      amount: money.amount,
      currency: money.currency.into(),
    }
  }
}

// Product Id - caller supplied
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
  pub fn new(value: &str) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidProductId(
        "Product id cannot be empty".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Product Name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductName(String);

impl ProductName {
  pub const MIN_LENGTH: usize = 3;

  pub fn new(value: &str) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.chars().count() < Self::MIN_LENGTH {
      return Err(ValueObjectError::InvalidProductName(format!(
        "Product name must be at least {} characters",
        Self::MIN_LENGTH
      )));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ProductName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Stock Movement Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockMovementType {
  In,
  Out,
  Adjustment,
}

impl StockMovementType {
  pub fn as_str(&self) -> &'static str {
    match self {
      StockMovementType::In => "IN",
      StockMovementType::Out => "OUT",
      StockMovementType::Adjustment => "ADJUSTMENT",
    }
  }
}

impl FromStr for StockMovementType {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "IN" => Ok(StockMovementType::In),
      "OUT" => Ok(StockMovementType::Out),
      "ADJUSTMENT" => Ok(StockMovementType::Adjustment),
      _ => Err(ValueObjectError::InvalidMovementType(format!(
        "Unknown movement type: {}",
        s
      ))),
    }
  }
}

impl fmt::Display for StockMovementType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Trims an optional text field, treating blank input as absent.
pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
  value
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string)
}
