//! Transaction records and their form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::Entity;
use crate::core::error::ValidationError;
use crate::core::validation::FormInput;
use crate::core::validation::filters::{self, not_blank};
use crate::domain::format::{DisplayFormat, format_currency};
use crate::domain::Customer;

/// Name shown for transactions whose customer no longer exists
pub const UNKNOWN_CUSTOMER: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Transfer => "Transfer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Idr,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    /// Symbol used by the id-ID locale
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Idr => "Rp",
            Currency::Usd => "US$",
            Currency::Eur => "€",
        }
    }
}

/// One financial movement attributed to a customer
///
/// `customer_id` is a plain reference: nothing checks that the customer
/// exists, and deleting a customer leaves its transactions in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub currency: Currency,
    pub source: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Transaction {
    fn resource_name() -> &'static str {
        "transactions"
    }

    fn resource_name_singular() -> &'static str {
        "transaction"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn field_as_string(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "customer_id" => Some(self.customer_id.to_string()),
            "type" => Some(self.kind.as_str().to_string()),
            "currency" => Some(self.currency.code().to_string()),
            "source" => Some(self.source.clone()),
            "destination" => Some(self.destination.clone()),
            _ => None,
        }
    }
}

/// Transaction form
///
/// Enum and reference fields are optional at the serde level so that a
/// missing value is reported as a field error rather than a parse error.
/// Validation rules them out before [`Transaction::from_input`] runs.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TransactionInput {
    #[validate(required(message = "customer is required"))]
    pub customer_id: Option<Uuid>,

    #[serde(rename = "type")]
    #[validate(required(message = "type is required"))]
    pub kind: Option<TransactionType>,

    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than 0"))]
    pub amount: f64,

    #[validate(required(message = "currency is required"))]
    pub currency: Option<Currency>,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub source: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub destination: String,

    /// Server time is used when absent
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl FormInput for TransactionInput {
    fn normalize(mut self) -> Self {
        self.source = filters::trim(self.source);
        self.destination = filters::trim(self.destination);
        self
    }

    fn wire_field(field: &str) -> &str {
        match field {
            "kind" => "type",
            other => other,
        }
    }
}

/// Fields of a validated form
struct Fields {
    customer_id: Uuid,
    kind: TransactionType,
    currency: Currency,
}

impl TransactionInput {
    fn fields(&self) -> Result<Fields, ValidationError> {
        Ok(Fields {
            customer_id: self
                .customer_id
                .ok_or_else(|| ValidationError::field("customer_id", "customer is required"))?,
            kind: self
                .kind
                .ok_or_else(|| ValidationError::field("type", "type is required"))?,
            currency: self
                .currency
                .ok_or_else(|| ValidationError::field("currency", "currency is required"))?,
        })
    }
}

impl Transaction {
    /// Build a new record from a validated form
    pub fn from_input(input: TransactionInput) -> Result<Self, ValidationError> {
        let fields = input.fields()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            customer_id: fields.customer_id,
            timestamp: input.timestamp.unwrap_or(now),
            kind: fields.kind,
            amount: input.amount,
            currency: fields.currency,
            source: input.source,
            destination: input.destination,
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite the form fields, keeping id, creation time and (unless the
    /// form supplies one) the original timestamp
    pub fn apply(&mut self, input: TransactionInput) -> Result<(), ValidationError> {
        let fields = input.fields()?;
        self.customer_id = fields.customer_id;
        self.kind = fields.kind;
        self.currency = fields.currency;
        self.amount = input.amount;
        self.source = input.source;
        self.destination = input.destination;
        if let Some(timestamp) = input.timestamp {
            self.timestamp = timestamp;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// A transaction joined with its customer's name and display strings
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub customer_name: String,
    pub formatted_date: String,
    pub formatted_amount: String,
}

impl TransactionView {
    pub fn new(transaction: Transaction, customer_name: String, fmt: &DisplayFormat) -> Self {
        Self {
            formatted_date: fmt.date_time(transaction.timestamp),
            formatted_amount: format_currency(transaction.amount, transaction.currency),
            customer_name,
            transaction,
        }
    }
}

/// Sort transactions newest first
pub fn newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Join each transaction with its customer's full name
///
/// Linear scan over the already fetched customers; a missing customer
/// shows as [`UNKNOWN_CUSTOMER`].
pub fn join_customers(
    transactions: Vec<Transaction>,
    customers: &[Customer],
    fmt: &DisplayFormat,
) -> Vec<TransactionView> {
    transactions
        .into_iter()
        .map(|tx| {
            let name = customers
                .iter()
                .find(|c| c.id == tx.customer_id)
                .map(|c| c.full_name.clone())
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
            TransactionView::new(tx, name, fmt)
        })
        .collect()
}
