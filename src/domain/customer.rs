//! Customer records, their form and the list search

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::Entity;
use crate::core::validation::FormInput;
use crate::core::validation::filters;
use crate::domain::format::DisplayFormat;
use crate::domain::TransactionView;

/// A person tracked for KYC purposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,

    /// National ID number (NIK)
    pub nik: String,

    pub full_name: String,

    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_photo: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Customer {
    fn resource_name() -> &'static str {
        "customers"
    }

    fn resource_name_singular() -> &'static str {
        "customer"
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
            "nik" => Some(self.nik.clone()),
            "full_name" => Some(self.full_name.clone()),
            "address" => Some(self.address.clone()),
            "avatar_url" => self.avatar_url.clone(),
            "id_photo" => self.id_photo.clone(),
            _ => None,
        }
    }
}

/// Customer form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CustomerInput {
    #[serde(default)]
    #[validate(length(equal = 16, message = "NIK must be exactly 16 characters"))]
    pub nik: String,

    #[serde(default)]
    #[validate(length(min = 2, message = "full name must be at least 2 characters"))]
    pub full_name: String,

    #[serde(default)]
    #[validate(length(min = 10, message = "address must be at least 10 characters"))]
    pub address: String,

    #[serde(default)]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub join_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub id_photo: Option<String>,
}

impl FormInput for CustomerInput {
    fn normalize(mut self) -> Self {
        self.nik = filters::trim(self.nik);
        self.full_name = filters::trim(self.full_name);
        self.address = filters::trim(self.address);
        self.avatar_url = filters::trim_optional(self.avatar_url);
        self.id_photo = filters::trim_optional(self.id_photo);
        self
    }
}

impl Customer {
    /// Build a new record from a validated form; the join date defaults to now
    pub fn from_input(input: CustomerInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            nik: input.nik,
            full_name: input.full_name,
            address: input.address,
            avatar_url: input.avatar_url,
            join_date: Some(input.join_date.unwrap_or(now)),
            id_photo: input.id_photo,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the form fields
    ///
    /// Images and join date are only replaced when the form carries them,
    /// so an edit without a new upload keeps the stored one.
    pub fn apply(&mut self, input: CustomerInput) {
        self.nik = input.nik;
        self.full_name = input.full_name;
        self.address = input.address;
        if input.avatar_url.is_some() {
            self.avatar_url = input.avatar_url;
        }
        if input.id_photo.is_some() {
            self.id_photo = input.id_photo;
        }
        if input.join_date.is_some() {
            self.join_date = input.join_date;
        }
        self.updated_at = Utc::now();
    }

    /// Name contains `term` case-insensitively, or NIK contains it verbatim
    pub fn matches_search(&self, term: &str) -> bool {
        self.full_name
            .to_lowercase()
            .contains(&term.to_lowercase())
            || self.nik.contains(term)
    }

    #[cfg(test)]
    pub(crate) fn sample(nik: &str, full_name: &str) -> Self {
        Self::from_input(CustomerInput {
            nik: nik.to_string(),
            full_name: full_name.to_string(),
            address: "Jl. Merdeka No. 1, Bandung".to_string(),
            ..Default::default()
        })
    }
}

/// Apply the list search and sort by full name
pub fn filter_customers(customers: Vec<Customer>, term: Option<&str>) -> Vec<Customer> {
    let mut matched: Vec<Customer> = match term {
        Some(term) => customers
            .into_iter()
            .filter(|c| c.matches_search(term))
            .collect(),
        None => customers,
    };
    matched.sort_by_cached_key(|c| c.full_name.to_lowercase());
    matched
}

/// Customer detail page: the record plus its transactions, newest first
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub formatted_join_date: Option<String>,
    pub transactions: Vec<TransactionView>,
}

impl CustomerDetail {
    pub fn new(customer: Customer, transactions: Vec<TransactionView>, fmt: &DisplayFormat) -> Self {
        Self {
            formatted_join_date: customer.join_date.map(|d| fmt.date_long(d)),
            customer,
            transactions,
        }
    }
}
