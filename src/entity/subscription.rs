// src/entity/subscription.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_date, decode_enum, decode_timestamp, require_id};
use crate::error::Result;
use crate::pipeline::{FieldValue, Listable};
use crate::storage::service::{integer_column, text_column, Row, RowValue};
use crate::warnings::LoadWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Expired,
    Cancelled,
    Unknown,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Expired => write!(f, "expired"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
            SubscriptionStatus::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "expired" => Ok(SubscriptionStatus::Expired),
            "cancelled" | "canceled" => Ok(SubscriptionStatus::Cancelled),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub service: String,
    pub vendor: String,
    pub status: SubscriptionStatus,
    pub cost_cents: i64,
    pub expiry_date: Option<NaiveDate>,
    pub account_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(service: String, vendor: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            service,
            vendor,
            status: SubscriptionStatus::default(),
            cost_cents: 0,
            expiry_date: None,
            account_email: None,
            created_at: Utc::now(),
        }
    }

    pub fn from_row(row: &Row, warnings: &mut Vec<LoadWarning>) -> Result<Self> {
        Ok(Self {
            id: require_id(row, "subscriptions")?,
            service: text_column(row, "service").unwrap_or_default(),
            vendor: text_column(row, "vendor").unwrap_or_default(),
            status: decode_enum(
                text_column(row, "status"),
                "subscriptions",
                "status",
                SubscriptionStatus::Unknown,
                warnings,
            ),
            cost_cents: integer_column(row, "cost_cents").unwrap_or(0),
            expiry_date: decode_date(
                text_column(row, "expiry_date"),
                "subscriptions",
                "expiry_date",
                warnings,
            ),
            account_email: text_column(row, "account_email"),
            created_at: decode_timestamp(
                text_column(row, "created_at"),
                "subscriptions",
                "created_at",
                warnings,
            ),
        })
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), self.id.to_string().into());
        row.insert("service".into(), self.service.as_str().into());
        row.insert("vendor".into(), self.vendor.as_str().into());
        row.insert("status".into(), self.status.to_string().into());
        row.insert("cost_cents".into(), self.cost_cents.into());
        row.insert(
            "expiry_date".into(),
            RowValue::from(self.expiry_date.map(|d| d.format("%Y-%m-%d").to_string())),
        );
        row.insert(
            "account_email".into(),
            RowValue::from(self.account_email.clone()),
        );
        row.insert("created_at".into(), self.created_at.to_rfc3339().into());
        row
    }
}

impl Listable for Subscription {
    const SEARCH_FIELDS: &'static [&'static str] = &["service", "vendor", "account_email"];

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "id" => FieldValue::Text(self.id.to_string()),
            "service" => FieldValue::Text(self.service.clone()),
            "vendor" => FieldValue::Text(self.vendor.clone()),
            "status" => FieldValue::Text(self.status.to_string()),
            "cost" | "cost_cents" => FieldValue::Number(self.cost_cents),
            "expiry_date" => FieldValue::from_opt_date(self.expiry_date),
            "account_email" => FieldValue::from_opt_text(self.account_email.as_deref()),
            "created_at" => FieldValue::Date(self.created_at),
            _ => FieldValue::Missing,
        }
    }

    fn reference_date(&self) -> Option<NaiveDate> {
        self.expiry_date
    }

    fn is_terminal(&self) -> bool {
        self.status == SubscriptionStatus::Cancelled
    }
}
