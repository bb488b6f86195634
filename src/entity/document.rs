// src/entity/document.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{decode_enum, decode_timestamp, require_id};
use crate::error::Result;
use crate::pipeline::{FieldValue, Listable};
use crate::storage::service::{text_column, Row, RowValue};
use crate::warnings::LoadWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Contract,
    Invoice,
    Report,
    Policy,
    #[default]
    Other,
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentCategory::Contract => write!(f, "contract"),
            DocumentCategory::Invoice => write!(f, "invoice"),
            DocumentCategory::Report => write!(f, "report"),
            DocumentCategory::Policy => write!(f, "policy"),
            DocumentCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for DocumentCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contract" => Ok(DocumentCategory::Contract),
            "invoice" => Ok(DocumentCategory::Invoice),
            "report" => Ok(DocumentCategory::Report),
            "policy" => Ok(DocumentCategory::Policy),
            "other" => Ok(DocumentCategory::Other),
            _ => Err(format!("Invalid document category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: DocumentCategory,
    /// URL returned by object storage for the attached file, if any.
    pub file_url: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Resolved uploader display name; None when the lookup degraded.
    #[serde(default)]
    pub uploaded_by_name: Option<String>,
    /// Display names of employees the document is shared with, from the
    /// document_shares join table.
    #[serde(default)]
    pub shared_with: Vec<String>,
}

impl Document {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            category: DocumentCategory::default(),
            file_url: None,
            uploaded_by: None,
            created_at: Utc::now(),
            uploaded_by_name: None,
            shared_with: Vec::new(),
        }
    }

    pub fn from_row(row: &Row, warnings: &mut Vec<LoadWarning>) -> Result<Self> {
        let uploaded_by = text_column(row, "uploaded_by").and_then(|s| s.parse().ok());
        Ok(Self {
            id: require_id(row, "documents")?,
            title: text_column(row, "title").unwrap_or_default(),
            description: text_column(row, "description"),
            category: decode_enum(
                text_column(row, "category"),
                "documents",
                "category",
                DocumentCategory::Other,
                warnings,
            ),
            file_url: text_column(row, "file_url"),
            uploaded_by,
            created_at: decode_timestamp(
                text_column(row, "created_at"),
                "documents",
                "created_at",
                warnings,
            ),
            uploaded_by_name: None,
            shared_with: Vec::new(),
        })
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert("id".into(), self.id.to_string().into());
        row.insert("title".into(), self.title.as_str().into());
        row.insert("description".into(), RowValue::from(self.description.clone()));
        row.insert("category".into(), self.category.to_string().into());
        row.insert("file_url".into(), RowValue::from(self.file_url.clone()));
        row.insert(
            "uploaded_by".into(),
            RowValue::from(self.uploaded_by.map(|id| id.to_string())),
        );
        row.insert("created_at".into(), self.created_at.to_rfc3339().into());
        row
    }
}

impl Listable for Document {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "description"];

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "id" => FieldValue::Text(self.id.to_string()),
            "title" => FieldValue::Text(self.title.clone()),
            "description" => FieldValue::from_opt_text(self.description.as_deref()),
            "category" => FieldValue::Text(self.category.to_string()),
            "created_at" => FieldValue::Date(self.created_at),
            "uploaded_by" => match &self.uploaded_by_name {
                Some(name) => FieldValue::Name(name.clone()),
                None => FieldValue::Missing,
            },
            _ => FieldValue::Missing,
        }
    }

    fn reference_date(&self) -> Option<NaiveDate> {
        Some(self.created_at.date_naive())
    }

    fn is_terminal(&self) -> bool {
        false
    }
}
