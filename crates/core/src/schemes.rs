//! Government scheme catalogue: loading, filtering and pagination.
//!
//! The catalogue is a JSON array read once at startup. Only the fields used
//! for filtering are typed; everything else in a record is carried through
//! to clients unchanged.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::CoreError;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Filter value that disables the `state`, `scheme_type` and `crop_type` filters.
const MATCH_ALL: &str = "all";

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scheme_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_types: Option<Vec<String>>,
    /// Benefits, eligibility, website and any other catalogue fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query string accepted by the scheme listing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SchemeQuery {
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    /// Case-insensitive substring of the coverage.
    pub state: Option<String>,
    pub scheme_type: Option<String>,
    pub crop_type: Option<String>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

/// One page of filtered schemes. `total` counts matches before pagination.
#[derive(Debug, Clone, Serialize)]
pub struct SchemePage {
    pub total: usize,
    pub schemes: Vec<Scheme>,
    pub limit: i64,
    pub offset: i64,
}

/// Immutable, in-memory scheme catalogue.
#[derive(Debug, Clone, Default)]
pub struct SchemeCatalogue {
    schemes: Vec<Scheme>,
}

impl SchemeCatalogue {
    pub fn new(schemes: Vec<Scheme>) -> Self {
        Self { schemes }
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let schemes: Vec<Scheme> = serde_json::from_str(json)
            .map_err(|e| CoreError::Internal(format!("Invalid scheme catalogue: {e}")))?;
        Ok(Self::new(schemes))
    }

    /// Read and parse the catalogue file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!(
                "Failed to read scheme catalogue {}: {e}",
                path.display()
            ))
        })?;
        let catalogue = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            count = catalogue.len(),
            "Loaded scheme catalogue"
        );
        Ok(catalogue)
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }

    /// Apply the query's filters, then its `limit`/`offset` window.
    pub fn search(&self, query: &SchemeQuery) -> Result<SchemePage, CoreError> {
        query.validate()?;
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        let offset = query.offset.unwrap_or(0);

        let search = active_filter(query.search.as_deref(), false);
        let state = active_filter(query.state.as_deref(), true);
        let scheme_type = active_filter(query.scheme_type.as_deref(), true);
        let crop_type = active_filter(query.crop_type.as_deref(), true);

        let matches: Vec<&Scheme> = self
            .schemes
            .iter()
            .filter(|s| {
                search.as_deref().is_none_or(|q| {
                    s.name.to_lowercase().contains(q)
                        || lower(&s.description).is_some_and(|d| d.contains(q))
                })
            })
            .filter(|s| {
                state
                    .as_deref()
                    .is_none_or(|q| lower(&s.coverage).is_some_and(|c| c.contains(q)))
            })
            .filter(|s| {
                scheme_type
                    .as_deref()
                    .is_none_or(|q| lower(&s.scheme_type).is_some_and(|t| t == q))
            })
            .filter(|s| {
                crop_type.as_deref().is_none_or(|q| {
                    s.crop_types
                        .iter()
                        .flatten()
                        .any(|c| c.to_lowercase() == q)
                })
            })
            .collect();

        let total = matches.len();
        let schemes = matches
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(SchemePage {
            total,
            schemes,
            limit,
            offset,
        })
    }

    pub fn find(&self, id: &str) -> Result<&Scheme, CoreError> {
        self.schemes
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Scheme",
                id: id.to_string(),
            })
    }
}

/// Lowercased filter value, or `None` when the filter is off.
fn active_filter(value: Option<&str>, honours_all: bool) -> Option<String> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    if honours_all && value.eq_ignore_ascii_case(MATCH_ALL) {
        return None;
    }
    Some(value.to_lowercase())
}

fn lower(field: &Option<String>) -> Option<String> {
    field.as_deref().map(str::to_lowercase)
}
