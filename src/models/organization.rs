//! Organization model

use serde::{Deserialize, Serialize};

use crate::utils::validation::{FieldSpec, Schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
}

impl Organization {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::identity("id"),
        FieldSpec::text("name", true, 120),
    ];
}

/// Body of an organization create; any client supplied `id` is ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl Schema for CreateOrganizationRequest {
    const FIELDS: &'static [FieldSpec] = Organization::FIELDS;

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            _ => None,
        }
    }
}
