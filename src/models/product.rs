//! Product model
//!
//! A `Product` is always a complete aggregate: its organization and category
//! are owned values, loaded in the same query as the product itself.

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use super::{Category, CreateCategoryRequest, CreateOrganizationRequest, Organization};
use crate::utils::validation::{self, FieldSpec, Schema};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub organization: Organization,
    pub category: Category,
}

impl Product {
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::identity("id"),
        FieldSpec::text("name", true, 120),
        FieldSpec::nested("organization"),
        FieldSpec::nested("category"),
    ];
}

/// Embedded organization in a product create, either a reference or new data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Embedded category in a product create, either a reference or new data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl Schema for CreateProductRequest {
    const FIELDS: &'static [FieldSpec] = Product::FIELDS;

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            _ => None,
        }
    }
}

/// How a product create resolves one of its associations
#[derive(Debug, Clone, PartialEq)]
pub enum Association<T> {
    /// Look up an existing row by id
    Existing(i64),
    /// Insert a new row from the embedded data
    New(T),
}

/// A validated product create, ready for the store
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub organization: Association<CreateOrganizationRequest>,
    pub category: Association<CreateCategoryRequest>,
}

impl From<OrganizationRef> for Association<CreateOrganizationRequest> {
    fn from(r: OrganizationRef) -> Self {
        match r.id {
            Some(id) => Association::Existing(id),
            None => Association::New(CreateOrganizationRequest { name: r.name }),
        }
    }
}

impl From<CategoryRef> for Association<CreateCategoryRequest> {
    fn from(r: CategoryRef) -> Self {
        match r.id {
            Some(id) => Association::Existing(id),
            None => Association::New(CreateCategoryRequest {
                name: r.name,
                description: r.description,
            }),
        }
    }
}

fn check_association<T: Schema>(
    errors: &mut ValidationErrors,
    field: &'static str,
    association: Option<&Association<T>>,
) {
    match association {
        None => errors.add(
            field,
            validation::field_error("required", format!("{} is required", field)),
        ),
        Some(Association::New(data)) => {
            if let Err(nested) = validation::check(data) {
                validation::nest(errors, field, nested);
            }
        }
        Some(Association::Existing(_)) => {}
    }
}

impl CreateProductRequest {
    /// Validate the request and decide how each association is resolved.
    ///
    /// All field errors are collected before returning, including those of
    /// embedded organization and category data.
    pub fn into_draft(self) -> Result<ProductDraft, ValidationErrors> {
        let mut errors = match validation::check(&self) {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        let organization = self.organization.map(Association::from);
        let category = self.category.map(Association::from);

        check_association(&mut errors, "organization", organization.as_ref());
        check_association(&mut errors, "category", category.as_ref());

        match (self.name, organization, category) {
            (Some(name), Some(organization), Some(category)) if errors.is_empty() => {
                Ok(ProductDraft {
                    name,
                    organization,
                    category,
                })
            }
            _ => Err(errors),
        }
    }
}
