// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Facet fields exposed by the catalog listing endpoints

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A product field whose distinct values are listed for filter UIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FacetField {
    /// The `brand` field
    Brand,
    /// The `category` field
    Category,
}

impl FacetField {
    /// Document field name grouped on
    pub const fn field_name(self) -> &'static str {
        match self {
            FacetField::Brand => "brand",
            FacetField::Category => "category",
        }
    }

    /// Plural label used in log messages and metrics
    pub const fn plural(self) -> &'static str {
        match self {
            FacetField::Brand => "brands",
            FacetField::Category => "categories",
        }
    }
}

impl fmt::Display for FacetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}
