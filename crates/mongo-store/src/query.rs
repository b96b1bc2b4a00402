// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! BSON rendering of catalog queries

use catalog_types::{FacetField, FilterCriteria, SortSpec};
use mongodb::bson::{Document, doc};

/// Build the `find`/`countDocuments` filter for `criteria`
///
/// The name pattern is passed to `$regex` unescaped with the `i` option, so
/// clients may send regular expressions.
pub fn filter_document(criteria: &FilterCriteria) -> Document {
    let mut filter = doc! {};

    if let Some(pattern) = criteria.name_pattern() {
        filter.insert("name", doc! { "$regex": pattern, "$options": "i" });
    }

    if let Some(category) = criteria.category() {
        filter.insert("category", category);
    }

    if let Some(brand) = criteria.brand() {
        filter.insert("brand", brand);
    }

    filter
}

/// Build the sort document for a single-field sort
pub fn sort_document(sort: &SortSpec) -> Document {
    doc! { sort.field(): sort.direction().as_i32() }
}

/// Aggregation pipeline listing the distinct values of `field`
///
/// Each output document has the shape `{ <field>: <value> }`.
pub fn facet_pipeline(field: FacetField) -> Vec<Document> {
    let name = field.field_name();
    vec![
        doc! { "$group": { "_id": format!("${name}") } },
        doc! { "$project": { "_id": 0, name: "$_id" } },
    ]
}

#[cfg(test)]
mod tests {
    use catalog_types::SortDirection;

    use super::*;

    #[test]
    fn empty_criteria_render_an_empty_filter() {
        assert_eq!(filter_document(&FilterCriteria::all()), doc! {});
    }

    #[test]
    fn full_criteria_render_every_constraint() {
        let criteria = FilterCriteria::new(
            Some("pixel".to_string()),
            Some("Phones".to_string()),
            Some("Google".to_string()),
        );

        assert_eq!(
            filter_document(&criteria),
            doc! {
                "name": { "$regex": "pixel", "$options": "i" },
                "category": "Phones",
                "brand": "Google",
            }
        );
    }

    #[test]
    fn sort_documents() {
        assert_eq!(
            sort_document(&SortSpec::new("price", SortDirection::Descending)),
            doc! { "price": -1 }
        );
        assert_eq!(
            sort_document(&SortSpec::new("name", SortDirection::Ascending)),
            doc! { "name": 1 }
        );
    }

    #[test]
    fn facet_pipelines_group_then_project() {
        assert_eq!(
            facet_pipeline(FacetField::Brand),
            vec![
                doc! { "$group": { "_id": "$brand" } },
                doc! { "$project": { "_id": 0, "brand": "$_id" } },
            ]
        );
        assert_eq!(
            facet_pipeline(FacetField::Category)[0],
            doc! { "$group": { "_id": "$category" } }
        );
    }
}
