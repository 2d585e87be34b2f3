//! # Flower Shop Schema
//!
//! The entire business domain, declared as data. Every table, form,
//! listing, dropdown, and report the shop needs is derived from these
//! definitions by the engine; this file is the only place that knows
//! what a "flower" is.

use kiosk_core::{EntityDefinition, FieldDefinition, SchemaRegistry, SchemaResult};

/// Declares the shop's entities.
///
/// Referenced entities come first: registration requires reference
/// targets to already exist, which also keeps the dependency order
/// visible here.
pub fn registry() -> SchemaResult<SchemaRegistry> {
    SchemaRegistry::from_entities(vec![
        EntityDefinition::new("suppliers")
            .field(FieldDefinition::text("name"))
            .field(FieldDefinition::text("contact").nullable()),
        EntityDefinition::new("flowers")
            .field(FieldDefinition::text("name"))
            .field(FieldDefinition::integer("quantity").default_value(0))
            .field(FieldDefinition::real("price"))
            .field(
                FieldDefinition::integer("supplier_id")
                    .nullable()
                    .references("suppliers", "id"),
            ),
        EntityDefinition::new("employees")
            .field(FieldDefinition::text("name"))
            .field(FieldDefinition::text("position").nullable())
            .field(FieldDefinition::real("salary")),
        EntityDefinition::new("sales")
            .field(FieldDefinition::integer("flower_id").references("flowers", "id"))
            .field(FieldDefinition::integer("quantity"))
            .field(FieldDefinition::real("total_price"))
            .field(FieldDefinition::date("sale_date").default_today()),
        EntityDefinition::new("purchases")
            .field(FieldDefinition::integer("flower_id").references("flowers", "id"))
            .field(FieldDefinition::integer("quantity"))
            .field(FieldDefinition::real("cost"))
            .field(FieldDefinition::date("purchase_date").default_today())
            .field(
                FieldDefinition::integer("supplier_id")
                    .nullable()
                    .references("suppliers", "id"),
            ),
        // Shop branches rendered as map markers
        EntityDefinition::new("locations")
            .field(FieldDefinition::text("address"))
            .field(FieldDefinition::real("latitude"))
            .field(FieldDefinition::real("longitude")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_registers() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), 6);

        let flowers = registry.get("flowers").unwrap();
        let names: Vec<_> = flowers.field_names().collect();
        assert_eq!(names, vec!["name", "quantity", "price", "supplier_id"]);
    }

    #[test]
    fn test_sales_reference_flowers() {
        let registry = registry().unwrap();
        let sales = registry.get("sales").unwrap();
        let reference = sales
            .get_field("flower_id")
            .and_then(|field| field.references.clone())
            .unwrap();
        assert_eq!(reference.entity, "flowers");
        assert_eq!(reference.field, "id");
    }
}
