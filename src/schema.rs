//! Required-field contracts for model output.
//!
//! Each prompt variant owns one [`SchemaDescriptor`]: an ordered list of the
//! top-level JSON fields the prompt asks for, with the shape each must have.
//! [`SchemaDescriptor::missing_fields`] is the only validation routine; adding
//! a prompt variant means adding a descriptor, not another `if` chain.

use serde_json::{Map, Value};

/// Expected JSON shape of a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    String,
    Number,
    Array,
    Object,
}

impl FieldShape {
    /// `true` when `value` has this shape and carries content.
    ///
    /// Blank strings, empty arrays and empty objects count as absent.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (FieldShape::String, Value::String(s)) => !s.trim().is_empty(),
            (FieldShape::Number, Value::Number(_)) => true,
            (FieldShape::Array, Value::Array(items)) => !items.is_empty(),
            (FieldShape::Object, Value::Object(map)) => !map.is_empty(),
            _ => false,
        }
    }
}

/// One top-level field the model must return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub name: &'static str,
    pub shape: FieldShape,
}

impl RequiredField {
    pub const fn new(name: &'static str, shape: FieldShape) -> Self {
        Self { name, shape }
    }
}

/// The required-field contract for one prompt variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub name: &'static str,
    pub fields: &'static [RequiredField],
}

impl SchemaDescriptor {
    /// Names of every required field that is absent, empty, or the wrong shape.
    ///
    /// Order follows the descriptor so the resulting message is stable.
    pub fn missing_fields(&self, object: &Map<String, Value>) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|field| {
                object
                    .get(field.name)
                    .map_or(true, |value| !field.shape.accepts(value))
            })
            .map(|field| field.name)
            .collect()
    }

    /// Iterate over the required field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

/// Construction-industry review: contractor protection lens.
pub const CONSTRUCTION_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    name: "construction-review",
    fields: &[
        RequiredField::new("contractor_protection_score", FieldShape::Number),
        RequiredField::new("overall_risk", FieldShape::String),
        RequiredField::new("contract_type", FieldShape::String),
        RequiredField::new("risk_breakdown", FieldShape::Object),
        RequiredField::new("critical_findings", FieldShape::Array),
        RequiredField::new("field_team_alerts", FieldShape::Array),
        RequiredField::new("industry_benchmarks", FieldShape::Object),
        RequiredField::new("recommendations", FieldShape::Array),
    ],
};

/// General-purpose legal risk review.
pub const GENERAL_SCHEMA: SchemaDescriptor = SchemaDescriptor {
    name: "general-review",
    fields: &[
        RequiredField::new("overall_risk", FieldShape::String),
        RequiredField::new("risk_score", FieldShape::Number),
        RequiredField::new("contract_type", FieldShape::String),
        RequiredField::new("payment_terms", FieldShape::String),
        RequiredField::new("liability", FieldShape::String),
        RequiredField::new("termination", FieldShape::String),
        RequiredField::new("insurance", FieldShape::String),
        RequiredField::new("key_risks", FieldShape::Array),
        RequiredField::new("recommendations", FieldShape::Array),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn empty_values_are_missing() {
        let obj = object(json!({
            "overall_risk": "   ",
            "risk_score": 40,
            "contract_type": "Service Agreement",
            "payment_terms": "Net 30",
            "liability": "Capped",
            "termination": "30 days notice",
            "insurance": "Not specified",
            "key_risks": [],
            "recommendations": ["Negotiate a cap"]
        }));
        assert_eq!(
            GENERAL_SCHEMA.missing_fields(&obj),
            vec!["overall_risk", "key_risks"]
        );
    }

    #[test]
    fn wrong_shape_is_missing() {
        let obj = object(json!({ "risk_score": "75" }));
        let missing = GENERAL_SCHEMA.missing_fields(&obj);
        assert!(missing.contains(&"risk_score"));
    }

    #[test]
    fn null_is_missing() {
        let obj = object(json!({ "risk_breakdown": null }));
        assert!(CONSTRUCTION_SCHEMA
            .missing_fields(&obj)
            .contains(&"risk_breakdown"));
    }

    #[test]
    fn missing_list_preserves_descriptor_order() {
        let obj = object(json!({ "overall_risk": "Low" }));
        let missing = CONSTRUCTION_SCHEMA.missing_fields(&obj);
        let expected: Vec<_> = CONSTRUCTION_SCHEMA
            .field_names()
            .filter(|n| *n != "overall_risk")
            .collect();
        assert_eq!(missing, expected);
    }

    #[test]
    fn number_accepts_zero() {
        assert!(FieldShape::Number.accepts(&json!(0)));
        assert!(FieldShape::Number.accepts(&json!(72.5)));
    }
}
