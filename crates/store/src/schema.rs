//! Search index definitions and their `FT.CREATE` encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index field type as understood by the search module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Numeric,
    Tag,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "TEXT"),
            FieldType::Numeric => write!(f, "NUMERIC"),
            FieldType::Tag => write!(f, "TAG"),
        }
    }
}

/// One JSONPath expression indexed under an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub path: String,
    pub alias: String,
    pub field_type: FieldType,
}

impl SchemaField {
    pub fn new(path: &str, alias: &str, field_type: FieldType) -> Self {
        Self {
            path: path.to_string(),
            alias: alias.to_string(),
            field_type,
        }
    }

    pub fn text(path: &str, alias: &str) -> Self {
        Self::new(path, alias, FieldType::Text)
    }

    pub fn numeric(path: &str, alias: &str) -> Self {
        Self::new(path, alias, FieldType::Numeric)
    }

    pub fn tag(path: &str, alias: &str) -> Self {
        Self::new(path, alias, FieldType::Tag)
    }
}

/// A JSON index scoped to documents whose key starts with one of `prefixes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub prefixes: Vec<String>,
    pub fields: Vec<SchemaField>,
}

impl IndexDefinition {
    pub fn new(name: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            prefixes: vec![prefix.to_string()],
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    /// Arguments following `FT.CREATE`:
    /// `<name> ON JSON PREFIX <n> <prefix>... SCHEMA (<path> AS <alias> <TYPE>)...`
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            self.name.clone(),
            "ON".to_string(),
            "JSON".to_string(),
            "PREFIX".to_string(),
            self.prefixes.len().to_string(),
        ];
        args.extend(self.prefixes.iter().cloned());
        args.push("SCHEMA".to_string());
        for f in &self.fields {
            args.push(f.path.clone());
            args.push("AS".to_string());
            args.push(f.alias.clone());
            args.push(f.field_type.to_string());
        }
        args
    }
}

/// The inventory index: item text, quantities, tags, dimensions, size and status.
pub fn inventory_index(name: &str, prefix: &str) -> IndexDefinition {
    IndexDefinition::new(name, prefix)
        .field(SchemaField::text("$.item", "item"))
        .field(SchemaField::numeric("$.qty", "qty"))
        .field(SchemaField::tag("$.tags.*", "tags"))
        .field(SchemaField::numeric("$.dim_cm[0]", "dim_cm_0"))
        .field(SchemaField::numeric("$.dim_cm[1]", "dim_cm_1"))
        .field(SchemaField::text("$.status", "status"))
        .field(SchemaField::numeric("$.size.h", "sizeh"))
        .field(SchemaField::numeric("$.size.w", "sizew"))
        .field(SchemaField::text("$.size.uom", "sizeuom"))
}
