//! Normalised output: columnar data frames.
//!
//! A [`DataFrame`] is a list of equally long [`Field`]s. Missing cells are
//! explicit `null`s, so every field always has one value per row.
//! [`FrameBuilder`] grows a frame row by row while new fields are discovered,
//! backfilling earlier rows of a late field with `null`.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::labels::Labels;

/// Value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Time,
    Number,
    String,
    Boolean,
    Other,
}

impl FieldKind {
    /// Infer the kind of a field from one sampled value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => FieldKind::String,
            Value::Number(_) => FieldKind::Number,
            Value::Bool(_) => FieldKind::Boolean,
            _ => FieldKind::Other,
        }
    }
}

/// Hyperlink attached to every value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLink {
    pub url: String,
    pub title: String,
    pub target_blank: bool,
}

/// One column of a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub values: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<DataLink>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
            labels: None,
            display_name: None,
            links: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Hints for the host about how to render a frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_visualisation_type: Option<String>,
}

impl FrameMeta {
    pub fn logs() -> Self {
        Self {
            preferred_visualisation_type: Some("logs".to_string()),
        }
    }
}

/// A normalised table for one query.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFrame {
    pub ref_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<FrameMeta>,
    pub fields: Vec<Field>,
}

impl DataFrame {
    /// A frame with no fields at all.
    pub fn empty(ref_id: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            meta: None,
            fields: Vec::new(),
        }
    }

    /// Number of rows. Zero for a frame without fields.
    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, Field::len)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Every field has the same number of values.
    pub fn is_rectangular(&self) -> bool {
        let rows = self.row_count();
        self.fields.iter().all(|f| f.len() == rows)
    }
}

/// Row-wise frame construction with late field discovery.
#[derive(Debug)]
pub struct FrameBuilder {
    frame: DataFrame,
    rows: usize,
    positions: HashMap<String, usize>,
}

impl FrameBuilder {
    pub fn new(ref_id: impl Into<String>) -> Self {
        Self {
            frame: DataFrame::empty(ref_id),
            rows: 0,
            positions: HashMap::new(),
        }
    }

    pub fn with_meta(mut self, meta: FrameMeta) -> Self {
        self.frame.meta = Some(meta);
        self
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Append a field, backfilled with `null` for rows already pushed.
    /// Returns `false` and leaves the frame unchanged if the name is taken.
    pub fn add_field(&mut self, name: &str, kind: FieldKind) -> bool {
        if self.has_field(name) {
            return false;
        }
        self.positions.insert(name.to_string(), self.frame.fields.len());
        self.frame
            .fields
            .push(Field::new(name, kind, vec![Value::Null; self.rows]));
        true
    }

    /// Append one row. Fields absent from `row` get `null`; entries of `row`
    /// without a matching field are ignored.
    pub fn push_row(&mut self, mut row: Map<String, Value>) {
        for field in &mut self.frame.fields {
            field.values.push(row.remove(&field.name).unwrap_or(Value::Null));
        }
        self.rows += 1;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(self) -> DataFrame {
        self.frame
    }
}
