use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use geo_types::Geometry;

use crate::defn::{Defn, FieldType};

/// A single field value.
///
/// Each variant corresponds to one [`FieldType`](crate::defn::FieldType).
/// Nullability is expressed at the feature level: a feature stores
/// `Option<FieldValue>` per field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    IntegerValue(i32),
    Integer64Value(i64),
    RealValue(f64),
    StringValue(String),
    DateValue(NaiveDate),
    DateTimeValue(DateTime<FixedOffset>),
}

impl FieldValue {
    /// Interpret the value as `String`. Returns `None` if the value is
    /// something else.
    pub fn into_string(self) -> Option<String> {
        match self {
            FieldValue::StringValue(rv) => Some(rv),
            _ => None,
        }
    }

    /// Interpret the value as `f64`. Returns `None` if the value is something
    /// else.
    pub fn into_real(self) -> Option<f64> {
        match self {
            FieldValue::RealValue(rv) => Some(rv),
            _ => None,
        }
    }

    /// Interpret the value as `i32`. Returns `None` if the value is something
    /// else.
    pub fn into_int(self) -> Option<i32> {
        match self {
            FieldValue::IntegerValue(rv) => Some(rv),
            _ => None,
        }
    }

    /// Interpret the value as `i64`. Returns `None` if the value is something
    /// else.
    pub fn into_int64(self) -> Option<i64> {
        match self {
            FieldValue::Integer64Value(rv) => Some(rv),
            _ => None,
        }
    }

    /// Interpret the value as `NaiveDate`. Returns `None` if the value is
    /// something else.
    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            FieldValue::DateValue(rv) => Some(rv),
            _ => None,
        }
    }

    /// Interpret the value as `DateTime<FixedOffset>`. Returns `None` if the
    /// value is something else.
    pub fn into_datetime(self) -> Option<DateTime<FixedOffset>> {
        match self {
            FieldValue::DateTimeValue(rv) => Some(rv),
            _ => None,
        }
    }

    /// The [`FieldType`] this value belongs to.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::IntegerValue(_) => FieldType::Integer,
            FieldValue::Integer64Value(_) => FieldType::Integer64,
            FieldValue::RealValue(_) => FieldType::Real,
            FieldValue::StringValue(_) => FieldType::String,
            FieldValue::DateValue(_) => FieldType::Date,
            FieldValue::DateTimeValue(_) => FieldType::DateTime,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::IntegerValue(v) => write!(f, "{v}"),
            FieldValue::Integer64Value(v) => write!(f, "{v}"),
            FieldValue::RealValue(v) => write!(f, "{v}"),
            FieldValue::StringValue(v) => f.write_str(v),
            FieldValue::DateValue(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            FieldValue::DateTimeValue(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

/// Feature identifier: the owning feature type's name plus a local id
/// assigned by the backend.
///
/// Rendered as `type.local`. The retyping layer only ever replaces the
/// feature type component; the local component is opaque and preserved
/// byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureId {
    feature_type: String,
    local: String,
}

impl FeatureId {
    pub fn new(feature_type: &str, local: &str) -> FeatureId {
        FeatureId {
            feature_type: feature_type.to_string(),
            local: local.to_string(),
        }
    }

    /// The feature type name component.
    pub fn feature_type(&self) -> &str {
        &self.feature_type
    }

    /// The backend-assigned local id component.
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.feature_type, self.local)
    }
}

/// A single feature: an optional id, field values stored positionally
/// against a [`Defn`], and an optional geometry.
///
/// Features are plain values owned by whoever holds them; this layer never
/// retains one. A `None` field entry is a null.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    fid: Option<FeatureId>,
    fields: Vec<Option<FieldValue>>,
    geometry: Option<Geometry<f64>>,
}

impl Feature {
    /// Creates a feature with all fields null and no geometry, shaped for
    /// `defn`.
    pub fn new(defn: &Defn) -> Feature {
        Feature {
            fid: None,
            fields: vec![None; defn.field_count()],
            geometry: None,
        }
    }

    /// Creates a feature from parts. `fields` must be positionally ordered
    /// per the feature type the caller intends it for.
    pub fn with_fields(
        fid: Option<FeatureId>,
        fields: Vec<Option<FieldValue>>,
        geometry: Option<Geometry<f64>>,
    ) -> Feature {
        Feature {
            fid,
            fields,
            geometry,
        }
    }

    pub fn fid(&self) -> Option<&FeatureId> {
        self.fid.as_ref()
    }

    pub fn set_fid(&mut self, fid: Option<FeatureId>) {
        self.fid = fid;
    }

    /// Get the value of the field at `index`, `None` if null or out of range.
    pub fn field(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index).and_then(|v| v.as_ref())
    }

    /// Get the value of a named field, resolved through `defn`.
    pub fn field_by_name(&self, defn: &Defn, name: &str) -> Option<&FieldValue> {
        self.field(defn.field_index(name)?)
    }

    /// Set the value of the field at `index`.
    pub fn set_field(&mut self, index: usize, value: Option<FieldValue>) {
        if let Some(slot) = self.fields.get_mut(index) {
            *slot = value;
        }
    }

    /// All field values in positional order.
    pub fn fields(&self) -> &[Option<FieldValue>] {
        &self.fields
    }

    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }

    pub fn set_geometry(&mut self, geometry: Option<Geometry<f64>>) {
        self.geometry = geometry;
    }
}
