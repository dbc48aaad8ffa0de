use std::collections::HashMap;

use crate::convert::ConverterRegistry;
use crate::defn::{Defn, FieldType};
use crate::errors::{RetypeError, Result};

/// The sense of a translation between the two schemas of a
/// [`FeatureTypeMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Exposed schema to original (backend) schema: request shapes going in.
    ToOriginal,
    /// Original schema to exposed schema: results coming out.
    ToExposed,
}

impl Direction {
    /// The opposite sense.
    pub fn reversed(self) -> Direction {
        match self {
            Direction::ToOriginal => Direction::ToExposed,
            Direction::ToExposed => Direction::ToOriginal,
        }
    }
}

/// One exposed-field / original-field correspondence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    exposed: String,
    original: String,
    exposed_type: FieldType,
    original_type: FieldType,
}

impl FieldMapping {
    pub fn exposed(&self) -> &str {
        &self.exposed
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn exposed_type(&self) -> FieldType {
        self.exposed_type
    }

    pub fn original_type(&self) -> FieldType {
        self.original_type
    }

    /// Field name in the given target schema.
    pub fn name(&self, direction: Direction) -> &str {
        match direction {
            Direction::ToOriginal => &self.original,
            Direction::ToExposed => &self.exposed,
        }
    }
}

/// Immutable correspondence table between an exposed feature type and the
/// backend's original feature type.
///
/// The exposed type may rename fields, reorder them, drop some of them and
/// declare different (coercible) value types; it may also carry a different
/// type name. Construction validates the whole mapping; once built the map
/// is never wrong at call time about names, only individual values can still
/// fail to coerce.
#[derive(Debug, Clone)]
pub struct FeatureTypeMap {
    exposed: Defn,
    original: Defn,
    mappings: Vec<FieldMapping>,
    by_exposed: HashMap<String, usize>,
    by_original: HashMap<String, usize>,
}

impl FeatureTypeMap {
    /// Builds a map from the exposed and original feature types plus the
    /// `(exposed name, original name)` pairs, one per exposed field.
    ///
    /// Fails when an exposed field is left unmapped, a named field is absent
    /// from either type, an original field is claimed twice, or a declared
    /// type pairing has no original-to-exposed conversion in `registry`.
    pub fn new(
        exposed: Defn,
        original: Defn,
        pairs: &[(&str, &str)],
        registry: &ConverterRegistry,
    ) -> Result<FeatureTypeMap> {
        let mut mappings = Vec::with_capacity(exposed.field_count());
        let mut by_exposed = HashMap::new();
        let mut by_original = HashMap::new();

        for field in exposed.fields() {
            let (_, original_name) = pairs
                .iter()
                .find(|(exposed_name, _)| *exposed_name == field.name())
                .ok_or_else(|| RetypeError::UnmappedField {
                    field_name: field.name().to_string(),
                    type_name: exposed.name().to_string(),
                })?;
            let original_field =
                original
                    .field(original_name)
                    .ok_or_else(|| RetypeError::UnmappedField {
                        field_name: original_name.to_string(),
                        type_name: original.name().to_string(),
                    })?;
            if !registry.can_convert(original_field.field_type(), field.field_type()) {
                return Err(RetypeError::IncompatibleTypes {
                    field_name: field.name().to_string(),
                    from: original_field.field_type(),
                    to: field.field_type(),
                });
            }
            if by_original
                .insert(original_field.name().to_string(), mappings.len())
                .is_some()
            {
                return Err(RetypeError::DuplicateMapping {
                    field_name: original_field.name().to_string(),
                    type_name: original.name().to_string(),
                });
            }
            by_exposed.insert(field.name().to_string(), mappings.len());
            mappings.push(FieldMapping {
                exposed: field.name().to_string(),
                original: original_field.name().to_string(),
                exposed_type: field.field_type(),
                original_type: original_field.field_type(),
            });
        }

        Ok(FeatureTypeMap {
            exposed,
            original,
            mappings,
            by_exposed,
            by_original,
        })
    }

    /// A map that renames nothing: the exposed type is the original type.
    pub fn identity(defn: Defn, registry: &ConverterRegistry) -> Result<FeatureTypeMap> {
        let names: Vec<String> = defn.fields().map(|f| f.name().to_string()).collect();
        let pairs: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), n.as_str())).collect();
        FeatureTypeMap::new(defn.clone(), defn, &pairs, registry)
    }

    /// The caller-visible feature type.
    pub fn exposed(&self) -> &Defn {
        &self.exposed
    }

    /// The backend's native feature type.
    pub fn original(&self) -> &Defn {
        &self.original
    }

    /// The mappings, in exposed-schema field order.
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// The feature type serving as source for the given direction.
    pub fn source(&self, direction: Direction) -> &Defn {
        match direction {
            Direction::ToOriginal => &self.exposed,
            Direction::ToExposed => &self.original,
        }
    }

    /// The feature type produced by the given direction.
    pub fn target(&self, direction: Direction) -> &Defn {
        match direction {
            Direction::ToOriginal => &self.original,
            Direction::ToExposed => &self.exposed,
        }
    }

    /// Original field name for an exposed field name.
    pub fn original_name(&self, exposed_name: &str) -> Result<&str> {
        self.mapping_for(exposed_name, Direction::ToOriginal)
            .map(|m| m.original.as_str())
    }

    /// Exposed field name for an original field name. Original fields
    /// narrowed out of the exposed type are unmapped.
    pub fn exposed_name(&self, original_name: &str) -> Result<&str> {
        self.mapping_for(original_name, Direction::ToExposed)
            .map(|m| m.exposed.as_str())
    }

    /// The mapping whose *source* side (per `direction`) is `name`, if any.
    /// Original fields narrowed out of the exposed type have no mapping.
    pub fn find_mapping(&self, name: &str, direction: Direction) -> Option<&FieldMapping> {
        let index = match direction {
            Direction::ToOriginal => self.by_exposed.get(name),
            Direction::ToExposed => self.by_original.get(name),
        };
        index.map(|&i| &self.mappings[i])
    }

    /// Like [`find_mapping`](FeatureTypeMap::find_mapping), but an absent
    /// mapping is an error.
    pub fn mapping_for(&self, name: &str, direction: Direction) -> Result<&FieldMapping> {
        self.find_mapping(name, direction)
            .ok_or_else(|| RetypeError::UnmappedField {
                field_name: name.to_string(),
                type_name: self.source(direction).name().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defn::FieldDefn;

    fn registry() -> ConverterRegistry {
        ConverterRegistry::default()
    }

    fn parcel_map() -> FeatureTypeMap {
        let exposed = Defn::new(
            "Parcel",
            vec![
                FieldDefn::new("owner", FieldType::String),
                FieldDefn::new("area", FieldType::Real),
            ],
        );
        let original = Defn::new(
            "PARCEL_TBL",
            vec![
                FieldDefn::new("AREA_SQM", FieldType::Real),
                FieldDefn::new("OWNER_NAME", FieldType::String),
                FieldDefn::new("INTERNAL_FLAG", FieldType::Integer),
            ],
        );
        FeatureTypeMap::new(
            exposed,
            original,
            &[("owner", "OWNER_NAME"), ("area", "AREA_SQM")],
            &registry(),
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_both_directions() {
        let map = parcel_map();
        assert_eq!(map.original_name("owner").unwrap(), "OWNER_NAME");
        assert_eq!(map.exposed_name("AREA_SQM").unwrap(), "area");
        assert_eq!(map.exposed().name(), "Parcel");
        assert_eq!(map.original().name(), "PARCEL_TBL");
    }

    #[test]
    fn test_narrowed_field_is_unmapped() {
        let map = parcel_map();
        let err = map.exposed_name("INTERNAL_FLAG").unwrap_err();
        match err {
            RetypeError::UnmappedField {
                field_name,
                type_name,
            } => {
                assert_eq!(field_name, "INTERNAL_FLAG");
                assert_eq!(type_name, "PARCEL_TBL");
            }
            other => panic!("expected UnmappedField, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_original_field_fails_construction() {
        let exposed = Defn::new("T", vec![FieldDefn::new("a", FieldType::String)]);
        let original = Defn::new("S", vec![FieldDefn::new("b", FieldType::String)]);
        let err =
            FeatureTypeMap::new(exposed, original, &[("a", "nope")], &registry()).unwrap_err();
        assert!(matches!(err, RetypeError::UnmappedField { .. }));
    }

    #[test]
    fn test_unmapped_exposed_field_fails_construction() {
        let exposed = Defn::new("T", vec![FieldDefn::new("a", FieldType::String)]);
        let original = Defn::new("S", vec![FieldDefn::new("b", FieldType::String)]);
        let err = FeatureTypeMap::new(exposed, original, &[], &registry()).unwrap_err();
        assert!(matches!(err, RetypeError::UnmappedField { .. }));
    }

    #[test]
    fn test_duplicate_original_fails_construction() {
        let exposed = Defn::new(
            "T",
            vec![
                FieldDefn::new("a", FieldType::String),
                FieldDefn::new("b", FieldType::String),
            ],
        );
        let original = Defn::new("S", vec![FieldDefn::new("x", FieldType::String)]);
        let err = FeatureTypeMap::new(exposed, original, &[("a", "x"), ("b", "x")], &registry())
            .unwrap_err();
        assert!(matches!(err, RetypeError::DuplicateMapping { .. }));
    }

    #[test]
    fn test_incompatible_types_fail_construction() {
        // no Integer -> Date conversion in the stock registry
        let exposed = Defn::new("T", vec![FieldDefn::new("a", FieldType::Date)]);
        let original = Defn::new("S", vec![FieldDefn::new("b", FieldType::Integer)]);
        let err = FeatureTypeMap::new(exposed, original, &[("a", "b")], &registry()).unwrap_err();
        match err {
            RetypeError::IncompatibleTypes { from, to, .. } => {
                assert_eq!(from, FieldType::Integer);
                assert_eq!(to, FieldType::Date);
            }
            other => panic!("expected IncompatibleTypes, got {other:?}"),
        }
    }

    #[test]
    fn test_coercible_pairing_is_accepted() {
        let exposed = Defn::new("T", vec![FieldDefn::new("a", FieldType::Real)]);
        let original = Defn::new("S", vec![FieldDefn::new("b", FieldType::Integer)]);
        assert!(FeatureTypeMap::new(exposed, original, &[("a", "b")], &registry()).is_ok());
    }

    #[test]
    fn test_identity_map() {
        let defn = Defn::new("roads", vec![FieldDefn::new("kind", FieldType::String)]);
        let map = FeatureTypeMap::identity(defn, &registry()).unwrap();
        assert_eq!(map.original_name("kind").unwrap(), "kind");
        assert_eq!(map.exposed(), map.original());
    }
}
