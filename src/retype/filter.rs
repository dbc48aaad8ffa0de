use crate::errors::Result;
use crate::filter::{Filter, Operand};
use crate::retype::fid::retype_fid;
use crate::retype::map::{Direction, FeatureTypeMap};

/// Rewrites every schema-bound leaf of a filter so that it references the
/// target schema of `direction`: field names are renamed through the map and
/// feature ids are re-tagged with the target type name. Literals, geometry
/// operands and the tree structure are copied unchanged.
///
/// A field name missing from the map fails the whole rewrite; a stale name
/// passed through silently would match nothing (or the wrong column) in the
/// backend.
pub fn retype_filter(
    filter: &Filter,
    map: &FeatureTypeMap,
    direction: Direction,
) -> Result<Filter> {
    Ok(match filter {
        Filter::Include => Filter::Include,
        Filter::Exclude => Filter::Exclude,
        Filter::And(children) => Filter::And(
            children
                .iter()
                .map(|child| retype_filter(child, map, direction))
                .collect::<Result<Vec<_>>>()?,
        ),
        Filter::Or(children) => Filter::Or(
            children
                .iter()
                .map(|child| retype_filter(child, map, direction))
                .collect::<Result<Vec<_>>>()?,
        ),
        Filter::Not(child) => Filter::Not(Box::new(retype_filter(child, map, direction)?)),
        Filter::Compare(op, left, right) => Filter::Compare(
            *op,
            retype_operand(left, map, direction)?,
            retype_operand(right, map, direction)?,
        ),
        Filter::Spatial(op, name, geometry) => Filter::Spatial(
            *op,
            map.mapping_for(name, direction)?.name(direction).to_string(),
            geometry.clone(),
        ),
        Filter::Fids(fids) => {
            let from = map.source(direction).name();
            let to = map.target(direction).name();
            Filter::Fids(
                fids.iter()
                    .map(|fid| retype_fid(fid, from, to))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
    })
}

fn retype_operand(
    operand: &Operand,
    map: &FeatureTypeMap,
    direction: Direction,
) -> Result<Operand> {
    Ok(match operand {
        Operand::Property(name) => Operand::Property(
            map.mapping_for(name, direction)?.name(direction).to_string(),
        ),
        Operand::Literal(value) => Operand::Literal(value.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConverterRegistry;
    use crate::defn::{Defn, FieldDefn, FieldType};
    use crate::errors::RetypeError;
    use crate::feature::{FeatureId, FieldValue};
    use crate::filter::{CompareOp, SpatialOp};
    use geo_types::{polygon, Geometry};

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
            ],
        );
        FeatureTypeMap::new(
            exposed,
            original,
            &[("owner", "OWNER_NAME"), ("area", "AREA_SQM")],
            &ConverterRegistry::default(),
        )
        .unwrap()
    }

    fn owner_is_alice() -> Filter {
        Filter::equals("owner", FieldValue::StringValue("Alice".to_string()))
    }

    #[test]
    fn test_property_names_are_rewritten() {
        let map = parcel_map();
        let retyped = retype_filter(&owner_is_alice(), &map, Direction::ToOriginal).unwrap();
        assert_eq!(
            retyped,
            Filter::equals("OWNER_NAME", FieldValue::StringValue("Alice".to_string()))
        );
    }

    #[test]
    fn test_structure_and_literals_preserved() {
        let map = parcel_map();
        let filter = Filter::And(vec![
            owner_is_alice(),
            Filter::Not(Box::new(Filter::Compare(
                CompareOp::Gt,
                Operand::property("area"),
                Operand::Literal(FieldValue::RealValue(100.0)),
            ))),
            Filter::Or(vec![Filter::Include, Filter::Exclude]),
        ]);
        let retyped = retype_filter(&filter, &map, Direction::ToOriginal).unwrap();
        assert_eq!(
            retyped,
            Filter::And(vec![
                Filter::equals("OWNER_NAME", FieldValue::StringValue("Alice".to_string())),
                Filter::Not(Box::new(Filter::Compare(
                    CompareOp::Gt,
                    Operand::property("AREA_SQM"),
                    Operand::Literal(FieldValue::RealValue(100.0)),
                ))),
                Filter::Or(vec![Filter::Include, Filter::Exclude]),
            ])
        );
    }

    #[test]
    fn test_involution() {
        let map = parcel_map();
        let filter = Filter::And(vec![
            owner_is_alice(),
            Filter::Spatial(
                SpatialOp::Intersects,
                "area".to_string(),
                Geometry::Polygon(polygon![
                    (x: 0.0, y: 0.0),
                    (x: 10.0, y: 0.0),
                    (x: 10.0, y: 10.0),
                    (x: 0.0, y: 0.0),
                ]),
            ),
            Filter::Fids(vec![FeatureId::new("Parcel", "7")]),
        ]);
        let there = retype_filter(&filter, &map, Direction::ToOriginal).unwrap();
        let back = retype_filter(&there, &map, Direction::ToExposed).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn test_unmapped_name_fails() {
        let map = parcel_map();
        let filter = Filter::equals("zoning", FieldValue::StringValue("R1".to_string()));
        let err = retype_filter(&filter, &map, Direction::ToOriginal).unwrap_err();
        match err {
            RetypeError::UnmappedField { field_name, .. } => assert_eq!(field_name, "zoning"),
            other => panic!("expected UnmappedField, got {other:?}"),
        }
    }

    #[test]
    fn test_fid_retagging() {
        let map = parcel_map();
        let filter = Filter::Fids(vec![FeatureId::new("Parcel", "42")]);
        let retyped = retype_filter(&filter, &map, Direction::ToOriginal).unwrap();
        assert_eq!(
            retyped,
            Filter::Fids(vec![FeatureId::new("PARCEL_TBL", "42")])
        );

        // an id belonging to some other type is rejected, not passed through
        let foreign = Filter::Fids(vec![FeatureId::new("ROAD_TBL", "1")]);
        assert!(matches!(
            retype_filter(&foreign, &map, Direction::ToOriginal).unwrap_err(),
            RetypeError::FidTypeMismatch { .. }
        ));
    }
}
