use crate::convert::ConverterRegistry;
use crate::errors::Result;
use crate::feature::Feature;
use crate::retype::map::{Direction, FeatureTypeMap};

/// Rebuilds a feature under the target schema of `direction`.
///
/// Fields come out in the target schema's declared order, each value coerced
/// to the target field's declared type through `registry` when the two
/// declared types differ. Null values pass through as nulls. Source fields
/// with no mapping are dropped and target fields with no mapping stay null,
/// which is how a narrowed exposed schema hides original fields in both
/// directions. The id and geometry are carried over untouched; id
/// re-tagging is a separate step (see
/// [`retype_fid`](crate::retype::retype_fid)).
///
/// A value that cannot be coerced fails the whole projection; no field is
/// ever silently nulled.
pub fn project(
    feature: &Feature,
    map: &FeatureTypeMap,
    registry: &ConverterRegistry,
    direction: Direction,
) -> Result<Feature> {
    let source = map.source(direction);
    let target = map.target(direction);

    let mut projected = Feature::new(target);
    projected.set_fid(feature.fid().cloned());
    projected.set_geometry(feature.geometry().cloned());

    for (target_index, target_field) in target.fields().enumerate() {
        // a target field outside the mapping stays null; this is how a
        // narrowed exposed type projects back into the wider original type
        let Some(mapping) = map.find_mapping(target_field.name(), direction.reversed()) else {
            continue;
        };
        let source_name = mapping.name(direction.reversed());
        let value = source
            .field_index(source_name)
            .and_then(|i| feature.field(i));
        if let Some(value) = value {
            let coerced = registry.convert(value, target_field.field_type())?;
            projected.set_field(target_index, Some(coerced));
        }
    }

    Ok(projected)
}
