use std::sync::Arc;

use crate::convert::ConverterRegistry;
use crate::errors::Result;
use crate::feature::Feature;
use crate::retype::fid::retype_fid;
use crate::retype::map::{Direction, FeatureTypeMap};
use crate::retype::project::project;

/// Lazy adapter over a stream of features that projects each one across a
/// [`FeatureTypeMap`] and re-tags its id with the target type name.
///
/// Like the backend cursor it wraps, the reader is forward-only and not
/// restartable. Errors from the underlying stream pass through unchanged;
/// a feature that fails projection yields the failure and nothing
/// half-projected.
pub struct RetypingReader<I> {
    inner: I,
    map: Arc<FeatureTypeMap>,
    registry: Arc<ConverterRegistry>,
    direction: Direction,
}

impl<I> RetypingReader<I>
where
    I: Iterator<Item = Result<Feature>>,
{
    pub fn new(
        inner: I,
        map: Arc<FeatureTypeMap>,
        registry: Arc<ConverterRegistry>,
        direction: Direction,
    ) -> RetypingReader<I> {
        RetypingReader {
            inner,
            map,
            registry,
            direction,
        }
    }

    fn retype(&self, feature: &Feature) -> Result<Feature> {
        let mut projected = project(feature, &self.map, &self.registry, self.direction)?;
        if let Some(fid) = feature.fid() {
            let from = self.map.source(self.direction).name();
            let to = self.map.target(self.direction).name();
            projected.set_fid(Some(retype_fid(fid, from, to)?));
        }
        Ok(projected)
    }
}

impl<I> Iterator for RetypingReader<I>
where
    I: Iterator<Item = Result<Feature>>,
{
    type Item = Result<Feature>;

    #[inline]
    fn next(&mut self) -> Option<Result<Feature>> {
        match self.inner.next()? {
            Ok(feature) => Some(self.retype(&feature)),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defn::{Defn, FieldDefn, FieldType};
    use crate::errors::RetypeError;
    use crate::feature::{FeatureId, FieldValue};

    fn parcel_map() -> Arc<FeatureTypeMap> {
        let exposed = Defn::new("Parcel", vec![FieldDefn::new("owner", FieldType::String)]);
        let original = Defn::new(
            "PARCEL_TBL",
            vec![FieldDefn::new("OWNER_NAME", FieldType::String)],
        );
        Arc::new(
            FeatureTypeMap::new(
                exposed,
                original,
                &[("owner", "OWNER_NAME")],
                &ConverterRegistry::default(),
            )
            .unwrap(),
        )
    }

    fn stored(owner: &str, local: &str) -> Feature {
        Feature::with_fields(
            Some(FeatureId::new("PARCEL_TBL", local)),
            vec![Some(FieldValue::StringValue(owner.to_string()))],
            None,
        )
    }

    #[test]
    fn test_projects_and_retags_each_feature() {
        let map = parcel_map();
        let registry = Arc::new(ConverterRegistry::default());
        let backend = vec![Ok(stored("Alice", "1")), Ok(stored("Bob", "2"))];

        let reader = RetypingReader::new(
            backend.into_iter(),
            map,
            registry,
            Direction::ToExposed,
        );
        let features: Vec<Feature> = reader.collect::<Result<_>>().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].fid().unwrap().to_string(), "Parcel.1");
        assert_eq!(
            features[1].field(0),
            Some(&FieldValue::StringValue("Bob".to_string()))
        );
    }

    #[test]
    fn test_backend_errors_pass_through() {
        let map = parcel_map();
        let registry = Arc::new(ConverterRegistry::default());
        let backend: Vec<Result<Feature>> = vec![
            Ok(stored("Alice", "1")),
            Err(RetypeError::Backend("cursor gone".into())),
        ];

        let mut reader = RetypingReader::new(
            backend.into_iter(),
            map,
            registry,
            Direction::ToExposed,
        );
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, RetypeError::Backend(_)));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_is_lazy() {
        let map = parcel_map();
        let registry = Arc::new(ConverterRegistry::default());
        // an unbounded backend stream can still be consumed incrementally
        let backend = std::iter::repeat_with(|| Ok(stored("Alice", "1")));

        let mut reader = RetypingReader::new(backend, map, registry, Direction::ToExposed);
        for _ in 0..3 {
            assert!(reader.next().unwrap().is_ok());
        }
    }
}
