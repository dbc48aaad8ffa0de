use std::sync::Arc;

use crate::backend::{FeatureReader, FeatureSource, FeatureStore, StoreAccess};
use crate::convert::ConverterRegistry;
use crate::defn::Defn;
use crate::errors::Result;
use crate::filter::Filter;
use crate::retype::filter::retype_filter;
use crate::retype::map::{Direction, FeatureTypeMap};
use crate::retype::reader::RetypingReader;
use crate::retype::store::RetypingStore;

/// Read-path decorator: presents a backend [`FeatureSource`] under the
/// exposed feature type of a [`FeatureTypeMap`].
///
/// Filters and field hints are translated to the original schema before
/// delegation; result streams are wrapped so each feature is projected to
/// the exposed schema and its id re-tagged with the exposed type name. The
/// source holds no state beyond the backend handle and the shared immutable
/// map and registry, so one instance may serve many threads.
pub struct RetypingSource<S> {
    pub(crate) wrapped: S,
    pub(crate) map: Arc<FeatureTypeMap>,
    pub(crate) registry: Arc<ConverterRegistry>,
}

impl<S: FeatureSource> RetypingSource<S> {
    pub fn new(
        wrapped: S,
        map: Arc<FeatureTypeMap>,
        registry: Arc<ConverterRegistry>,
    ) -> RetypingSource<S> {
        RetypingSource {
            wrapped,
            map,
            registry,
        }
    }

    /// The map this source translates through.
    pub fn map(&self) -> &FeatureTypeMap {
        &self.map
    }

    /// Access to the wrapped backend.
    pub fn backend(&self) -> &S {
        &self.wrapped
    }

    pub(crate) fn retype_fields(&self, fields: Option<&[String]>) -> Result<Option<Vec<String>>> {
        fields
            .map(|names| {
                names
                    .iter()
                    .map(|name| self.map.original_name(name).map(str::to_string))
                    .collect()
            })
            .transpose()
    }
}

impl<S: FeatureSource> FeatureSource for RetypingSource<S> {
    fn defn(&self) -> &Defn {
        self.map.exposed()
    }

    fn features(&self, filter: &Filter, fields: Option<&[String]>) -> Result<FeatureReader<'_>> {
        let original_filter = retype_filter(filter, &self.map, Direction::ToOriginal)?;
        let original_fields = self.retype_fields(fields)?;
        let backend_reader = self
            .wrapped
            .features(&original_filter, original_fields.as_deref())?;
        Ok(Box::new(RetypingReader::new(
            backend_reader,
            Arc::clone(&self.map),
            Arc::clone(&self.registry),
            Direction::ToExposed,
        )))
    }

    fn feature_count(&self, filter: &Filter) -> Result<u64> {
        let original_filter = retype_filter(filter, &self.map, Direction::ToOriginal)?;
        self.wrapped.feature_count(&original_filter)
    }
}

/// A retyped backend: read-only or read-write, decided by the
/// [`StoreAccess`] variant of the backend handed in.
pub enum Retyped<S> {
    Source(RetypingSource<S>),
    Store(RetypingStore<S>),
}

/// Decorates a backend with the given map. A [`RetypingStore`] is built only
/// when the backend declares itself writable.
pub fn retype<S: FeatureStore>(
    access: StoreAccess<S>,
    map: Arc<FeatureTypeMap>,
    registry: Arc<ConverterRegistry>,
) -> Retyped<S> {
    match access {
        StoreAccess::ReadOnly(backend) => {
            Retyped::Source(RetypingSource::new(backend, map, registry))
        }
        StoreAccess::ReadWrite(backend) => {
            Retyped::Store(RetypingStore::new(backend, map, registry))
        }
    }
}
