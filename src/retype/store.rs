use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::backend::{FeatureStore, Transaction};
use crate::convert::ConverterRegistry;
use crate::errors::Result;
use crate::feature::{Feature, FeatureId, FieldValue};
use crate::filter::Filter;
use crate::retype::fid::retype_fid;
use crate::retype::filter::retype_filter;
use crate::retype::map::{Direction, FeatureTypeMap};
use crate::retype::reader::RetypingReader;
use crate::retype::source::RetypingSource;

/// Write-path decorator over a backend [`FeatureStore`].
///
/// Composes a [`RetypingSource`] for the read operations (it derefs to one)
/// and adds the mutations, each translated exposed-to-original before the
/// backend sees it. Transactions pass straight through; the decorator keeps
/// no write state of its own.
pub struct RetypingStore<S> {
    source: RetypingSource<S>,
}

impl<S: FeatureStore> RetypingStore<S> {
    pub fn new(
        wrapped: S,
        map: Arc<FeatureTypeMap>,
        registry: Arc<ConverterRegistry>,
    ) -> RetypingStore<S> {
        RetypingStore {
            source: RetypingSource::new(wrapped, map, registry),
        }
    }

    /// Appends features shaped to the exposed schema. Each one is projected
    /// to the original schema lazily on the way to the backend; a single
    /// failed coercion fails the whole call. The returned ids carry the
    /// exposed type name.
    pub fn add_features<I>(&mut self, features: I) -> Result<Vec<FeatureId>>
    where
        I: IntoIterator<Item = Feature>,
    {
        let mut backend_features = RetypingReader::new(
            features.into_iter().map(Ok),
            Arc::clone(&self.source.map),
            Arc::clone(&self.source.registry),
            Direction::ToOriginal,
        );
        let ids = self.source.wrapped.add_features(&mut backend_features)?;

        let from = self.source.map.original().name();
        let to = self.source.map.exposed().name();
        ids.iter().map(|fid| retype_fid(fid, from, to)).collect()
    }

    /// Deletes every feature matching `filter` (exposed schema).
    pub fn remove_features(&mut self, filter: &Filter) -> Result<()> {
        let original_filter = retype_filter(filter, &self.source.map, Direction::ToOriginal)?;
        self.source.wrapped.remove_features(&original_filter)
    }

    /// Sets the named exposed fields to the given values on every feature
    /// matching `filter`.
    ///
    /// Every name is resolved and every non-null value coerced to the
    /// original field's declared type before the backend is touched; one bad
    /// name or value fails the call with the backend left exactly as it was.
    pub fn modify_features(
        &mut self,
        fields: &[(String, Option<FieldValue>)],
        filter: &Filter,
    ) -> Result<()> {
        let map = &self.source.map;
        let registry = &self.source.registry;

        let mut original_fields = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let mapping = map.mapping_for(name, Direction::ToOriginal)?;
            let original_value = value
                .as_ref()
                .map(|v| registry.convert(v, mapping.original_type()))
                .transpose()?;
            original_fields.push((mapping.original().to_string(), original_value));
        }
        let original_filter = retype_filter(filter, map, Direction::ToOriginal)?;

        self.source
            .wrapped
            .modify_features(&original_fields, &original_filter)
    }

    /// Replaces the backend contents with the given stream of
    /// exposed-schema features, translating on the fly; nothing is
    /// materialized at this layer.
    pub fn set_features(
        &mut self,
        features: &mut dyn Iterator<Item = Result<Feature>>,
    ) -> Result<()> {
        let mut backend_features = RetypingReader::new(
            features,
            Arc::clone(&self.source.map),
            Arc::clone(&self.source.registry),
            Direction::ToOriginal,
        );
        self.source.wrapped.set_features(&mut backend_features)
    }

    /// The wrapped store's current transaction.
    pub fn transaction(&self) -> &Transaction {
        self.source.wrapped.transaction()
    }

    /// Associates the wrapped store with a transaction.
    pub fn set_transaction(&mut self, transaction: Transaction) {
        self.source.wrapped.set_transaction(transaction);
    }

    /// Mutable access to the wrapped backend.
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.source.wrapped
    }
}

impl<S> Deref for RetypingStore<S> {
    type Target = RetypingSource<S>;

    fn deref(&self) -> &Self::Target {
        &self.source
    }
}

impl<S> DerefMut for RetypingStore<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.source
    }
}
