//! The boundary to the wrapped backend store.
//!
//! The retyping layer decorates anything that can read (and optionally
//! write) features of a single feature type. Everything behind these traits,
//! from storage to query evaluation to transaction semantics, belongs to the
//! backend; the retyping layer only translates the data crossing the
//! boundary.

use crate::defn::Defn;
use crate::errors::Result;
use crate::feature::{Feature, FeatureId, FieldValue};
use crate::filter::Filter;

/// A lazy, forward-only stream of features. Mirrors a single backend
/// cursor: finite iff the backend's is, and not restartable.
pub type FeatureReader<'a> = Box<dyn Iterator<Item = Result<Feature>> + 'a>;

/// Transaction handle, passed through the retyping layer untouched.
///
/// The decorator holds no transaction state of its own; whatever lifecycle
/// the handle implies is entirely the backend's business.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Transaction {
    /// Auto-commit; every operation stands alone.
    #[default]
    Auto,
    /// A named transaction scope managed by the backend.
    Named(String),
}

/// Read capability over one feature type.
pub trait FeatureSource {
    /// The feature type served by this source.
    fn defn(&self) -> &Defn;

    /// Query features matching `filter`. `fields` optionally restricts which
    /// fields the backend needs to materialize; `None` means all.
    fn features(&self, filter: &Filter, fields: Option<&[String]>) -> Result<FeatureReader<'_>>;

    /// Count features matching `filter` without materializing them.
    fn feature_count(&self, filter: &Filter) -> Result<u64>;
}

/// Write capability, extending [`FeatureSource`].
pub trait FeatureStore: FeatureSource {
    /// Append features, returning the ids the backend assigned, in input
    /// order. The input stream may yield errors; the backend must not
    /// swallow them.
    fn add_features(
        &mut self,
        features: &mut dyn Iterator<Item = Result<Feature>>,
    ) -> Result<Vec<FeatureId>>;

    /// Delete all features matching `filter`.
    fn remove_features(&mut self, filter: &Filter) -> Result<()>;

    /// Set the named fields to the given values on every feature matching
    /// `filter`. A `None` value writes a null.
    fn modify_features(
        &mut self,
        fields: &[(String, Option<FieldValue>)],
        filter: &Filter,
    ) -> Result<()>;

    /// Replace the entire contents with the given stream of features.
    fn set_features(&mut self, features: &mut dyn Iterator<Item = Result<Feature>>) -> Result<()>;

    /// The transaction this store currently operates under.
    fn transaction(&self) -> &Transaction;

    /// Associate the store with a transaction.
    fn set_transaction(&mut self, transaction: Transaction);
}

/// Declares up front whether a backend is writable.
///
/// Writeability is an explicit variant rather than a downcast: a
/// read-write decorator can only be built from a `ReadWrite` backend.
pub enum StoreAccess<S> {
    ReadOnly(S),
    ReadWrite(S),
}
