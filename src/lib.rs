//! Schema-retyping decorators for geospatial feature stores.
//!
//! A backend serves features under its native feature type: native field
//! names, order, value types and type name. This crate wraps such a backend
//! so consumers see a different, "exposed" feature type (renamed, reordered
//! and/or narrowed fields), while every read and write is translated back
//! into the backend's native representation. Nothing is stored or cached at
//! this layer.
//!
//! ## Use
//!
//! ```
//! use std::sync::Arc;
//! use georetype::{
//!     ConverterRegistry, Defn, Feature, FeatureSource, FeatureTypeMap, FieldDefn, FieldType,
//!     FieldValue, Filter, MemoryStore, RetypingStore,
//! };
//!
//! let original = Defn::new(
//!     "PARCEL_TBL",
//!     vec![
//!         FieldDefn::new("OWNER_NAME", FieldType::String),
//!         FieldDefn::new("AREA_SQM", FieldType::Real),
//!     ],
//! );
//! let exposed = Defn::new("Parcel", vec![FieldDefn::new("owner", FieldType::String)]);
//!
//! let registry = Arc::new(ConverterRegistry::default());
//! let map = Arc::new(
//!     FeatureTypeMap::new(exposed, original.clone(), &[("owner", "OWNER_NAME")], &registry)
//!         .unwrap(),
//! );
//!
//! let mut store = RetypingStore::new(MemoryStore::new(original), map.clone(), registry);
//!
//! let mut parcel = Feature::new(map.exposed());
//! parcel.set_field(0, Some(FieldValue::StringValue("Alice".to_string())));
//! let ids = store.add_features(vec![parcel]).unwrap();
//! assert_eq!(ids[0].to_string(), "Parcel.1");
//!
//! for feature in store.features(&Filter::Include, None).unwrap() {
//!     let owner = feature.unwrap().field(0).cloned().unwrap().into_string().unwrap();
//!     assert_eq!(owner, "Alice");
//! }
//! ```

pub mod errors;

pub use crate::backend::{FeatureReader, FeatureSource, FeatureStore, StoreAccess, Transaction};
pub use crate::convert::{Converter, ConverterRegistry};
pub use crate::defn::{Defn, FieldDefn, FieldIterator, FieldType};
pub use crate::feature::{Feature, FeatureId, FieldValue};
pub use crate::filter::{CompareOp, Filter, Operand, SpatialOp};
pub use crate::memory::MemoryStore;
pub use crate::retype::{
    project, retype, retype_fid, retype_filter, Direction, FeatureTypeMap, FieldMapping, Retyped,
    RetypingReader, RetypingSource, RetypingStore,
};

mod backend;
mod convert;
mod defn;
mod feature;
mod filter;
mod memory;
mod retype;
