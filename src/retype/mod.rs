//! The schema-retyping core: mapping table, predicate and identifier
//! rewriting, feature projection, and the read/write decorators.

pub use crate::retype::fid::retype_fid;
pub use crate::retype::filter::retype_filter;
pub use crate::retype::map::{Direction, FeatureTypeMap, FieldMapping};
pub use crate::retype::project::project;
pub use crate::retype::reader::RetypingReader;
pub use crate::retype::source::{retype, Retyped, RetypingSource};
pub use crate::retype::store::RetypingStore;

mod fid;
mod filter;
mod map;
mod project;
mod reader;
mod source;
mod store;
