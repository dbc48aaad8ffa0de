use geo_types::Geometry;

use crate::feature::{FeatureId, FieldValue};

/// Comparison operators for [`Filter::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Spatial operators for [`Filter::Spatial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialOp {
    Intersects,
    Within,
    Contains,
}

/// One side of a comparison: a field reference or a literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Reference to a named field of the feature type the filter targets.
    Property(String),
    /// Constant value.
    Literal(FieldValue),
}

impl Operand {
    pub fn property(name: &str) -> Operand {
        Operand::Property(name.to_string())
    }
}

/// A predicate over features of one feature type.
///
/// Filters form a closed tree: logical connectors over comparison, spatial
/// and id leaves. Only [`Operand::Property`] names and the feature type
/// component of [`Filter::Fids`] entries are tied to a particular schema;
/// literals, geometry operands and tree structure are schema-independent.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every feature.
    Include,
    /// Matches no feature.
    Exclude,
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Compare(CompareOp, Operand, Operand),
    /// Spatial predicate between a named geometry-bearing feature and a
    /// geometry literal.
    Spatial(SpatialOp, String, Geometry<f64>),
    /// Matches features whose id is in the set.
    Fids(Vec<FeatureId>),
}

impl Filter {
    /// Convenience constructor for the common `field = literal` case.
    pub fn equals(name: &str, value: FieldValue) -> Filter {
        Filter::Compare(CompareOp::Eq, Operand::property(name), Operand::Literal(value))
    }
}
