//! A self-contained in-memory [`FeatureStore`].
//!
//! This backend exists so the retyping decorators can be exercised
//! end-to-end without an external store, and it doubles as a reference
//! implementation of the backend traits. Spatial predicates are evaluated on
//! bounding rectangles only; that is a simplification of this test backend,
//! not of the retyping layer, which never evaluates filters at all.

use std::cmp::Ordering;

use geo_types::{Coord, Geometry, Rect};

use crate::backend::{FeatureReader, FeatureSource, FeatureStore, Transaction};
use crate::defn::Defn;
use crate::errors::{RetypeError, Result};
use crate::feature::{Feature, FeatureId, FieldValue};
use crate::filter::{CompareOp, Filter, Operand, SpatialOp};

/// In-memory feature store over a single feature type.
pub struct MemoryStore {
    defn: Defn,
    features: Vec<Feature>,
    next_id: u64,
    transaction: Transaction,
}

impl MemoryStore {
    pub fn new(defn: Defn) -> MemoryStore {
        MemoryStore {
            defn,
            features: Vec::new(),
            next_id: 1,
            transaction: Transaction::Auto,
        }
    }

    fn next_fid(&mut self) -> FeatureId {
        let fid = FeatureId::new(self.defn.name(), &self.next_id.to_string());
        self.next_id += 1;
        fid
    }

    fn matches(&self, feature: &Feature, filter: &Filter) -> bool {
        match filter {
            Filter::Include => true,
            Filter::Exclude => false,
            Filter::And(children) => children.iter().all(|c| self.matches(feature, c)),
            Filter::Or(children) => children.iter().any(|c| self.matches(feature, c)),
            Filter::Not(child) => !self.matches(feature, child),
            Filter::Compare(op, left, right) => {
                match (self.resolve(feature, left), self.resolve(feature, right)) {
                    (Some(l), Some(r)) => compare(l, r, *op),
                    // SQL-style: comparisons against null never match
                    _ => false,
                }
            }
            Filter::Spatial(op, _, geometry) => {
                match (feature.geometry().and_then(bounds), bounds(geometry)) {
                    (Some(feature_rect), Some(filter_rect)) => {
                        spatial(feature_rect, filter_rect, *op)
                    }
                    _ => false,
                }
            }
            Filter::Fids(fids) => feature
                .fid()
                .map(|fid| fids.contains(fid))
                .unwrap_or(false),
        }
    }

    fn resolve<'a>(&self, feature: &'a Feature, operand: &'a Operand) -> Option<&'a FieldValue> {
        match operand {
            Operand::Property(name) => feature.field_by_name(&self.defn, name),
            Operand::Literal(value) => Some(value),
        }
    }
}

impl FeatureSource for MemoryStore {
    fn defn(&self) -> &Defn {
        &self.defn
    }

    fn features(&self, filter: &Filter, _fields: Option<&[String]>) -> Result<FeatureReader<'_>> {
        let matched: Vec<Feature> = self
            .features
            .iter()
            .filter(|f| self.matches(f, filter))
            .cloned()
            .collect();
        Ok(Box::new(matched.into_iter().map(Ok)))
    }

    fn feature_count(&self, filter: &Filter) -> Result<u64> {
        Ok(self
            .features
            .iter()
            .filter(|f| self.matches(f, filter))
            .count() as u64)
    }
}

impl FeatureStore for MemoryStore {
    fn add_features(
        &mut self,
        features: &mut dyn Iterator<Item = Result<Feature>>,
    ) -> Result<Vec<FeatureId>> {
        // drain the input first so a bad feature leaves the store untouched
        let incoming: Vec<Feature> = features.collect::<Result<_>>()?;
        let mut ids = Vec::with_capacity(incoming.len());
        for mut feature in incoming {
            let fid = self.next_fid();
            feature.set_fid(Some(fid.clone()));
            ids.push(fid);
            self.features.push(feature);
        }
        Ok(ids)
    }

    fn remove_features(&mut self, filter: &Filter) -> Result<()> {
        let keep: Vec<bool> = self
            .features
            .iter()
            .map(|f| !self.matches(f, filter))
            .collect();
        let mut keep = keep.into_iter();
        self.features.retain(|_| keep.next().unwrap_or(true));
        Ok(())
    }

    fn modify_features(
        &mut self,
        fields: &[(String, Option<FieldValue>)],
        filter: &Filter,
    ) -> Result<()> {
        let mut indices = Vec::with_capacity(fields.len());
        for (name, _) in fields {
            let index = self.defn.field_index(name).ok_or_else(|| {
                RetypeError::Backend(
                    format!("no field '{}' in '{}'", name, self.defn.name()).into(),
                )
            })?;
            indices.push(index);
        }

        let matched: Vec<usize> = self
            .features
            .iter()
            .enumerate()
            .filter(|(_, f)| self.matches(f, filter))
            .map(|(i, _)| i)
            .collect();
        for i in matched {
            for (slot, (_, value)) in indices.iter().zip(fields) {
                self.features[i].set_field(*slot, value.clone());
            }
        }
        Ok(())
    }

    fn set_features(&mut self, features: &mut dyn Iterator<Item = Result<Feature>>) -> Result<()> {
        let incoming: Vec<Feature> = features.collect::<Result<_>>()?;
        self.features.clear();
        self.next_id = 1;
        for mut feature in incoming {
            let fid = self.next_fid();
            feature.set_fid(Some(fid));
            self.features.push(feature);
        }
        Ok(())
    }

    fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    fn set_transaction(&mut self, transaction: Transaction) {
        self.transaction = transaction;
    }
}

fn compare(left: &FieldValue, right: &FieldValue, op: CompareOp) -> bool {
    let ordering = match (numeric(left), numeric(right)) {
        (Some(l), Some(r)) => l.partial_cmp(&r),
        _ => match (left, right) {
            (FieldValue::StringValue(l), FieldValue::StringValue(r)) => Some(l.cmp(r)),
            (FieldValue::DateValue(l), FieldValue::DateValue(r)) => Some(l.cmp(r)),
            (FieldValue::DateTimeValue(l), FieldValue::DateTimeValue(r)) => Some(l.cmp(r)),
            _ => None,
        },
    };
    match ordering {
        Some(ordering) => match op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        },
        None => false,
    }
}

fn numeric(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::IntegerValue(v) => Some(f64::from(*v)),
        FieldValue::Integer64Value(v) => Some(*v as f64),
        FieldValue::RealValue(v) => Some(*v),
        _ => None,
    }
}

fn spatial(feature: Rect<f64>, filter: Rect<f64>, op: SpatialOp) -> bool {
    match op {
        SpatialOp::Intersects => overlaps(feature, filter),
        SpatialOp::Within => contains(filter, feature),
        SpatialOp::Contains => contains(feature, filter),
    }
}

fn overlaps(a: Rect<f64>, b: Rect<f64>) -> bool {
    a.min().x <= b.max().x
        && b.min().x <= a.max().x
        && a.min().y <= b.max().y
        && b.min().y <= a.max().y
}

fn contains(outer: Rect<f64>, inner: Rect<f64>) -> bool {
    outer.min().x <= inner.min().x
        && outer.min().y <= inner.min().y
        && outer.max().x >= inner.max().x
        && outer.max().y >= inner.max().y
}

/// Bounding rectangle of a geometry, `None` for empty geometries.
fn bounds(geometry: &Geometry<f64>) -> Option<Rect<f64>> {
    let mut acc: Option<(Coord<f64>, Coord<f64>)> = None;
    extend(geometry, &mut acc);
    acc.map(|(min, max)| Rect::new(min, max))
}

fn push(acc: &mut Option<(Coord<f64>, Coord<f64>)>, c: Coord<f64>) {
    match acc {
        Some((min, max)) => {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        None => *acc = Some((c, c)),
    }
}

fn extend(geometry: &Geometry<f64>, acc: &mut Option<(Coord<f64>, Coord<f64>)>) {
    match geometry {
        Geometry::Point(p) => push(acc, p.0),
        Geometry::Line(l) => {
            push(acc, l.start);
            push(acc, l.end);
        }
        Geometry::LineString(ls) => {
            for c in &ls.0 {
                push(acc, *c);
            }
        }
        Geometry::Polygon(p) => {
            for c in &p.exterior().0 {
                push(acc, *c);
            }
            for interior in p.interiors() {
                for c in &interior.0 {
                    push(acc, *c);
                }
            }
        }
        Geometry::MultiPoint(mp) => {
            for p in &mp.0 {
                push(acc, p.0);
            }
        }
        Geometry::MultiLineString(mls) => {
            for ls in &mls.0 {
                for c in &ls.0 {
                    push(acc, *c);
                }
            }
        }
        Geometry::MultiPolygon(mp) => {
            for p in &mp.0 {
                extend(&Geometry::Polygon(p.clone()), acc);
            }
        }
        Geometry::GeometryCollection(gc) => {
            for g in &gc.0 {
                extend(g, acc);
            }
        }
        Geometry::Rect(r) => {
            push(acc, r.min());
            push(acc, r.max());
        }
        Geometry::Triangle(t) => {
            push(acc, t.0);
            push(acc, t.1);
            push(acc, t.2);
        }
    }
}
