use std::collections::HashMap;

use chrono::NaiveDate;

use crate::defn::FieldType;
use crate::errors::{RetypeError, Result};
use crate::feature::FieldValue;

/// A single value conversion. Returns `None` when this particular value
/// cannot be represented in the target type.
pub type Converter = fn(&FieldValue) -> Option<FieldValue>;

/// Registry of value conversions, keyed by `(source type, target type)`.
///
/// The registry is populated once at startup and then only read; absence of
/// an entry is an ordinary, testable failure mode. Conversions between equal
/// types are implicit and always succeed.
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    converters: HashMap<(FieldType, FieldType), Converter>,
}

impl ConverterRegistry {
    /// An empty registry: only same-type conversions are possible.
    pub fn empty() -> ConverterRegistry {
        ConverterRegistry {
            converters: HashMap::new(),
        }
    }

    /// Registers a conversion, replacing any previous entry for the pair.
    pub fn register(&mut self, from: FieldType, to: FieldType, converter: Converter) {
        self.converters.insert((from, to), converter);
    }

    /// Whether values of `from` can in principle be converted to `to`.
    /// Individual values may still fail (e.g. a non-numeric string to
    /// integer).
    pub fn can_convert(&self, from: FieldType, to: FieldType) -> bool {
        from == to || self.converters.contains_key(&(from, to))
    }

    /// Converts `value` to the target type.
    pub fn convert(&self, value: &FieldValue, to: FieldType) -> Result<FieldValue> {
        let from = value.field_type();
        if from == to {
            return Ok(value.clone());
        }
        self.converters
            .get(&(from, to))
            .and_then(|converter| converter(value))
            .ok_or_else(|| RetypeError::Coercion {
                value: value.to_string(),
                from,
                to,
            })
    }
}

impl Default for ConverterRegistry {
    /// The stock registry: numeric and date widenings, formatting to string,
    /// and fallible parses from string.
    fn default() -> ConverterRegistry {
        let mut registry = ConverterRegistry::empty();

        registry.register(FieldType::Integer, FieldType::Integer64, |v| match v {
            FieldValue::IntegerValue(n) => Some(FieldValue::Integer64Value(i64::from(*n))),
            _ => None,
        });
        registry.register(FieldType::Integer, FieldType::Real, |v| match v {
            FieldValue::IntegerValue(n) => Some(FieldValue::RealValue(f64::from(*n))),
            _ => None,
        });
        registry.register(FieldType::Integer64, FieldType::Integer, |v| match v {
            FieldValue::Integer64Value(n) => {
                i32::try_from(*n).ok().map(FieldValue::IntegerValue)
            }
            _ => None,
        });
        registry.register(FieldType::Integer64, FieldType::Real, |v| match v {
            FieldValue::Integer64Value(n) => Some(FieldValue::RealValue(*n as f64)),
            _ => None,
        });
        registry.register(FieldType::Integer, FieldType::String, to_string_value);
        registry.register(FieldType::Integer64, FieldType::String, to_string_value);
        registry.register(FieldType::Real, FieldType::String, to_string_value);
        registry.register(FieldType::Date, FieldType::String, to_string_value);
        registry.register(FieldType::DateTime, FieldType::String, to_string_value);

        registry.register(FieldType::Date, FieldType::DateTime, |v| match v {
            FieldValue::DateValue(d) => {
                let midnight = d.and_hms_opt(0, 0, 0)?;
                Some(FieldValue::DateTimeValue(midnight.and_utc().fixed_offset()))
            }
            _ => None,
        });
        registry.register(FieldType::DateTime, FieldType::Date, |v| match v {
            FieldValue::DateTimeValue(dt) => Some(FieldValue::DateValue(dt.date_naive())),
            _ => None,
        });

        registry.register(FieldType::String, FieldType::Integer, |v| match v {
            FieldValue::StringValue(s) => s.trim().parse().ok().map(FieldValue::IntegerValue),
            _ => None,
        });
        registry.register(FieldType::String, FieldType::Integer64, |v| match v {
            FieldValue::StringValue(s) => s.trim().parse().ok().map(FieldValue::Integer64Value),
            _ => None,
        });
        registry.register(FieldType::String, FieldType::Real, |v| match v {
            FieldValue::StringValue(s) => s.trim().parse().ok().map(FieldValue::RealValue),
            _ => None,
        });
        registry.register(FieldType::String, FieldType::Date, |v| match v {
            FieldValue::StringValue(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .ok()
                .map(FieldValue::DateValue),
            _ => None,
        });

        registry
    }
}

fn to_string_value(v: &FieldValue) -> Option<FieldValue> {
    Some(FieldValue::StringValue(v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_needs_no_entry() {
        let registry = ConverterRegistry::empty();
        let v = FieldValue::StringValue("x".to_string());
        assert_eq!(registry.convert(&v, FieldType::String).unwrap(), v);
        assert!(registry.can_convert(FieldType::Real, FieldType::Real));
    }

    #[test]
    fn test_missing_entry_is_coercion_error() {
        let registry = ConverterRegistry::empty();
        let err = registry
            .convert(&FieldValue::IntegerValue(42), FieldType::String)
            .unwrap_err();
        match err {
            RetypeError::Coercion { value, from, to } => {
                assert_eq!(value, "42");
                assert_eq!(from, FieldType::Integer);
                assert_eq!(to, FieldType::String);
            }
            other => panic!("expected Coercion, got {other:?}"),
        }
    }

    #[test]
    fn test_stock_widenings() {
        let registry = ConverterRegistry::default();
        assert_eq!(
            registry
                .convert(&FieldValue::IntegerValue(7), FieldType::Integer64)
                .unwrap(),
            FieldValue::Integer64Value(7)
        );
        assert_eq!(
            registry
                .convert(&FieldValue::IntegerValue(7), FieldType::Real)
                .unwrap(),
            FieldValue::RealValue(7.0)
        );
        assert_eq!(
            registry
                .convert(&FieldValue::RealValue(1.5), FieldType::String)
                .unwrap(),
            FieldValue::StringValue("1.5".to_string())
        );
    }

    #[test]
    fn test_narrowing_fails_per_value() {
        let registry = ConverterRegistry::default();
        assert_eq!(
            registry
                .convert(&FieldValue::Integer64Value(7), FieldType::Integer)
                .unwrap(),
            FieldValue::IntegerValue(7)
        );
        // representable in the type pair, not for this value
        let err = registry
            .convert(&FieldValue::Integer64Value(i64::MAX), FieldType::Integer)
            .unwrap_err();
        assert!(matches!(err, RetypeError::Coercion { .. }));
    }

    #[test]
    fn test_string_parses() {
        let registry = ConverterRegistry::default();
        assert_eq!(
            registry
                .convert(
                    &FieldValue::StringValue(" 12 ".to_string()),
                    FieldType::Integer
                )
                .unwrap(),
            FieldValue::IntegerValue(12)
        );
        assert!(registry
            .convert(
                &FieldValue::StringValue("footway".to_string()),
                FieldType::Integer
            )
            .is_err());
        assert_eq!(
            registry
                .convert(
                    &FieldValue::StringValue("2024-05-01".to_string()),
                    FieldType::Date
                )
                .unwrap(),
            FieldValue::DateValue(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
    }

    #[test]
    fn test_date_to_datetime_round_trip() {
        let registry = ConverterRegistry::default();
        let date = FieldValue::DateValue(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let dt = registry.convert(&date, FieldType::DateTime).unwrap();
        assert_eq!(registry.convert(&dt, FieldType::Date).unwrap(), date);
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = ConverterRegistry::empty();
        registry.register(FieldType::Real, FieldType::Integer, |v| match v {
            FieldValue::RealValue(r) if r.fract() == 0.0 => {
                Some(FieldValue::IntegerValue(*r as i32))
            }
            _ => None,
        });
        assert_eq!(
            registry
                .convert(&FieldValue::RealValue(3.0), FieldType::Integer)
                .unwrap(),
            FieldValue::IntegerValue(3)
        );
        assert!(registry
            .convert(&FieldValue::RealValue(3.5), FieldType::Integer)
            .is_err());
    }
}
