use crate::defn::FieldType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetypeError {
    /// An exposed field claims an original field that does not exist, or a
    /// filter / modify call names a field absent from the mapping.
    #[error("field '{field_name}' is not mapped in feature type '{type_name}'")]
    UnmappedField {
        field_name: String,
        type_name: String,
    },
    /// Two exposed fields claim the same original field.
    #[error("original field '{field_name}' of '{type_name}' is mapped more than once")]
    DuplicateMapping {
        field_name: String,
        type_name: String,
    },
    /// A field mapping declares a type pairing with no registered conversion.
    #[error("field '{field_name}': no conversion from {from} to {to}")]
    IncompatibleTypes {
        field_name: String,
        from: FieldType,
        to: FieldType,
    },
    /// A feature id tagged with one feature type was handed to an operation
    /// expecting another.
    #[error("feature id '{fid}' does not belong to feature type '{expected}'")]
    FidTypeMismatch { fid: String, expected: String },
    /// A concrete value could not be converted to the target field type.
    #[error("could not convert value '{value}' from {from} to {to}")]
    Coercion {
        value: String,
        from: FieldType,
        to: FieldType,
    },
    /// A failure raised by the wrapped backend, carried through verbatim.
    #[error("{0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = RetypeError> = std::result::Result<T, E>;
