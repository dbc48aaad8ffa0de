use std::fmt;

/// Value types a field can declare.
///
/// The set mirrors the OGR field types commonly found in vector backends;
/// anything richer (lists, binary blobs) is out of scope for this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Integer64,
    /// Double precision floating point
    Real,
    /// UTF-8 string
    String,
    /// Calendar date
    Date,
    /// Date and time with offset
    DateTime,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "Integer",
            FieldType::Integer64 => "Integer64",
            FieldType::Real => "Real",
            FieldType::String => "String",
            FieldType::Date => "Date",
            FieldType::DateTime => "DateTime",
        };
        f.write_str(name)
    }
}

/// One field of a feature type: a name and a declared value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefn {
    name: String,
    field_type: FieldType,
}

impl FieldDefn {
    pub fn new(name: &str, field_type: FieldType) -> FieldDefn {
        FieldDefn {
            name: name.to_string(),
            field_type,
        }
    }

    /// Get the name of this field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the declared value type of this field.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// Feature type definition
///
/// Defines the name of a feature type and the ordered fields available on its
/// features. Field order is significant: features carry their values
/// positionally, and consumers may rely on the declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defn {
    name: String,
    fields: Vec<FieldDefn>,
}

impl Defn {
    pub fn new(name: &str, fields: Vec<FieldDefn>) -> Defn {
        Defn {
            name: name.to_string(),
            fields,
        }
    }

    /// Get the feature type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate over the field schema of this feature type.
    pub fn fields(&self) -> FieldIterator<'_> {
        FieldIterator {
            defn: self,
            next_id: 0,
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefn> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the positional index of a named field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

pub struct FieldIterator<'a> {
    defn: &'a Defn,
    next_id: usize,
}

impl<'a> Iterator for FieldIterator<'a> {
    type Item = &'a FieldDefn;

    #[inline]
    fn next(&mut self) -> Option<&'a FieldDefn> {
        let field = self.defn.fields.get(self.next_id)?;
        self.next_id += 1;
        Some(field)
    }
}
