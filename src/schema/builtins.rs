//! XSD built-in types
//!
//! Built-ins collapse onto a handful of target-independent scalar kinds.
//! Each emitter maps those kinds onto its own language's types.

use std::fmt;

use serde::{Serialize, Serializer};

// Type names - String types
/// XSD string type name
pub const XSD_STRING: &str = "string";
/// XSD normalizedString type name
pub const XSD_NORMALIZED_STRING: &str = "normalizedString";
/// XSD token type name
pub const XSD_TOKEN: &str = "token";
/// XSD language type name
pub const XSD_LANGUAGE: &str = "language";
/// XSD Name type name
pub const XSD_NAME: &str = "Name";
/// XSD anyURI type name
pub const XSD_ANY_URI: &str = "anyURI";

/// XSD boolean type name
pub const XSD_BOOLEAN: &str = "boolean";

// Numeric types
/// XSD decimal type name
pub const XSD_DECIMAL: &str = "decimal";
/// XSD float type name
pub const XSD_FLOAT: &str = "float";
/// XSD double type name
pub const XSD_DOUBLE: &str = "double";

// Date/time types
/// XSD duration type name
pub const XSD_DURATION: &str = "duration";
/// XSD dateTime type name
pub const XSD_DATETIME: &str = "dateTime";
/// XSD date type name
pub const XSD_DATE: &str = "date";

/// Integer family (all mapped to one integer kind)
const INTEGER_TYPES: &[&str] = &[
    "integer",
    "int",
    "long",
    "short",
    "byte",
    "nonNegativeInteger",
    "positiveInteger",
    "nonPositiveInteger",
    "negativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
];

/// Everything else whose lexical space is carried as text
const STRING_TYPES: &[&str] = &[
    XSD_STRING,
    XSD_NORMALIZED_STRING,
    XSD_TOKEN,
    XSD_LANGUAGE,
    XSD_NAME,
    XSD_ANY_URI,
    XSD_DURATION,
    XSD_DATETIME,
    XSD_DATE,
    "NCName",
    "ID",
    "IDREF",
    "IDREFS",
    "ENTITY",
    "ENTITIES",
    "NMTOKEN",
    "NMTOKENS",
    "QName",
    "NOTATION",
    "time",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    "hexBinary",
    "base64Binary",
    "anySimpleType",
];

/// Resolved scalar type of an element payload or attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `xs:boolean`
    Boolean,
    /// Any member of the integer family
    Integer,
    /// `xs:decimal`, `xs:float`, `xs:double`
    Float,
    /// Text-valued built-ins (strings, dates, URIs, ...)
    String,
    /// A name the registry does not know, passed through verbatim
    Named(String),
}

impl ScalarType {
    /// Map a built-in local name to its scalar kind
    ///
    /// Returns `None` for names that are not XSD built-ins.
    pub fn from_builtin(local_name: &str) -> Option<Self> {
        if local_name == XSD_BOOLEAN {
            Some(Self::Boolean)
        } else if INTEGER_TYPES.contains(&local_name) {
            Some(Self::Integer)
        } else if matches!(local_name, XSD_DECIMAL | XSD_FLOAT | XSD_DOUBLE) {
            Some(Self::Float)
        } else if STRING_TYPES.contains(&local_name) {
            Some(Self::String)
        } else {
            None
        }
    }

    /// Map a local name, passing unknown names through verbatim
    pub fn from_local_name(local_name: &str) -> Self {
        Self::from_builtin(local_name).unwrap_or_else(|| Self::Named(local_name.to_string()))
    }

    /// Name of the kind as shown in the intermediate tree
    pub fn as_str(&self) -> &str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ScalarType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
