//! Schema document model
//!
//! A passive, owned representation of one parsed XSD file. Nothing here
//! resolves references; names are stored exactly as written (prefixes
//! included) and the registry/builder strip them at lookup time.
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/

pub mod builtins;
pub mod parsing;

pub use builtins::ScalarType;
pub use parsing::parse_schema;

/// One parsed schema file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDocument {
    /// Target namespace, or the default `xmlns` when none is declared
    pub namespace: String,
    /// Locations of imported and included documents, relative to this one
    pub imports: Vec<Import>,
    /// Top-level element declarations
    pub elements: Vec<ElementDecl>,
    /// Named complex type definitions
    pub complex_types: Vec<ComplexTypeDef>,
    /// Named simple type definitions
    pub simple_types: Vec<SimpleTypeDef>,
}

/// `xs:import` or `xs:include` of another document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Value of `schemaLocation`, if present
    pub location: Option<String>,
    /// Value of `namespace` (imports only)
    pub namespace: Option<String>,
}

/// Upper occurrence bound of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    /// A finite bound
    Bounded(u32),
    /// `maxOccurs="unbounded"`
    Unbounded,
}

/// Occurrence bounds (`minOccurs` / `maxOccurs`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Lower bound
    pub min: u32,
    /// Upper bound
    pub max: MaxOccurs,
}

impl Default for Occurs {
    fn default() -> Self {
        Self {
            min: 1,
            max: MaxOccurs::Bounded(1),
        }
    }
}

impl Occurs {
    /// Only an unbounded maximum marks repetition; `maxOccurs="5"` does not
    pub fn is_list(&self) -> bool {
        self.max == MaxOccurs::Unbounded
    }
}

/// An `xs:element` declaration, top-level or local
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementDecl {
    /// Element name (empty for pure references)
    pub name: String,
    /// `ref` to a top-level element
    pub reference: Option<String>,
    /// `type` reference
    pub type_name: Option<String>,
    /// Occurrence bounds
    pub occurs: Occurs,
    /// Inline anonymous complex type
    pub complex_type: Option<Box<ComplexTypeDef>>,
    /// Inline anonymous simple type
    pub simple_type: Option<SimpleTypeDef>,
}

/// The single source of type information an element declaration uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementContent<'a> {
    /// Named type reference
    TypeRef(&'a str),
    /// Inline complex type
    InlineComplex(&'a ComplexTypeDef),
    /// Inline simple type
    InlineSimple(&'a SimpleTypeDef),
    /// No type information at all
    Empty,
}

impl ElementDecl {

    /// Pick the type source, in priority order: reference, inline complex,
    /// inline simple, nothing
    pub fn content(&self) -> ElementContent<'_> {
        if let Some(type_name) = self.type_name.as_deref().filter(|t| !t.is_empty()) {
            ElementContent::TypeRef(type_name)
        } else if let Some(ct) = &self.complex_type {
            ElementContent::InlineComplex(&**ct)
        } else if let Some(st) = &self.simple_type {
            ElementContent::InlineSimple(st)
        } else {
            ElementContent::Empty
        }
    }
}

/// An `xs:complexType` definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexTypeDef {
    /// Type name (empty for inline types)
    pub name: String,
    /// Child element particles, flattened in document order
    pub sequence: Vec<ElementDecl>,
    /// Attribute declarations
    pub attributes: Vec<AttributeDecl>,
    /// Derivation through complexContent or simpleContent
    pub content: Option<ContentModel>,
}

/// Derived content of a complex type
#[derive(Debug, Clone, PartialEq)]
pub enum ContentModel {
    /// `xs:complexContent`
    Complex(Derivation),
    /// `xs:simpleContent`
    Simple(Derivation),
}

/// How a type derives from its base
#[derive(Debug, Clone, PartialEq)]
pub enum Derivation {
    /// `xs:extension`: adds particles and attributes to the base
    Extension(Extension),
    /// `xs:restriction`: passes the base through
    Restriction(Restriction),
}

impl Derivation {
    /// Name of the base type
    pub fn base(&self) -> &str {
        match self {
            Self::Extension(ext) => &ext.base,
            Self::Restriction(r) => &r.base,
        }
    }
}

/// `xs:extension`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extension {
    /// Base type name
    pub base: String,
    /// Additional child particles
    pub sequence: Vec<ElementDecl>,
    /// Additional attributes
    pub attributes: Vec<AttributeDecl>,
}

/// `xs:restriction`
///
/// Facets are not represented.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restriction {
    /// Base type name
    pub base: String,
}

/// An `xs:simpleType` definition
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleTypeDef {
    /// Type name (empty for inline types)
    pub name: String,
    /// Variety
    pub derivation: SimpleDerivation,
}

/// Variety of a simple type
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleDerivation {
    /// `xs:restriction base="..."`
    Restriction(Restriction),
    /// `xs:list`: whitespace separated items, carried as text
    List,
    /// `xs:union`: carried as text
    Union,
}

impl SimpleTypeDef {
    /// Simple type restricting `base`
    pub fn restriction(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            derivation: SimpleDerivation::Restriction(Restriction { base: base.into() }),
        }
    }
}

/// Attribute `use`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeUse {
    /// `use="optional"` (the default)
    #[default]
    Optional,
    /// `use="required"`
    Required,
    /// `use="prohibited"`
    Prohibited,
}

impl AttributeUse {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "optional" => Some(Self::Optional),
            "required" => Some(Self::Required),
            "prohibited" => Some(Self::Prohibited),
            _ => None,
        }
    }
}

/// An `xs:attribute` declaration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeDecl {
    /// Attribute name
    pub name: String,
    /// `type` reference
    pub type_name: Option<String>,
    /// Inline anonymous simple type
    pub simple_type: Option<SimpleTypeDef>,
    /// Usage marker
    pub usage: AttributeUse,
}

impl AttributeDecl {
    /// Attribute of the given type
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }
}
