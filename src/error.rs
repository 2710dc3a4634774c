//! Error types for xsdgen
//!
//! Every failure is fatal for the run: nothing is retried and no partial
//! output is produced. The variants group into I/O problems, malformed
//! input, unsupported schema constructs, cyclic type graphs and name
//! collisions.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the xsdgen Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsdgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// Schema document could not be mapped onto the schema model
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Resource loading error (missing or unreadable schema file)
    #[error("resource error: {0}")]
    Resource(String),

    /// XML syntax error
    #[error("XML error: {0}")]
    Xml(String),

    /// Unknown or undecodable character encoding
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Name error (invalid XML name)
    #[error("name error: {0}")]
    Name(String),

    /// Schema construct outside what the resolver supports
    #[error("unsupported construct: {0}")]
    Unsupported(String),

    /// A type or element refers back to itself during expansion
    #[error("cyclic type definition: {}", format_chain(.chain, .name))]
    CyclicType {
        /// Name that was re-entered
        name: String,
        /// Names being expanded when the cycle was found, outermost first
        chain: Vec<String>,
    },

    /// Two structurally different definitions share one unqualified name
    #[error("name collision: {kind} '{name}' is defined more than once with different content")]
    NameCollision {
        /// What kind of component collided
        kind: ComponentKind,
        /// The shared name
        name: String,
    },

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Output formatting failure
    #[error("emit error: {0}")]
    Emit(#[from] fmt::Error),

    /// Intermediate tree could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_chain(chain: &[String], name: &str) -> String {
    let mut parts: Vec<&str> = chain.iter().map(String::as_str).collect();
    parts.push(name);
    parts.join(" -> ")
}

/// Kind of named schema component, used in collision reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Named complex type
    ComplexType,
    /// Named simple type
    SimpleType,
    /// Top-level element declaration
    Element,
    /// Emitted declaration
    Declaration,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComplexType => write!(f, "complex type"),
            Self::SimpleType => write!(f, "simple type"),
            Self::Element => write!(f, "element"),
            Self::Declaration => write!(f, "declaration"),
        }
    }
}

/// Error raised while mapping an XML tree onto the schema model
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// What is wrong
    pub message: String,
    /// Schema file being read, attached by the loader
    pub file: Option<PathBuf>,
    /// Top-level component that contained the problem, e.g. `complexType 'bookType'`
    pub component: Option<String>,
}

impl ParseError {
    /// Create a parse error with no context attached
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            component: None,
        }
    }

    /// Attach the schema file; an existing file is kept
    pub fn in_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file.get_or_insert_with(|| file.into());
        self
    }

    /// Attach the enclosing top-level component; the innermost one is kept
    pub fn in_component(mut self, component: impl Into<String>) -> Self {
        self.component.get_or_insert_with(|| component.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}: ", file.display())?;
        }
        f.write_str(&self.message)?;
        match &self.component {
            Some(component) => write!(f, " (in {})", component),
            None => Ok(()),
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_context() {
        let err = ParseError::new("complexContent needs an extension or a restriction")
            .in_component("complexType 'bookType'")
            .in_file("library.xsd");

        assert_eq!(
            err.to_string(),
            "library.xsd: complexContent needs an extension or a restriction (in complexType 'bookType')"
        );
    }

    #[test]
    fn test_parse_error_keeps_first_context() {
        let err = ParseError::new("bad occurs")
            .in_file("inner.xsd")
            .in_file("outer.xsd");
        assert_eq!(err.file.as_deref(), Some(std::path::Path::new("inner.xsd")));
        assert_eq!(err.to_string(), "inner.xsd: bad occurs");
    }

    #[test]
    fn test_cyclic_error_shows_chain() {
        let err = Error::CyclicType {
            name: "nodeType".to_string(),
            chain: vec!["treeType".to_string(), "nodeType".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "cyclic type definition: treeType -> nodeType -> nodeType"
        );
    }

    #[test]
    fn test_collision_display() {
        let err = Error::NameCollision {
            kind: ComponentKind::ComplexType,
            name: "addressType".to_string(),
        };
        assert!(err.to_string().contains("complex type 'addressType'"));
    }

    #[test]
    fn test_parse_error_converts() {
        let err: Error = ParseError::new("empty schema").into();
        assert!(matches!(err, Error::Parse(ref pe) if pe.message == "empty schema"));
        assert_eq!(err.to_string(), "parse error: empty schema");
    }
}
