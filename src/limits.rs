//! Limits and constraints for schema processing
//!
//! These ceilings keep a hostile or broken schema set from exhausting
//! memory or the stack. Oversized documents, deeply nested XML, runaway
//! import chains and deep type nesting fail with
//! [`Error::LimitExceeded`](crate::Error::LimitExceeded) before any
//! recursive pass gets to see them.

use crate::error::{Error, Result};

/// Resource limits for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum size of a single schema document in bytes
    pub max_document_size: usize,

    /// Maximum element nesting depth of a schema document
    pub max_xml_depth: usize,

    /// Maximum length of an import/include chain from the entry document
    pub max_import_depth: usize,

    /// Maximum nesting of elements and named types during resolution
    pub max_resolution_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_document_size: 100 * 1024 * 1024, // 100 MB
            max_xml_depth: 1000,
            max_import_depth: 100,
            max_resolution_depth: 256,
        }
    }
}

impl Limits {
    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_document_size: 10 * 1024 * 1024, // 10 MB
            max_xml_depth: 100,
            max_import_depth: 20,
            max_resolution_depth: 64,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_document_size: 1024 * 1024 * 1024, // 1 GB
            max_xml_depth: 4096,
            max_import_depth: 1000,
            max_resolution_depth: 4096,
        }
    }

    /// Check if a document size is within limits
    pub fn check_document_size(&self, size: usize) -> Result<()> {
        if size > self.max_document_size {
            Err(Error::LimitExceeded(format!(
                "document size {} bytes exceeds maximum {} bytes",
                size, self.max_document_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if an XML nesting depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML nesting depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if an import chain depth is within limits
    pub fn check_import_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_import_depth {
            Err(Error::LimitExceeded(format!(
                "import depth {} exceeds maximum {}",
                depth, self.max_import_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a resolution depth is within limits
    pub fn check_resolution_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_resolution_depth {
            Err(Error::LimitExceeded(format!(
                "type nesting depth {} exceeds maximum {}",
                depth, self.max_resolution_depth
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert!(limits.check_document_size(1024).is_ok());
        assert!(limits.check_import_depth(100).is_ok());
        assert!(limits.check_import_depth(101).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.check_document_size(11 * 1024 * 1024).is_err());
        assert!(limits.check_resolution_depth(64).is_ok());
        assert!(limits.check_resolution_depth(65).is_err());
        assert!(limits.check_xml_depth(100).is_ok());
        assert!(limits.check_xml_depth(101).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.check_document_size(500 * 1024 * 1024).is_ok());
        assert!(limits.check_resolution_depth(1000).is_ok());
    }

    #[test]
    fn test_limit_error_message() {
        let err = Limits::strict().check_import_depth(21).unwrap_err();
        assert_eq!(err.to_string(), "limit exceeded: import depth 21 exceeds maximum 20");
    }
}
