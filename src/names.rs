//! XML name utilities
//!
//! Namespaces are not tracked: every reference is reduced to its local
//! part before lookup, so `xs:string` and `string` name the same thing.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

// Simplified NCName production (no colon)
static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\-\.0-9\u{B7}]*$")
        .unwrap()
});

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Strip the namespace prefix from a (possibly) qualified name
///
/// Only the part after the last colon is kept, matching how prefixed
/// references are written in schemas (`xs:string`, `tns:addressType`).
pub fn strip_namespace(name: &str) -> &str {
    match name.rfind(':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid NCName: '{}'", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("element"), (None, "element"));
        assert_eq!(split_qname("xs:element"), (Some("xs"), "element"));
    }

    #[test]
    fn test_strip_namespace() {
        assert_eq!(strip_namespace("xs:string"), "string");
        assert_eq!(strip_namespace("string"), "string");
        assert_eq!(strip_namespace("a:b:c"), "c");
        assert_eq!(strip_namespace(""), "");
    }

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("element"));
        assert!(is_valid_ncname("my-element.v2"));
        assert!(is_valid_ncname("_private"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("prefix:element"));
        assert!(!is_valid_ncname("123element"));
        assert!(!is_valid_ncname("-element"));
    }

    #[test]
    fn test_validate_ncname() {
        assert!(validate_ncname("titleList").is_ok());
        assert!(matches!(validate_ncname("1st"), Err(Error::Name(_))));
    }

    proptest! {
        #[test]
        fn prefixed_and_bare_names_strip_alike(prefix in "[a-z]{1,8}", local in "[A-Za-z_][A-Za-z0-9_]{0,12}") {
            let qualified = format!("{}:{}", prefix, local);
            prop_assert_eq!(strip_namespace(&qualified), strip_namespace(&local));
        }
    }
}
