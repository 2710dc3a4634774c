//! Generator configuration

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::limits::Limits;

/// Output language of the emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Go structs with `encoding/xml` tags
    #[default]
    Go,
    /// Rust structs with serde attributes
    Rust,
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "go" => Ok(Self::Go),
            "rust" | "rs" => Ok(Self::Rust),
            other => Err(Error::Unsupported(format!("unknown target '{}'", other))),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Go => f.write_str("go"),
            Self::Rust => f.write_str("rust"),
        }
    }
}

/// What to do when two different definitions share a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Log a warning and carry on
    #[default]
    Warn,
    /// Fail with [`Error::NameCollision`]
    Error,
}

/// Options for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Package (Go) or module (Rust) header; none when `None`
    pub package: Option<String>,
    /// Prefix for generated type names
    pub prefix: String,
    /// Generate exported type names
    pub exported: bool,
    /// Output language
    pub target: Target,
    /// Handling of name collisions
    pub collisions: CollisionPolicy,
    /// Resource limits
    pub limits: Limits,
}

impl GeneratorConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the package/module header
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Set the type name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Toggle exported naming
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Set the output language
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Set the collision policy
    pub fn with_collisions(mut self, policy: CollisionPolicy) -> Self {
        self.collisions = policy;
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::new();
        assert_eq!(config.package, None);
        assert_eq!(config.target, Target::Go);
        assert_eq!(config.collisions, CollisionPolicy::Warn);
        assert!(!config.exported);
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new()
            .with_package("goxsd")
            .with_prefix("xxx")
            .with_exported(true)
            .with_target(Target::Rust)
            .with_collisions(CollisionPolicy::Error)
            .with_limits(Limits::strict());

        assert_eq!(config.package.as_deref(), Some("goxsd"));
        assert_eq!(config.prefix, "xxx");
        assert!(config.exported);
        assert_eq!(config.target, Target::Rust);
        assert_eq!(config.collisions, CollisionPolicy::Error);
        assert_eq!(config.limits, Limits::strict());
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("go".parse::<Target>().unwrap(), Target::Go);
        assert_eq!("Rust".parse::<Target>().unwrap(), Target::Rust);
        assert!("cobol".parse::<Target>().is_err());
        assert_eq!(Target::Rust.to_string(), "rust");
    }
}
