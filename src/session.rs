//! Generation session
//!
//! A `Session` holds everything one run needs: the configuration and the
//! registry built from the loaded documents. Nothing outlives it, so two
//! sessions over the same input always produce the same output.

use std::path::Path;

use tracing::info;

use crate::builder::TreeBuilder;
use crate::config::GeneratorConfig;
use crate::emitters::{emit, emitter_for};
use crate::error::Result;
use crate::ir::Element;
use crate::loaders::SchemaLoader;
use crate::registry::TypeRegistry;
use crate::documents::Document;
use crate::schema::{parse_schema, SchemaDocument};

/// One generation run
#[derive(Debug)]
pub struct Session {
    config: GeneratorConfig,
    registry: TypeRegistry,
}

impl Session {
    /// Load an entry schema and everything it imports
    pub fn load(entry: impl AsRef<Path>, config: GeneratorConfig) -> Result<Self> {
        let entry = entry.as_ref();
        let documents = SchemaLoader::new()
            .with_limits(config.limits.clone())
            .load(entry)?;
        info!(entry = %entry.display(), documents = documents.len(), "loaded schemas");
        Self::from_documents(&documents, config)
    }

    /// Start a session over already parsed documents
    pub fn from_documents(documents: &[SchemaDocument], config: GeneratorConfig) -> Result<Self> {
        let registry = TypeRegistry::from_documents(documents, config.collisions)?;
        Ok(Self { config, registry })
    }

    /// Start a session over a single in-memory schema
    pub fn from_xsd(xsd: &str, config: GeneratorConfig) -> Result<Self> {
        config.limits.check_document_size(xsd.len())?;
        let document = Document::parse_with_limits(xsd, &config.limits)?;
        Self::from_documents(&[parse_schema(&document)?], config)
    }

    /// Configuration of this session
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Registered components
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Resolve every top-level element into an intermediate tree
    pub fn build_tree(&self) -> Result<Vec<Element>> {
        TreeBuilder::new(&self.registry)
            .with_limits(self.config.limits.clone())
            .build()
    }

    /// Resolve and render declarations for the configured target
    pub fn generate(&self) -> Result<String> {
        let forest = self.build_tree()?;
        let emitter = emitter_for(self.config.target);
        let output = emit(&forest, emitter.as_ref(), &self.config)?;
        info!(roots = forest.len(), target = %self.config.target, "generated declarations");
        Ok(output)
    }

    /// Resolve and serialize the intermediate tree as pretty JSON
    pub fn dump_ir(&self) -> Result<String> {
        let forest = self.build_tree()?;
        Ok(serde_json::to_string_pretty(&forest)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CollisionPolicy, Target};
    use crate::error::Error;

    const TAG_ID: &str = r#"<schema>
        <element name="tagId" type="tagReferenceType"/>
        <complexType name="tagReferenceType">
            <simpleContent>
                <extension base="string">
                    <attribute name="type" type="string" use="required"/>
                </extension>
            </simpleContent>
        </complexType>
    </schema>"#;

    #[test]
    fn test_generate_go() {
        let session = Session::from_xsd(TAG_ID, GeneratorConfig::new()).unwrap();
        let out = session.generate().unwrap();
        assert!(out.starts_with("type tagID struct {"));
        assert!(out.contains("TagID string `xml:\",chardata\"`"));
    }

    #[test]
    fn test_generate_rust() {
        let config = GeneratorConfig::new().with_target(Target::Rust);
        let out = Session::from_xsd(TAG_ID, config).unwrap().generate().unwrap();
        assert!(out.contains("struct TagId {"));
    }

    #[test]
    fn test_dump_ir() {
        let session = Session::from_xsd(TAG_ID, GeneratorConfig::new()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&session.dump_ir().unwrap()).unwrap();
        assert_eq!(json[0]["name"], "tagId");
        assert_eq!(json[0]["chardata"], true);
        assert_eq!(json[0]["attributes"][0]["type"], "string");
    }

    #[test]
    fn test_sessions_are_independent() {
        let first = Session::from_xsd(TAG_ID, GeneratorConfig::new()).unwrap();
        let second = Session::from_xsd(TAG_ID, GeneratorConfig::new()).unwrap();
        assert_eq!(first.build_tree().unwrap(), second.build_tree().unwrap());
        assert_eq!(first.generate().unwrap(), first.generate().unwrap());
    }

    #[test]
    fn test_duplicate_root_with_strict_collisions() {
        let xsd = r#"<schema>
            <element name="item" type="string"/>
            <element name="item" type="int"/>
        </schema>"#;
        let config = GeneratorConfig::new().with_collisions(CollisionPolicy::Error);
        assert!(matches!(
            Session::from_xsd(xsd, config),
            Err(Error::NameCollision { .. })
        ));
    }
}
