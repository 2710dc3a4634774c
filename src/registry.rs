//! Type registry
//!
//! Name-keyed tables of every named complex type, simple type and
//! top-level element across the loaded documents. Keys are unqualified:
//! namespace prefixes are stripped from every lookup.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::CollisionPolicy;
use crate::error::{ComponentKind, Error, Result};
use crate::names::strip_namespace;
use crate::schema::{ComplexTypeDef, ElementDecl, ScalarType, SchemaDocument, SimpleTypeDef};

/// Result of a type lookup
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef<'a> {
    /// A registered complex type
    Complex(&'a ComplexTypeDef),
    /// A registered simple type
    Simple(&'a SimpleTypeDef),
    /// A built-in, or an unknown name taken as already resolved
    Primitive(ScalarType),
}

/// Registered schema components of one run
#[derive(Debug, Default)]
pub struct TypeRegistry {
    complex_types: IndexMap<String, ComplexTypeDef>,
    simple_types: IndexMap<String, SimpleTypeDef>,
    elements: IndexMap<String, ElementDecl>,
    roots: Vec<ElementDecl>,
    policy: CollisionPolicy,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Build a registry from loaded documents
    pub fn from_documents(docs: &[SchemaDocument], policy: CollisionPolicy) -> Result<Self> {
        let mut registry = Self::new(policy);
        registry.register(docs)?;
        Ok(registry)
    }

    /// Register every component of `docs`, in order
    ///
    /// Top-level elements also become roots of the intermediate tree, in
    /// document order.
    pub fn register(&mut self, docs: &[SchemaDocument]) -> Result<()> {
        for doc in docs {
            for ct in &doc.complex_types {
                insert(&mut self.complex_types, self.policy, ComponentKind::ComplexType, &ct.name, ct)?;
            }
            for st in &doc.simple_types {
                insert(&mut self.simple_types, self.policy, ComponentKind::SimpleType, &st.name, st)?;
            }
            for element in &doc.elements {
                if element.reference.is_some() {
                    warn!(element = %element.name, "top-level element reference, skipping");
                    continue;
                }
                insert(&mut self.elements, self.policy, ComponentKind::Element, &element.name, element)?;
                self.roots.push(element.clone());
            }
        }

        debug!(
            complex_types = self.complex_types.len(),
            simple_types = self.simple_types.len(),
            elements = self.elements.len(),
            "registered schema components"
        );
        Ok(())
    }

    /// Look up a type by (possibly prefixed) name
    ///
    /// Complex types win over simple types; names in neither table map to
    /// built-in scalars, or pass through verbatim.
    pub fn find_type(&self, reference: &str) -> TypeDef<'_> {
        let name = strip_namespace(reference);
        if let Some(ct) = self.complex_types.get(name) {
            TypeDef::Complex(ct)
        } else if let Some(st) = self.simple_types.get(name) {
            TypeDef::Simple(st)
        } else {
            TypeDef::Primitive(ScalarType::from_local_name(name))
        }
    }

    /// Look up a top-level element by (possibly prefixed) name
    pub fn find_element(&self, reference: &str) -> Option<&ElementDecl> {
        self.elements.get(strip_namespace(reference))
    }

    /// Top-level element declarations, in document order
    pub fn roots(&self) -> &[ElementDecl] {
        &self.roots
    }
}

fn insert<T: Clone + PartialEq>(
    table: &mut IndexMap<String, T>,
    policy: CollisionPolicy,
    kind: ComponentKind,
    name: &str,
    def: &T,
) -> Result<()> {
    match table.get(name) {
        Some(existing) if existing == def => {
            debug!(%kind, name, "identical redefinition, skipping");
            return Ok(());
        }
        Some(_) => match policy {
            CollisionPolicy::Warn => {
                warn!(%kind, name, "redefinition with different content, last one wins");
            }
            CollisionPolicy::Error => {
                return Err(Error::NameCollision {
                    kind,
                    name: name.to_string(),
                });
            }
        },
        None => {}
    }
    table.insert(name.to_string(), def.clone());
    Ok(())
}
