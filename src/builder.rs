//! Tree builder
//!
//! Resolves element declarations against the [`TypeRegistry`] into the
//! intermediate tree. Each declaration gets its type from exactly one
//! source, in priority order: an element reference, a named type, an
//! inline complex type, an inline simple type, or nothing at all.
//!
//! Derivation is additive. An extension resolves its base and composes
//! its own particles and attributes on top; a simple-content restriction
//! passes its base through unchanged. Restriction of complex content is
//! not supported.
//!
//! Recursion is guarded by the stack of named components currently being
//! expanded. Re-entering one of them is reported as
//! [`Error::CyclicType`] instead of recursing forever. Element nesting,
//! anonymous types included, counts toward the same depth limit as named
//! types.

use tracing::trace;

use crate::error::{ComponentKind, Error, Result};
use crate::ir::{compose, Attribute, Element, Shape};
use crate::limits::Limits;
use crate::registry::{TypeDef, TypeRegistry};
use crate::schema::{
    AttributeDecl, ComplexTypeDef, ContentModel, Derivation, ElementContent, ElementDecl,
    ScalarType, SimpleDerivation, SimpleTypeDef,
};

/// Builds intermediate trees from registered declarations
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    registry: &'a TypeRegistry,
    limits: Limits,
    /// Named components being expanded, outermost first
    expanding: Vec<(ComponentKind, String)>,
    /// Element declarations being resolved
    nesting: usize,
}

impl<'a> TreeBuilder<'a> {
    /// Create a builder over a populated registry
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            limits: Limits::default(),
            expanding: Vec::new(),
            nesting: 0,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build one tree per top-level element, in document order
    pub fn build(&mut self) -> Result<Vec<Element>> {
        let registry = self.registry;
        registry
            .roots()
            .iter()
            .map(|root| self.build_element(root))
            .collect()
    }

    /// Resolve a single element declaration
    pub fn build_element(&mut self, decl: &'a ElementDecl) -> Result<Element> {
        self.limits.check_resolution_depth(self.depth() + 1)?;
        self.nesting += 1;
        let result = self.resolve_element(decl);
        self.nesting -= 1;
        result
    }

    fn resolve_element(&mut self, decl: &'a ElementDecl) -> Result<Element> {
        let list = decl.occurs.is_list();
        trace!(element = %decl.name, list, depth = self.depth(), "resolving element");

        if let Some(reference) = &decl.reference {
            let registry = self.registry;
            let target = registry.find_element(reference).ok_or_else(|| {
                Error::Unsupported(format!("reference to unknown element '{}'", reference))
            })?;
            // the referencing site decides the cardinality
            let shape = self.guarded(ComponentKind::Element, &target.name, |b| {
                b.shape_of_declaration(target)
            })?;
            return Ok(Element::from_shape(&target.name, list, shape));
        }

        let shape = self.shape_of_declaration(decl)?;
        Ok(Element::from_shape(&decl.name, list, shape))
    }

    fn shape_of_declaration(&mut self, decl: &'a ElementDecl) -> Result<Shape> {
        match decl.content() {
            ElementContent::TypeRef(name) => self.shape_of_type(name),
            ElementContent::InlineComplex(ct) => self.expand_complex(ct),
            ElementContent::InlineSimple(st) => Ok(Shape::scalar(self.simple_scalar(st)?)),
            ElementContent::Empty => Ok(Shape::default()),
        }
    }

    /// Shape of a named type reference
    fn shape_of_type(&mut self, name: &str) -> Result<Shape> {
        let registry = self.registry;
        match registry.find_type(name) {
            TypeDef::Complex(ct) => {
                self.guarded(ComponentKind::ComplexType, &ct.name, |b| b.expand_complex(ct))
            }
            TypeDef::Simple(st) => Ok(Shape::scalar(self.simple_scalar(st)?)),
            TypeDef::Primitive(scalar) => Ok(Shape::scalar(scalar)),
        }
    }

    /// Expand a complex type into its shape
    fn expand_complex(&mut self, ct: &'a ComplexTypeDef) -> Result<Shape> {
        let own = Shape {
            scalar: None,
            attributes: self.resolve_attributes(&ct.attributes)?,
            children: self.build_children(&ct.sequence)?,
        };

        let derivation = match &ct.content {
            None => return Ok(own),
            Some(ContentModel::Complex(Derivation::Restriction(r))) => {
                return Err(Error::Unsupported(format!(
                    "restriction on complex content (type '{}', base '{}')",
                    display_name(&ct.name),
                    r.base
                )));
            }
            Some(ContentModel::Complex(d)) | Some(ContentModel::Simple(d)) => d,
        };

        let base = self.shape_of_type(derivation.base())?;
        let derived = match derivation {
            Derivation::Extension(ext) => compose(
                base,
                Shape {
                    scalar: None,
                    attributes: self.resolve_attributes(&ext.attributes)?,
                    children: self.build_children(&ext.sequence)?,
                },
            ),
            Derivation::Restriction(_) => base,
        };

        Ok(compose(derived, own))
    }

    fn build_children(&mut self, sequence: &'a [ElementDecl]) -> Result<Vec<Element>> {
        sequence.iter().map(|child| self.build_element(child)).collect()
    }

    fn resolve_attributes(&mut self, attributes: &'a [AttributeDecl]) -> Result<Vec<Attribute>> {
        attributes
            .iter()
            .map(|attr| self.resolve_attribute(attr))
            .collect()
    }

    /// Resolve an attribute's value type; untyped attributes are strings
    fn resolve_attribute(&mut self, attr: &'a AttributeDecl) -> Result<Attribute> {
        let registry = self.registry;
        let scalar = match (attr.type_name.as_deref(), &attr.simple_type) {
            (Some(type_name), _) if !type_name.is_empty() => match registry.find_type(type_name) {
                TypeDef::Primitive(scalar) => scalar,
                TypeDef::Simple(st) => self.simple_scalar(st)?,
                TypeDef::Complex(ct) => {
                    return Err(Error::Unsupported(format!(
                        "attribute '{}' has complex type '{}'",
                        attr.name, ct.name
                    )));
                }
            },
            (_, Some(st)) => self.simple_scalar(st)?,
            _ => ScalarType::String,
        };
        Ok(Attribute::new(&attr.name, scalar))
    }

    /// Follow a simple type's restriction chain down to its scalar
    fn simple_scalar(&mut self, st: &'a SimpleTypeDef) -> Result<ScalarType> {
        if st.name.is_empty() {
            self.resolve_simple(st)
        } else {
            self.guarded(ComponentKind::SimpleType, &st.name, |b| b.resolve_simple(st))
        }
    }

    fn resolve_simple(&mut self, st: &'a SimpleTypeDef) -> Result<ScalarType> {
        let restriction = match &st.derivation {
            SimpleDerivation::List | SimpleDerivation::Union => return Ok(ScalarType::String),
            SimpleDerivation::Restriction(r) => r,
        };

        let registry = self.registry;
        match registry.find_type(&restriction.base) {
            TypeDef::Primitive(scalar) => Ok(scalar),
            TypeDef::Simple(base) => self.simple_scalar(base),
            TypeDef::Complex(ct) => Err(Error::Unsupported(format!(
                "simple type '{}' restricts complex type '{}'",
                display_name(&st.name),
                ct.name
            ))),
        }
    }

    /// Run `f` with `name` pushed on the expansion stack
    fn guarded<T>(
        &mut self,
        kind: ComponentKind,
        name: &str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self
            .expanding
            .iter()
            .any(|(k, n)| *k == kind && n == name)
        {
            return Err(Error::CyclicType {
                name: name.to_string(),
                chain: self.expanding.iter().map(|(_, n)| n.clone()).collect(),
            });
        }
        self.limits.check_resolution_depth(self.depth() + 1)?;

        self.expanding.push((kind, name.to_string()));
        let result = f(self);
        self.expanding.pop();
        result
    }

    /// Current recursion depth: nested elements plus named types
    fn depth(&self) -> usize {
        self.nesting + self.expanding.len()
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "<anonymous>"
    } else {
        name
    }
}
