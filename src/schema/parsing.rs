//! XSD document parsing
//!
//! Maps a generic [`Document`] tree onto the [`SchemaDocument`] model.
//! Only the constructs the resolver understands are kept; annotations
//! and facets are dropped, and group references are reported and skipped.

use tracing::{debug, warn};

use super::{
    AttributeDecl, AttributeUse, ComplexTypeDef, ContentModel, Derivation, ElementDecl, Extension,
    Import, MaxOccurs, Occurs, Restriction, SchemaDocument, SimpleDerivation, SimpleTypeDef,
};
use crate::documents::{Document, Element};
use crate::error::{Error, ParseError, Result};
use crate::names::{strip_namespace, validate_ncname};

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
    pub const ANY_ATTRIBUTE: &str = "anyAttribute";
    pub const GROUP: &str = "group";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const ANY: &str = "any";
    pub const ANNOTATION: &str = "annotation";
    pub const IMPORT: &str = "import";
    pub const INCLUDE: &str = "include";
    pub const REDEFINE: &str = "redefine";
    pub const NOTATION: &str = "notation";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const BASE: &str = "base";
    pub const USE: &str = "use";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const NAMESPACE: &str = "namespace";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
}

/// Parse a schema from a UTF-8 string
pub fn parse_schema_str(xml: &str) -> Result<SchemaDocument> {
    parse_schema(&Document::parse(xml)?)
}

/// Parse a schema from an already tokenized document
pub fn parse_schema(doc: &Document) -> Result<SchemaDocument> {
    let root = doc
        .root()
        .ok_or_else(|| Error::Parse(ParseError::new("Empty document")))?;

    if root.local_name() != xsd_elements::SCHEMA {
        return Err(Error::Parse(ParseError::new(format!(
            "Expected xs:schema root element, got {}",
            root.local_name()
        ))));
    }

    let mut schema = SchemaDocument {
        namespace: root
            .get_attribute(xsd_attrs::TARGET_NAMESPACE)
            .or_else(|| root.namespaces.get("").map(String::as_str))
            .unwrap_or_default()
            .to_string(),
        ..SchemaDocument::default()
    };

    for child in &root.children {
        parse_schema_child(&mut schema, child)?;
    }

    debug!(
        namespace = %schema.namespace,
        elements = schema.elements.len(),
        complex_types = schema.complex_types.len(),
        simple_types = schema.simple_types.len(),
        "parsed schema document"
    );

    Ok(schema)
}

/// Parse a child element of xs:schema
fn parse_schema_child(schema: &mut SchemaDocument, elem: &Element) -> Result<()> {
    match elem.local_name() {
        xsd_elements::ELEMENT => {
            let decl = parse_element_decl(elem);
            schema.elements.push(within(elem, decl)?);
        }
        xsd_elements::COMPLEX_TYPE => {
            let name = required_name(elem, "Global complexType")?;
            let ct = parse_complex_type(elem, name);
            schema.complex_types.push(within(elem, ct)?);
        }
        xsd_elements::SIMPLE_TYPE => {
            let name = required_name(elem, "Global simpleType")?;
            let st = parse_simple_type(elem, name);
            schema.simple_types.push(within(elem, st)?);
        }
        xsd_elements::IMPORT | xsd_elements::INCLUDE | xsd_elements::REDEFINE => {
            schema.imports.push(Import {
                location: elem.get_attribute(xsd_attrs::SCHEMA_LOCATION).map(str::to_string),
                namespace: elem.get_attribute(xsd_attrs::NAMESPACE).map(str::to_string),
            });
        }
        xsd_elements::ANNOTATION | xsd_elements::NOTATION => {}
        other => {
            warn!(construct = other, "ignoring unsupported top-level schema component");
        }
    }
    Ok(())
}

/// Tag a parse failure with the top-level component it came from
fn within<T>(elem: &Element, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        Error::Parse(pe) => {
            let name = elem.get_attribute(xsd_attrs::NAME).unwrap_or("?");
            Error::Parse(pe.in_component(format!("{} '{}'", elem.local_name(), name)))
        }
        other => other,
    })
}

fn required_name<'a>(elem: &'a Element, what: &str) -> Result<&'a str> {
    let name = elem.get_attribute(xsd_attrs::NAME).ok_or_else(|| {
        Error::Parse(ParseError::new(format!("{} missing 'name' attribute", what)))
    })?;
    validate_ncname(name)?;
    Ok(name)
}

/// Parse an element declaration (global or local)
fn parse_element_decl(elem: &Element) -> Result<ElementDecl> {
    let mut decl = ElementDecl {
        occurs: parse_occurs(elem)?,
        ..ElementDecl::default()
    };

    match (elem.get_attribute(xsd_attrs::NAME), elem.get_attribute(xsd_attrs::REF)) {
        (Some(name), _) => {
            validate_ncname(name)?;
            decl.name = name.to_string();
        }
        (None, Some(reference)) => {
            decl.name = strip_namespace(reference).to_string();
            decl.reference = Some(reference.to_string());
            return Ok(decl);
        }
        (None, None) => {
            return Err(Error::Parse(ParseError::new(
                "Element declaration needs a 'name' or a 'ref' attribute",
            )));
        }
    }

    decl.type_name = elem.get_attribute(xsd_attrs::TYPE).map(str::to_string);

    if let Some(ct) = elem.find_child(xsd_elements::COMPLEX_TYPE) {
        decl.complex_type = Some(Box::new(parse_complex_type(ct, "")?));
    }
    if let Some(st) = elem.find_child(xsd_elements::SIMPLE_TYPE) {
        decl.simple_type = Some(parse_simple_type(st, "")?);
    }

    Ok(decl)
}

/// Parse `minOccurs` / `maxOccurs`
fn parse_occurs(elem: &Element) -> Result<Occurs> {
    let mut occurs = Occurs::default();

    if let Some(min) = elem.get_attribute(xsd_attrs::MIN_OCCURS) {
        occurs.min = min.trim().parse().map_err(|_| {
            Error::Parse(ParseError::new(format!("Invalid minOccurs value '{}'", min)))
        })?;
    }

    if let Some(max) = elem.get_attribute(xsd_attrs::MAX_OCCURS) {
        occurs.max = match max.trim() {
            "unbounded" => MaxOccurs::Unbounded,
            value => MaxOccurs::Bounded(value.parse().map_err(|_| {
                Error::Parse(ParseError::new(format!("Invalid maxOccurs value '{}'", max)))
            })?),
        };
    }

    Ok(occurs)
}

/// Parse a complex type definition; `name` is empty for inline types
fn parse_complex_type(elem: &Element, name: &str) -> Result<ComplexTypeDef> {
    let mut ct = ComplexTypeDef {
        name: name.to_string(),
        ..ComplexTypeDef::default()
    };

    for child in &elem.children {
        match child.local_name() {
            xsd_elements::SEQUENCE | xsd_elements::CHOICE | xsd_elements::ALL => {
                collect_particles(child, &mut ct.sequence, false)?;
            }
            xsd_elements::ATTRIBUTE => ct.attributes.push(parse_attribute_decl(child)?),
            xsd_elements::COMPLEX_CONTENT => {
                ct.content = Some(ContentModel::Complex(parse_derivation(child)?));
            }
            xsd_elements::SIMPLE_CONTENT => {
                ct.content = Some(ContentModel::Simple(parse_derivation(child)?));
            }
            xsd_elements::ANNOTATION | xsd_elements::ANY_ATTRIBUTE => {}
            other => warn_skipped(other, name),
        }
    }

    Ok(ct)
}

/// Flatten the element particles of a model group into `out`
///
/// Nested sequences, choices and `all` groups contribute their elements
/// in document order. An unbounded group makes every element inside it
/// repeatable.
fn collect_particles(model: &Element, out: &mut Vec<ElementDecl>, unbounded: bool) -> Result<()> {
    let unbounded = unbounded || parse_occurs(model)?.is_list();

    for child in &model.children {
        match child.local_name() {
            xsd_elements::ELEMENT => {
                let mut decl = parse_element_decl(child)?;
                if unbounded {
                    decl.occurs.max = MaxOccurs::Unbounded;
                }
                out.push(decl);
            }
            xsd_elements::SEQUENCE | xsd_elements::CHOICE | xsd_elements::ALL => {
                collect_particles(child, out, unbounded)?;
            }
            xsd_elements::ANNOTATION => {}
            other => warn_skipped(other, model.local_name()),
        }
    }

    Ok(())
}

/// Parse the extension or restriction inside complexContent/simpleContent
fn parse_derivation(content: &Element) -> Result<Derivation> {
    if let Some(ext) = content.find_child(xsd_elements::EXTENSION) {
        let mut extension = Extension {
            base: required_base(ext)?,
            ..Extension::default()
        };
        for child in &ext.children {
            match child.local_name() {
                xsd_elements::SEQUENCE | xsd_elements::CHOICE | xsd_elements::ALL => {
                    collect_particles(child, &mut extension.sequence, false)?;
                }
                xsd_elements::ATTRIBUTE => extension.attributes.push(parse_attribute_decl(child)?),
                xsd_elements::ANNOTATION | xsd_elements::ANY_ATTRIBUTE => {}
                other => warn_skipped(other, xsd_elements::EXTENSION),
            }
        }
        return Ok(Derivation::Extension(extension));
    }

    if let Some(restriction) = content.find_child(xsd_elements::RESTRICTION) {
        return Ok(Derivation::Restriction(Restriction {
            base: required_base(restriction)?,
        }));
    }

    Err(Error::Parse(ParseError::new(format!(
        "{} needs an extension or a restriction",
        content.local_name()
    ))))
}

fn required_base(elem: &Element) -> Result<String> {
    elem.get_attribute(xsd_attrs::BASE)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Parse(ParseError::new(format!(
                "{} missing 'base' attribute",
                elem.local_name()
            )))
        })
}

/// Parse a simple type definition; `name` is empty for inline types
fn parse_simple_type(elem: &Element, name: &str) -> Result<SimpleTypeDef> {
    if let Some(restriction) = elem.find_child(xsd_elements::RESTRICTION) {
        if let Some(base) = restriction.get_attribute(xsd_attrs::BASE) {
            return Ok(SimpleTypeDef::restriction(name, base));
        }
        // restriction of an anonymous base type
        if let Some(inner) = restriction.find_child(xsd_elements::SIMPLE_TYPE) {
            let inner = parse_simple_type(inner, "")?;
            return Ok(SimpleTypeDef {
                name: name.to_string(),
                derivation: inner.derivation,
            });
        }
        return Err(Error::Parse(ParseError::new(format!(
            "simpleType '{}' restriction has neither a base nor a nested simpleType",
            name
        ))));
    }

    let derivation = if elem.find_child(xsd_elements::LIST).is_some() {
        SimpleDerivation::List
    } else if elem.find_child(xsd_elements::UNION).is_some() {
        SimpleDerivation::Union
    } else {
        return Err(Error::Parse(ParseError::new(format!(
            "simpleType '{}' needs a restriction, list or union",
            name
        ))));
    };

    Ok(SimpleTypeDef {
        name: name.to_string(),
        derivation,
    })
}

/// Parse an attribute declaration
fn parse_attribute_decl(elem: &Element) -> Result<AttributeDecl> {
    let name = match (elem.get_attribute(xsd_attrs::NAME), elem.get_attribute(xsd_attrs::REF)) {
        (Some(name), _) => {
            validate_ncname(name)?;
            name.to_string()
        }
        (None, Some(reference)) => strip_namespace(reference).to_string(),
        (None, None) => {
            return Err(Error::Parse(ParseError::new(
                "Attribute declaration needs a 'name' or a 'ref' attribute",
            )));
        }
    };

    let usage = match elem.get_attribute(xsd_attrs::USE) {
        None => AttributeUse::default(),
        Some(value) => AttributeUse::from_str(value).unwrap_or_else(|| {
            debug!(attribute = %name, value, "unknown attribute use, treating as optional");
            AttributeUse::Optional
        }),
    };

    let simple_type = match elem.find_child(xsd_elements::SIMPLE_TYPE) {
        Some(st) => Some(parse_simple_type(st, "")?),
        None => None,
    };

    Ok(AttributeDecl {
        name,
        type_name: elem.get_attribute(xsd_attrs::TYPE).map(str::to_string),
        simple_type,
        usage,
    })
}

fn warn_skipped(construct: &str, owner: &str) {
    match construct {
        xsd_elements::GROUP | xsd_elements::ATTRIBUTE_GROUP | xsd_elements::ANY => {
            warn!(construct, owner, "group references and wildcards are not supported, skipping");
        }
        _ => {
            warn!(construct, owner, "skipping unexpected schema construct");
        }
    }
}
