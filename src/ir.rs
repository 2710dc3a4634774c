//! Intermediate tree
//!
//! The language-independent shape of every resolved element. The tree
//! builder produces it and the emitters consume it; nothing in here knows
//! about XSD syntax or about any output language.

use serde::Serialize;

use crate::schema::ScalarType;

/// A resolved element node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// Element name, prefix stripped
    pub name: String,
    /// Scalar payload; absent for purely structural nodes
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub scalar: Option<ScalarType>,
    /// Repeated under its parent (`maxOccurs="unbounded"`)
    pub list: bool,
    /// Own text content must be captured
    pub chardata: bool,
    /// Attributes in declaration order, base type first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    /// Child elements in declaration order, base type first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

/// A resolved attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Attribute value type
    #[serde(rename = "type")]
    pub scalar: ScalarType,
}

impl Attribute {
    /// Create an attribute entry
    pub fn new(name: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar,
        }
    }
}

/// Content of a type, before it is attached to an element name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    /// Scalar payload
    pub scalar: Option<ScalarType>,
    /// Attributes
    pub attributes: Vec<Attribute>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Shape {
    /// Shape of a bare scalar
    pub fn scalar(scalar: ScalarType) -> Self {
        Self {
            scalar: Some(scalar),
            ..Self::default()
        }
    }
}

/// Derive a shape from `base` by adding `delta` on top
///
/// Derivation only ever adds: the base's attributes and children come
/// first, followed by the delta's. A scalar in the delta replaces the
/// base's; otherwise the base's is kept.
pub fn compose(base: Shape, delta: Shape) -> Shape {
    let Shape {
        scalar,
        mut attributes,
        mut children,
    } = base;

    attributes.extend(delta.attributes);
    children.extend(delta.children);

    Shape {
        scalar: delta.scalar.or(scalar),
        attributes,
        children,
    }
}

impl Element {
    /// Attach a shape to an element name
    ///
    /// A node with a scalar captures its text when it has attributes, or
    /// when it has no children at all.
    pub fn from_shape(name: impl Into<String>, list: bool, shape: Shape) -> Self {
        let chardata =
            shape.scalar.is_some() && (!shape.attributes.is_empty() || shape.children.is_empty());
        Self {
            name: name.into(),
            scalar: shape.scalar,
            list,
            chardata,
            attributes: shape.attributes,
            children: shape.children,
        }
    }

    /// Scalar-valued node with no structure of its own
    pub fn is_plain_scalar(&self) -> bool {
        self.scalar.is_some() && self.attributes.is_empty() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(name: &str, scalar: ScalarType) -> Element {
        Element::from_shape(name, false, Shape::scalar(scalar))
    }

    #[test]
    fn test_compose_appends_base_first() {
        let base = Shape {
            scalar: Some(ScalarType::String),
            attributes: vec![Attribute::new("language", ScalarType::String)],
            children: vec![leaf("a", ScalarType::Integer)],
        };
        let delta = Shape {
            scalar: None,
            attributes: vec![Attribute::new("original", ScalarType::Boolean)],
            children: vec![leaf("b", ScalarType::String)],
        };

        let shape = compose(base, delta);
        assert_eq!(shape.scalar, Some(ScalarType::String));
        assert_eq!(
            shape.attributes,
            vec![
                Attribute::new("language", ScalarType::String),
                Attribute::new("original", ScalarType::Boolean),
            ]
        );
        let names: Vec<&str> = shape.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_compose_delta_scalar_wins() {
        let shape = compose(Shape::scalar(ScalarType::String), Shape::scalar(ScalarType::Integer));
        assert_eq!(shape.scalar, Some(ScalarType::Integer));
    }

    #[test]
    fn test_compose_with_empty_is_identity() {
        let base = Shape {
            scalar: Some(ScalarType::Float),
            attributes: vec![Attribute::new("unit", ScalarType::String)],
            children: vec![],
        };
        assert_eq!(compose(base.clone(), Shape::default()), base);
        assert_eq!(compose(Shape::default(), base.clone()), base);
    }

    #[test]
    fn test_chardata_rule() {
        let scalar_leaf = leaf("studio", ScalarType::String);
        assert!(scalar_leaf.chardata);
        assert!(scalar_leaf.is_plain_scalar());

        let with_attr = Element::from_shape(
            "title",
            true,
            Shape {
                scalar: Some(ScalarType::String),
                attributes: vec![Attribute::new("language", ScalarType::String)],
                children: vec![],
            },
        );
        assert!(with_attr.chardata);
        assert!(!with_attr.is_plain_scalar());

        let structural = Element::from_shape(
            "titleList",
            false,
            Shape {
                children: vec![with_attr],
                ..Shape::default()
            },
        );
        assert!(!structural.chardata);

        let empty = Element::from_shape("nothing", false, Shape::default());
        assert!(!empty.chardata);
        assert!(!empty.is_plain_scalar());
    }

    #[test]
    fn test_serialize() {
        let element = Element::from_shape(
            "tagId",
            false,
            Shape {
                scalar: Some(ScalarType::String),
                attributes: vec![Attribute::new("type", ScalarType::String)],
                children: vec![],
            },
        );

        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "tagId",
                "type": "string",
                "list": false,
                "chardata": true,
                "attributes": [{"name": "type", "type": "string"}]
            })
        );
    }
}
