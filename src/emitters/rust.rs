//! Rust emitter
//!
//! Writes serde structs in the attribute conventions of quick-xml's serde
//! support: `@name` for attributes and `$text` for character data.

use std::fmt::{self, Write};

use super::naming::{rust_field_name, rust_type_name, FieldNames};
use super::Emitter;
use crate::config::GeneratorConfig;
use crate::ir::Element;
use crate::schema::ScalarType;

const DERIVES: &str = "#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]";

/// Rust struct emitter
#[derive(Debug, Clone, Copy, Default)]
pub struct RustEmitter;

/// Rust type of a scalar payload
pub fn rust_scalar(scalar: &ScalarType) -> &str {
    match scalar {
        ScalarType::Boolean => "bool",
        ScalarType::Integer => "i64",
        ScalarType::Float => "f64",
        ScalarType::String => "String",
        ScalarType::Named(name) => name,
    }
}

/// Writes lines, indented inside a module wrapper
struct Lines<'a> {
    out: &'a mut dyn Write,
    indent: &'static str,
    visibility: &'static str,
}

impl Lines<'_> {
    fn new<'a>(out: &'a mut dyn Write, config: &GeneratorConfig) -> Lines<'a> {
        Lines {
            out,
            indent: if config.package.is_some() { "    " } else { "" },
            visibility: if config.exported { "pub " } else { "" },
        }
    }

    fn line(&mut self, text: &str) -> fmt::Result {
        if text.is_empty() {
            self.out.write_char('\n')
        } else {
            writeln!(self.out, "{}{}", self.indent, text)
        }
    }

    fn field(&mut self, rename: Option<&str>, name: &str, ty: &str) -> fmt::Result {
        if let Some(rename) = rename {
            self.line(&format!("    #[serde(rename = \"{}\")]", rename))?;
        }
        let line = format!("    {}{}: {},", self.visibility, name, ty);
        self.line(&line)
    }
}

impl Emitter for RustEmitter {
    fn write_header(&self, out: &mut dyn Write, config: &GeneratorConfig) -> fmt::Result {
        if let Some(package) = &config.package {
            writeln!(out, "pub mod {} {{", package)?;
        }
        let mut lines = Lines::new(out, config);
        lines.line("use serde::{Deserialize, Serialize};")?;
        lines.line("")
    }

    fn write_declaration(
        &self,
        out: &mut dyn Write,
        element: &Element,
        config: &GeneratorConfig,
    ) -> fmt::Result {
        let mut lines = Lines::new(out, config);
        let type_name = rust_type_name(&element.name, &config.prefix);

        lines.line(DERIVES)?;
        lines.line(&format!("#[serde(rename = \"{}\")]", element.name))?;
        let header = format!("{}struct {} {{", lines.visibility, type_name);
        lines.line(&header)?;

        let mut names = FieldNames::default();
        for attr in &element.attributes {
            let field = names.claim(&[
                rust_field_name(&attr.name),
                rust_field_name(&format!("{}_attr", attr.name)),
            ]);
            lines.field(Some(&format!("@{}", attr.name)), &field, rust_scalar(&attr.scalar))?;
        }

        for child in &element.children {
            let field = names.claim(&[
                rust_field_name(&child.name),
                rust_field_name(&format!("{}_elem", child.name)),
            ]);
            let base = match &child.scalar {
                Some(scalar) if child.is_plain_scalar() => rust_scalar(scalar).to_string(),
                _ => rust_type_name(&child.name, &config.prefix),
            };
            let ty = if child.list {
                format!("Vec<{}>", base)
            } else {
                base
            };
            let rename = (field.trim_start_matches("r#") != child.name).then_some(child.name.as_str());
            lines.field(rename, &field, &ty)?;
        }

        if let (true, Some(scalar)) = (element.chardata, &element.scalar) {
            let field = names.claim(&["value".to_string(), "text".to_string()]);
            lines.field(Some("$text"), &field, rust_scalar(scalar))?;
        }

        lines.line("}")
    }

    fn write_footer(&self, out: &mut dyn Write, config: &GeneratorConfig) -> fmt::Result {
        if config.package.is_some() {
            writeln!(out, "}}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::emit;
    use crate::ir::{Attribute, Shape};
    use pretty_assertions::assert_eq;

    fn tag_list() -> Element {
        Element::from_shape(
            "tagList",
            false,
            Shape {
                children: vec![Element::from_shape(
                    "tag",
                    true,
                    Shape {
                        scalar: Some(ScalarType::String),
                        attributes: vec![Attribute::new("type", ScalarType::String)],
                        children: vec![],
                    },
                )],
                ..Shape::default()
            },
        )
    }

    #[test]
    fn test_serde_structs() {
        let config = GeneratorConfig::new().with_exported(true);
        let out = emit(&[tag_list()], &RustEmitter, &config).unwrap();
        assert_eq!(
            out,
            r#"use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename = "tagList")]
pub struct TagList {
    pub tag: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename = "tag")]
pub struct Tag {
    #[serde(rename = "@type")]
    pub r#type: String,
    #[serde(rename = "$text")]
    pub value: String,
}
"#
        );
    }

    #[test]
    fn test_clashing_field_names() {
        let note = Element::from_shape(
            "note",
            false,
            Shape {
                scalar: Some(ScalarType::String),
                attributes: vec![Attribute::new("value", ScalarType::String)],
                children: vec![],
            },
        );
        let item = Element::from_shape(
            "item",
            false,
            Shape {
                scalar: None,
                attributes: vec![Attribute::new("id", ScalarType::String)],
                children: vec![Element::from_shape("id", false, Shape::scalar(ScalarType::Integer))],
            },
        );

        let out = emit(&[note, item], &RustEmitter, &GeneratorConfig::new()).unwrap();
        assert_eq!(
            out,
            r#"use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename = "note")]
struct Note {
    #[serde(rename = "@value")]
    value: String,
    #[serde(rename = "$text")]
    text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename = "item")]
struct Item {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "id")]
    id_elem: i64,
}
"#
        );
    }

    #[test]
    fn test_module_wrapper_and_renamed_fields() {
        let root = Element::from_shape(
            "book",
            false,
            Shape {
                children: vec![Element::from_shape(
                    "pageCount",
                    false,
                    Shape::scalar(ScalarType::Integer),
                )],
                ..Shape::default()
            },
        );
        let config = GeneratorConfig::new().with_package("books").with_prefix("xsd");

        let out = emit(&[root], &RustEmitter, &config).unwrap();
        assert_eq!(
            out,
            r#"pub mod books {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
    #[serde(rename = "book")]
    struct XsdBook {
        #[serde(rename = "pageCount")]
        page_count: i64,
    }
}
"#
        );
    }
}
