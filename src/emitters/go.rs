//! Go emitter
//!
//! Writes `encoding/xml` structs, columns aligned the way gofmt does.

use std::fmt::{self, Write};

use super::naming::{go_type_name, lint_title, FieldNames};
use super::Emitter;
use crate::config::GeneratorConfig;
use crate::ir::Element;
use crate::schema::ScalarType;

/// Go struct emitter
#[derive(Debug, Clone, Copy, Default)]
pub struct GoEmitter;

/// Go type of a scalar payload
pub fn go_scalar(scalar: &ScalarType) -> &str {
    match scalar {
        ScalarType::Boolean => "bool",
        ScalarType::Integer => "int",
        ScalarType::Float => "float64",
        ScalarType::String => "string",
        ScalarType::Named(name) => name,
    }
}

impl GoEmitter {
    fn field_type(child: &Element, config: &GeneratorConfig) -> String {
        let base = match &child.scalar {
            Some(scalar) if child.is_plain_scalar() => go_scalar(scalar).to_string(),
            _ => go_type_name(&child.name, &config.prefix, config.exported),
        };
        if child.list {
            format!("[]{}", base)
        } else {
            base
        }
    }
}

impl Emitter for GoEmitter {
    fn write_header(&self, out: &mut dyn Write, config: &GeneratorConfig) -> fmt::Result {
        match &config.package {
            Some(package) => write!(out, "package {}\n\n", package),
            None => Ok(()),
        }
    }

    fn write_declaration(
        &self,
        out: &mut dyn Write,
        element: &Element,
        config: &GeneratorConfig,
    ) -> fmt::Result {
        let mut rows: Vec<[String; 3]> = Vec::new();
        let mut names = FieldNames::default();

        for attr in &element.attributes {
            let field = lint_title(&attr.name);
            rows.push([
                names.claim(&[field.clone(), format!("{}Attr", field)]),
                go_scalar(&attr.scalar).to_string(),
                format!("`xml:\"{},attr\"`", attr.name),
            ]);
        }
        for child in &element.children {
            let field = lint_title(&child.name);
            rows.push([
                names.claim(&[field.clone(), format!("{}Elem", field)]),
                Self::field_type(child, config),
                format!("`xml:\"{}\"`", child.name),
            ]);
        }
        if let (true, Some(scalar)) = (element.chardata, &element.scalar) {
            rows.push([
                names.claim(&[lint_title(&element.name), "Value".to_string()]),
                go_scalar(scalar).to_string(),
                "`xml:\",chardata\"`".to_string(),
            ]);
        }

        // padding counts chars, so widths must too
        let name_width = rows.iter().map(|r| r[0].chars().count()).max().unwrap_or(0);
        let type_width = rows.iter().map(|r| r[1].chars().count()).max().unwrap_or(0);

        writeln!(
            out,
            "type {} struct {{",
            go_type_name(&element.name, &config.prefix, config.exported)
        )?;
        for [name, ty, tag] in &rows {
            writeln!(out, "\t{:<nw$} {:<tw$} {}", name, ty, tag, nw = name_width, tw = type_width)?;
        }
        writeln!(out, "}}")
    }
}
