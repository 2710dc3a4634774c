//! Code emission
//!
//! Walks the intermediate forest depth-first, pre-order, and writes one
//! declaration per distinct element name. Plain scalar children become
//! fields of a scalar type and get no declaration of their own.

pub mod go;
pub mod naming;
pub mod rust;

use std::collections::HashMap;
use std::fmt::{self, Write};

use tracing::{debug, warn};

use crate::config::{CollisionPolicy, GeneratorConfig, Target};
use crate::error::{ComponentKind, Error, Result};
use crate::ir::Element;

pub use go::GoEmitter;
pub use rust::RustEmitter;

/// A target language writer
pub trait Emitter {
    /// Write the package/module header
    fn write_header(&self, out: &mut dyn Write, config: &GeneratorConfig) -> fmt::Result;

    /// Write the declaration for one element
    fn write_declaration(
        &self,
        out: &mut dyn Write,
        element: &Element,
        config: &GeneratorConfig,
    ) -> fmt::Result;

    /// Write anything that closes the output
    fn write_footer(&self, _out: &mut dyn Write, _config: &GeneratorConfig) -> fmt::Result {
        Ok(())
    }
}

/// Emitter for the configured target
pub fn emitter_for(target: Target) -> Box<dyn Emitter> {
    match target {
        Target::Go => Box::new(GoEmitter),
        Target::Rust => Box::new(RustEmitter),
    }
}

/// Render declarations for a forest
///
/// Output is built in memory; on error nothing is returned.
pub fn emit(forest: &[Element], emitter: &dyn Emitter, config: &GeneratorConfig) -> Result<String> {
    let mut out = String::new();
    emitter.write_header(&mut out, config)?;

    let mut walk = Walk {
        emitter,
        config,
        emitted: HashMap::new(),
        out: &mut out,
    };
    for root in forest {
        walk.visit(root, true)?;
    }
    let count = walk.emitted.len();

    emitter.write_footer(&mut out, config)?;
    debug!(declarations = count, target = %config.target, "emitted declarations");
    Ok(out)
}

/// State of one emission pass
struct Walk<'e, 'o> {
    emitter: &'e dyn Emitter,
    config: &'e GeneratorConfig,
    /// First element emitted under each name
    emitted: HashMap<&'e str, &'e Element>,
    out: &'o mut String,
}

impl<'e, 'o> Walk<'e, 'o> {
    fn visit(&mut self, element: &'e Element, is_root: bool) -> Result<()> {
        if !is_root && element.is_plain_scalar() {
            return Ok(());
        }

        if let Some(first) = self.emitted.get(element.name.as_str()) {
            if !same_declaration(first, element) {
                match self.config.collisions {
                    CollisionPolicy::Warn => {
                        warn!(element = %element.name, "different element with an already emitted name, skipping");
                    }
                    CollisionPolicy::Error => {
                        return Err(Error::NameCollision {
                            kind: ComponentKind::Declaration,
                            name: element.name.clone(),
                        });
                    }
                }
            }
            return Ok(());
        }

        if !self.emitted.is_empty() {
            self.out.push('\n');
        }
        self.emitted.insert(&element.name, element);
        self.emitter
            .write_declaration(&mut *self.out, element, self.config)?;

        for child in &element.children {
            self.visit(child, false)?;
        }
        Ok(())
    }
}

/// Two elements produce the same declaration; the list flag belongs to
/// the parent's field, not to the declaration
fn same_declaration(a: &Element, b: &Element) -> bool {
    a.scalar == b.scalar
        && a.chardata == b.chardata
        && a.attributes == b.attributes
        && a.children == b.children
}
