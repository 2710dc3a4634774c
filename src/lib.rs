//! # xsdgen
//!
//! Generate structured-type declarations from XML Schema (XSD) files.
//!
//! A schema and everything it imports is loaded, every top-level element
//! is resolved into a language-independent intermediate tree, and the tree
//! is written out as Go structs with `encoding/xml` tags or as Rust
//! structs with serde attributes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use xsdgen::{GeneratorConfig, Session, Target};
//!
//! let config = GeneratorConfig::new()
//!     .with_package("media")
//!     .with_target(Target::Go);
//!
//! let session = Session::load("path/to/schema.xsd", config)?;
//! println!("{}", session.generate()?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod names;

// Input
pub mod documents;
pub mod loaders;
pub mod schema;

// Resolution
pub mod builder;
pub mod ir;
pub mod registry;

// Output
pub mod config;
pub mod emitters;
pub mod session;

// Re-exports for convenience
pub use config::{CollisionPolicy, GeneratorConfig, Target};
pub use error::{Error, Result};
pub use ir::{Attribute, Element};
pub use limits::Limits;
pub use session::Session;

/// Version of the xsdgen library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
