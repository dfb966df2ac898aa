// Infrastructure adapters for nibcheck.

pub mod class_loader;
pub mod concurrency;
pub mod config_loader;
pub mod nib_parser;
pub mod project_loader;

pub use class_loader::{JsonClassSource, LoadError};
pub use nib_parser::{NibParseError, ParsedNib, XmlNibParser};
pub use project_loader::ProjectLoader;
