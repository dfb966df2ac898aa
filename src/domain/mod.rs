pub mod class;
pub mod config;
pub mod connection_analyzer;
pub mod declaration;
pub mod framework;
pub mod issue;
pub mod nib;
pub mod segue;
