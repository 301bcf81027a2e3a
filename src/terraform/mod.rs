pub mod files;
pub mod generate;
pub mod import_script;
pub mod render;
pub mod sanitize;

pub use files::{MODULE_NAME, TfVariables, write_module};
pub use generate::generate_module;
