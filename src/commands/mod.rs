pub mod credentials;
pub mod export;
pub mod list;
pub mod remove;

pub use export::ExportCommand;
pub use list::ListCommand;
pub use remove::RemoveCommand;
