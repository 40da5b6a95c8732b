//! Domain entities - Core business objects with no external dependencies

pub mod catalog;
pub mod note;
pub mod request;
pub mod response;

pub use catalog::{Catalog, CommandEntry, LanguageEntry, ARGUMENT_MARKER};
pub use note::Note;
pub use request::Request;
pub use response::{Attachment, Field, Response, Visibility};
