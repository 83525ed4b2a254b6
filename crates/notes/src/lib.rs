pub mod front_matter;
pub mod store;

pub use front_matter::NoteFrontMatter;
pub use store::{read_notes, write_note, NoteError};
