//! Notes and to-do lists.
//!
//! Both are plain CRUD lists stored verbatim as JSON arrays.  Every
//! mutation reloads the list, applies the change and writes the whole
//! list back before returning.

pub mod notes;
pub mod todos;

pub use notes::{Note, Notes};
pub use todos::{Todo, Todos};
