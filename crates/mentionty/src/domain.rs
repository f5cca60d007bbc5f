//! Editor-independent mention logic: users, token scanning, matching, and the
//! content model of the editable field.

pub mod document;
pub mod editor;
pub mod matcher;
pub mod token;
pub mod user;
