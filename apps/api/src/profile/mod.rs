// Field-Path Mutator: routes inline edits to the correct location inside a
// Profile Document via dotted/bracketed path expressions.

pub mod mutator;
pub mod path;

pub use mutator::update_profile_field;
pub use path::{FieldPath, FieldPathError};
