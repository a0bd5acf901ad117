//! The normal-form ladder and the classifier that places a relation on it.

mod classifier;
mod level;

pub(crate) use classifier::find_type_mismatch;
pub use classifier::{
    Classification, MIN_DECOMPOSABLE_ATTRIBUTES, Violation, ViolationKind, check, classify,
    determine_normal_form, satisfies,
};
pub use level::{NormalForm, NormalFormRequest};
