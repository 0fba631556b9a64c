pub mod deadline;
pub mod fingerprint;
pub mod score;
pub mod sql;
pub mod validate;

pub use deadline::with_deadline;
pub use fingerprint::fingerprint;
pub use sql::{contains_pattern, escape_like_pattern};
