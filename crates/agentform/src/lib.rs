pub mod control;
pub mod errors;
pub mod models;
pub mod schema;
pub mod sink;
pub mod submission;

pub use control::{render_control_kind, ControlKind};
pub use schema::{compile, defaults, ValidationResult, ValidationSchema};
