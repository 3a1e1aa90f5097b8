//! These models represent the records an agent owner authors and an end user submits
//!
//! The persistence service stores them with snake_case column names while the authoring
//! forms speak camelCase, so every model serializes as camelCase and accepts the stored
//! names as aliases. Rules and field types are closed enums so that every consumer gets
//! exhaustiveness checking instead of probing loosely-typed maps.
pub mod agent;
pub mod field;
pub mod value;
