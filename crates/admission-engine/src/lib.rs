//! Trigger admission engine.
//!
//! Decides whether a stage, hook or job may run given a parameter map, a git
//! ref and a list of changed paths: placeholder interpolation, condition
//! evaluation, requirement validation, and hook path/ref matching. Every entry
//! point is a pure function of its inputs.

pub mod condition;
pub mod filter;
pub mod glob;
pub mod hook;
pub mod interpolate;
pub mod parameters;
pub mod requirement;

pub use condition::{check_condition, check_conditions, check_node_run_condition};
pub use filter::Filter;
pub use glob::{glob_match, GlobPattern};
pub use hook::{admits, is_valid_hook_path, is_valid_hook_refs, validate_ref};
pub use interpolate::interpolate;
pub use parameters::{add_or_set_parameter, parameters_to_map, resolve_parameters};
pub use requirement::{
    add_requirement, deduplicate, has_service, interpolate_requirements, requirements_to_parameters,
    validate, with_default_os_arch,
};
