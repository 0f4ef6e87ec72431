//! Build parameter helpers.

use std::collections::HashMap;

use admission_types::{Parameter, ParameterType, Result};

use crate::interpolate::interpolate;

/// Flatten parameters into a name → value map. Later duplicates win.
pub fn parameters_to_map(params: &[Parameter]) -> HashMap<String, String> {
    params
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect()
}

/// Set the value of the parameter called `name`, appending it if absent.
pub fn add_or_set_parameter(
    params: &mut Vec<Parameter>,
    name: &str,
    kind: ParameterType,
    value: impl Into<String>,
) {
    let value = value.into();
    match params.iter_mut().find(|p| p.name == name) {
        Some(existing) => {
            existing.kind = kind;
            existing.value = value;
        }
        None => params.push(Parameter {
            name: name.to_string(),
            kind,
            value,
        }),
    }
}

/// Flatten parameters and interpolate every value against the flattened map,
/// so parameters may reference one another. Single pass.
pub fn resolve_parameters(params: &[Parameter]) -> Result<HashMap<String, String>> {
    let raw = parameters_to_map(params);
    raw.iter()
        .map(|(k, v)| -> Result<(String, String)> { Ok((k.clone(), interpolate(v, &raw)?)) })
        .collect()
}
