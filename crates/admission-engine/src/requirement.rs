//! Requirement list validation and preparation.
//!
//! A job's requirement list must be unique on `(name, type)` and carry at most
//! one worker model, one hostname and one region.

use std::collections::{BTreeSet, HashMap, HashSet};

use admission_types::{
    AdmissionError, Parameter, ParameterType, Requirement, RequirementType, Result,
};

use crate::interpolate::interpolate;
use crate::parameters::add_or_set_parameter;

/// Validate the uniqueness and singleton constraints of a requirement list.
pub fn validate(list: &[Requirement]) -> Result<()> {
    let mut seen = HashSet::new();
    for req in list {
        if !seen.insert((req.name.as_str(), req.kind)) {
            return Err(AdmissionError::DuplicateRequirement {
                name: req.name.clone(),
                kind: req.kind,
            });
        }
    }

    if count_of(list, RequirementType::Model) > 1 {
        return Err(AdmissionError::DuplicateModelRequirement);
    }
    if count_of(list, RequirementType::Hostname) > 1 {
        return Err(AdmissionError::DuplicateHostnameRequirement);
    }

    let regions: BTreeSet<&str> = list
        .iter()
        .filter(|r| r.kind == RequirementType::Region)
        .map(|r| r.value.as_str())
        .collect();
    if regions.len() > 1 {
        return Err(AdmissionError::MultipleRegionRequirements {
            regions: regions.into_iter().map(String::from).collect(),
        });
    }

    for req in list.iter().filter(|r| r.kind == RequirementType::OsArchitecture) {
        if !is_os_arch(&req.value) {
            return Err(AdmissionError::InvalidRequirement(format!(
                "{} must be of the form os/arch, got '{}'",
                req.name, req.value
            )));
        }
    }

    Ok(())
}

fn is_os_arch(value: &str) -> bool {
    match value.split_once('/') {
        Some((os, arch)) => !os.is_empty() && !arch.is_empty() && !arch.contains('/'),
        None => false,
    }
}

fn count_of(list: &[Requirement], kind: RequirementType) -> usize {
    list.iter().filter(|r| r.kind == kind).count()
}

/// Drop exact duplicates (same name, type and value), keeping the first
/// occurrence of each.
pub fn deduplicate(list: &[Requirement]) -> Vec<Requirement> {
    let mut seen = HashSet::new();
    list.iter()
        .filter(|r| seen.insert((r.name.as_str(), r.kind, r.value.as_str())))
        .cloned()
        .collect()
}

/// Set the value of the `(name, type)` requirement, appending it if absent.
pub fn add_requirement(
    list: &mut Vec<Requirement>,
    name: &str,
    kind: RequirementType,
    value: impl Into<String>,
) {
    let value = value.into();
    match list.iter_mut().find(|r| r.name == name && r.kind == kind) {
        Some(existing) => existing.value = value,
        None => list.push(Requirement::new(name, kind, value)),
    }
}

/// Interpolate requirement names and values against build parameters.
pub fn interpolate_requirements(
    list: &[Requirement],
    vars: &HashMap<String, String>,
) -> Result<Vec<Requirement>> {
    list.iter()
        .map(|r| -> Result<Requirement> {
            Ok(Requirement {
                name: interpolate(&r.name, vars)?,
                kind: r.kind,
                value: interpolate(&r.value, vars)?,
            })
        })
        .collect()
}

/// Append an `os/arch` requirement when the list pins neither a worker model
/// nor an os-architecture and both defaults are set.
pub fn with_default_os_arch(list: &[Requirement], os: &str, arch: &str) -> Vec<Requirement> {
    let mut out = list.to_vec();
    if os.is_empty() || arch.is_empty() {
        return out;
    }
    let pinned = list
        .iter()
        .any(|r| matches!(r.kind, RequirementType::Model | RequirementType::OsArchitecture));
    if !pinned {
        let os_arch = format!("{os}/{arch}");
        out.push(Requirement::new(os_arch.clone(), RequirementType::OsArchitecture, os_arch));
    }
    out
}

/// Returns `true` if any requirement asks for a service container.
pub fn has_service(list: &[Requirement]) -> bool {
    list.iter().any(|r| r.kind == RequirementType::Service)
}

/// Export requirements as job parameters named `job.requirement.<type>.<name>`.
///
/// Service values of the form `image options...` also export
/// `<key>.image` and `<key>.options`.
pub fn requirements_to_parameters(list: &[Requirement]) -> Vec<Parameter> {
    let mut params = Vec::new();
    for r in list {
        let key = format!("job.requirement.{}.{}", r.kind, r.name.to_lowercase());
        if r.kind == RequirementType::Service {
            let words: Vec<&str> = r.value.split(' ').collect();
            if words.len() > 1 {
                add_or_set_parameter(
                    &mut params,
                    &format!("{key}.image"),
                    ParameterType::String,
                    words[0],
                );
                add_or_set_parameter(
                    &mut params,
                    &format!("{key}.options"),
                    ParameterType::String,
                    words[1..].join(" "),
                );
            }
        }
        add_or_set_parameter(&mut params, &key, ParameterType::String, r.value.clone());
    }
    params
}
