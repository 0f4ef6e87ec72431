//! Condition evaluation.
//!
//! A condition set is a conjunction of `variable operator value` rules. Both
//! the parameters and each condition's value are interpolated before the
//! comparison, so rules may reference other parameters.

use std::collections::HashMap;

use regex::Regex;

use admission_types::{AdmissionError, Condition, Operator, Parameter, Result};

use crate::interpolate::interpolate;
use crate::parameters::resolve_parameters;

/// Evaluate a condition set against build parameters.
///
/// Every condition is evaluated in declaration order so that a malformed rule
/// anywhere in the set surfaces as an error rather than a silent `false`.
/// An empty set is `true`.
pub fn check_conditions(conditions: &[Condition], params: &[Parameter]) -> Result<bool> {
    let vars = resolve_parameters(params)?;
    let mut pass = true;
    for condition in conditions {
        pass &= check_condition(condition, &vars)?;
    }
    Ok(pass)
}

/// Evaluate a single condition against already resolved parameters.
/// A missing variable compares as the empty string.
pub fn check_condition(condition: &Condition, vars: &HashMap<String, String>) -> Result<bool> {
    let expected = interpolate(&condition.value, vars)?;
    let actual = vars
        .get(&condition.variable)
        .map(String::as_str)
        .unwrap_or_default();

    // Ordering operators are lexicographic on purpose: "10" < "9".
    let ok = match condition.operator {
        Operator::Eq => actual == expected,
        Operator::Ne => actual != expected,
        Operator::Lt => actual < expected.as_str(),
        Operator::Le => actual <= expected.as_str(),
        Operator::Gt => actual > expected.as_str(),
        Operator::Ge => actual >= expected.as_str(),
        Operator::Regex => {
            let re = Regex::new(&expected).map_err(|e| AdmissionError::InvalidRegex {
                pattern: expected.clone(),
                message: e.to_string(),
            })?;
            re.is_match(actual)
        }
    };
    Ok(ok)
}

/// Admission wrapper used when scheduling a node run: evaluation errors are
/// logged and deny the run.
pub fn check_node_run_condition(conditions: &[Condition], params: &[Parameter]) -> bool {
    match check_conditions(conditions, params) {
        Ok(pass) => {
            tracing::debug!(conditions = conditions.len(), pass, "Conditions evaluated");
            pass
        }
        Err(e) => {
            tracing::warn!(error = %e, "Condition evaluation failed, denying run");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Vec<Parameter> {
        vec![
            Parameter::string("git.branch", "release/1.2"),
            Parameter::string("cds.status", "Success"),
            Parameter::string("count", "10"),
            Parameter::string("expected.status", "Success"),
        ]
    }

    fn passes(condition: Condition) -> bool {
        check_conditions(&[condition], &params()).unwrap()
    }

    #[test]
    fn empty_set_is_true() {
        assert!(check_conditions(&[], &params()).unwrap());
        assert!(check_conditions(&[], &[]).unwrap());
    }

    #[test]
    fn eq_and_ne() {
        let eq = Condition::new("cds.status", Operator::Eq, "Success");
        let ne = Condition::new("cds.status", Operator::Ne, "Success");
        assert!(check_conditions(&[eq.clone()], &params()).unwrap());
        assert!(!check_conditions(&[ne], &params()).unwrap());
        assert!(!passes(Condition::new("cds.status", Operator::Eq, "success")));
    }

    #[test]
    fn single_failing_condition_fails_the_set() {
        let conditions = vec![
            Condition::new("cds.status", Operator::Eq, "Success"),
            Condition::new("git.branch", Operator::Eq, "main"),
            Condition::new("count", Operator::Eq, "10"),
        ];
        assert!(!check_conditions(&conditions, &params()).unwrap());
    }

    #[test]
    fn ordering_is_lexicographic() {
        // "10" sorts before "9"
        assert!(passes(Condition::new("count", Operator::Lt, "9")));
        assert!(!passes(Condition::new("count", Operator::Gt, "9")));
        assert!(passes(Condition::new("count", Operator::Le, "10")));
        assert!(passes(Condition::new("count", Operator::Ge, "10")));
        assert!(passes(Condition::new("count", Operator::Ge, "1")));
    }

    #[test]
    fn regex_operator() {
        let cond = Condition::new("git.branch", Operator::Regex, "^release/");
        assert!(check_conditions(&[cond], &params()).unwrap());
        let cond = Condition::new("git.branch", Operator::Regex, "^main$");
        assert!(!check_conditions(&[cond], &params()).unwrap());
    }

    #[test]
    fn invalid_regex_is_an_error_not_false() {
        let cond = Condition::new("git.branch", Operator::Regex, "([a-z");
        let err = check_conditions(&[cond], &params()).unwrap_err();
        assert!(matches!(err, AdmissionError::InvalidRegex { pattern, .. } if pattern == "([a-z"));
    }

    #[test]
    fn invalid_regex_after_a_failing_condition_still_errors() {
        let conditions = vec![
            Condition::new("cds.status", Operator::Eq, "Fail"),
            Condition::new("git.branch", Operator::Regex, "(unclosed"),
        ];
        assert!(check_conditions(&conditions, &params()).is_err());
    }

    #[test]
    fn missing_variable_is_empty_string() {
        assert!(passes(Condition::new("nope", Operator::Eq, "")));
        assert!(passes(Condition::new("nope", Operator::Ne, "x")));
    }

    #[test]
    fn condition_value_is_interpolated() {
        let cond = Condition::new("cds.status", Operator::Eq, "{{.expected.status}}");
        assert!(check_conditions(&[cond], &params()).unwrap());
        let cond = Condition::new("cds.status", Operator::Eq, "{{.expected.status | upper}}");
        assert!(!check_conditions(&[cond], &params()).unwrap());
    }

    #[test]
    fn interpolation_error_aborts() {
        let cond = Condition::new("cds.status", Operator::Eq, "{{.expected.status | bogus}}");
        assert!(matches!(
            check_conditions(&[cond], &params()).unwrap_err(),
            AdmissionError::UnknownFilter { .. }
        ));
    }

    #[test]
    fn node_run_condition_denies_on_error() {
        let bad = Condition::new("git.branch", Operator::Regex, "[");
        assert!(!check_node_run_condition(&[bad], &params()));
        let good = Condition::new("git.branch", Operator::Regex, "release");
        assert!(check_node_run_condition(&[good], &params()));
    }
}
