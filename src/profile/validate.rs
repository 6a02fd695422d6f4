//! Schema validation of a profile set.
//!
//! The validator walks a JSON-shaped document, so it accepts the resolver's output as well as a
//! profile set written by hand or produced by an earlier run. Each profile kind is described by
//! a table of [`FieldRule`]s checked in order; the first failing field is reported.

use std::convert::TryFrom;

use aesr_config_schema::profile::{ComplexProfile, ComplexTargetProfile, ProfileSet, SingleProfile};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Problem, ValidationError, ValidationErrorCode};
use crate::profile::RawProfileSet;

use ValidationErrorCode::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

/// A string field of a profile: whether it must be present, and the code reported when the
/// value found is not a non-empty string.
#[derive(Debug, Clone, Copy)]
struct FieldRule {
    field: &'static str,
    presence: Presence,
    code: ValidationErrorCode,
}

impl FieldRule {
    const fn required(field: &'static str, code: ValidationErrorCode) -> FieldRule {
        FieldRule {
            field,
            presence: Presence::Required,
            code,
        }
    }

    const fn optional(field: &'static str, code: ValidationErrorCode) -> FieldRule {
        FieldRule {
            field,
            presence: Presence::Optional,
            code,
        }
    }

    fn check(&self, node: &Map<String, Value>, owner: &str) -> Result<(), ValidationError> {
        let valid = match (node.get(self.field), self.presence) {
            (Some(Value::String(s)), _) => !s.is_empty(),
            (None, Presence::Optional) => true,
            _ => false,
        };

        if valid {
            Ok(())
        } else {
            let problem = match self.presence {
                Presence::Required => Problem::RequiredString,
                Presence::Optional => Problem::OptionalString,
            };
            Err(ValidationError::new(
                self.code,
                format!("{}.{}", owner, self.field),
                problem,
            ))
        }
    }
}

const SINGLE_RULES: &[FieldRule] = &[
    FieldRule::required("name", InvalidProfileName),
    FieldRule::required("aws_account_id", InvalidAwsAccountId),
    FieldRule::required("role_name", InvalidRoleName),
];

const COMPLEX_BASE_RULES: &[FieldRule] = &[
    FieldRule::required("name", InvalidProfileName),
    FieldRule::required("aws_account_id", InvalidAwsAccountId),
    FieldRule::optional("aws_account_alias", InvalidAwsAccountAlias),
    FieldRule::optional("role_name", InvalidRoleName),
    FieldRule::optional("target_role_name", InvalidTargetRoleName),
];

const TARGET_RULES: &[FieldRule] = &[
    FieldRule::required("name", InvalidProfileName),
    FieldRule::required("aws_account_id", InvalidAwsAccountId),
    FieldRule::required("role_name", InvalidRoleName),
];

/// Targets of a profile declaring `target_role_name` may leave `role_name` out.
const TARGET_RULES_WITH_DEFAULT_ROLE: &[FieldRule] = &[
    FieldRule::required("name", InvalidProfileName),
    FieldRule::required("aws_account_id", InvalidAwsAccountId),
    FieldRule::optional("role_name", InvalidRoleName),
];

fn check_fields(
    node: &Map<String, Value>,
    owner: &str,
    rules: &[FieldRule],
) -> Result<(), ValidationError> {
    rules.iter().try_for_each(|rule| rule.check(node, owner))
}

/// Fields of a node that is not an object are all missing.
fn as_object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

/// `None` when `key` is absent or null.
fn optional_array<'a>(
    root: &'a Map<String, Value>,
    key: &str,
    code: ValidationErrorCode,
) -> Result<Option<&'a Vec<Value>>, ValidationError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(ValidationError::new(code, key, Problem::NotArray)),
    }
}

fn take_string(node: &mut Map<String, Value>, field: &str) -> Option<String> {
    match node.remove(field) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn single_profile(value: &Value, index: usize) -> Result<SingleProfile, ValidationError> {
    let owner = format!("singles[{}]", index);
    let mut node = as_object(value);
    check_fields(&node, &owner, SINGLE_RULES)?;

    Ok(SingleProfile {
        name: take_string(&mut node, "name").unwrap_or_default(),
        aws_account_id: take_string(&mut node, "aws_account_id").unwrap_or_default(),
        role_name: take_string(&mut node, "role_name").unwrap_or_default(),
        others: node,
    })
}

fn complex_target_profile(
    value: &Value,
    index: usize,
    base_has_target_role: bool,
) -> Result<ComplexTargetProfile, ValidationError> {
    let owner = format!("targets[{}]", index);
    let rules = if base_has_target_role {
        TARGET_RULES_WITH_DEFAULT_ROLE
    } else {
        TARGET_RULES
    };
    let mut node = as_object(value);
    check_fields(&node, &owner, rules)?;

    Ok(ComplexTargetProfile {
        name: take_string(&mut node, "name").unwrap_or_default(),
        aws_account_id: take_string(&mut node, "aws_account_id").unwrap_or_default(),
        role_name: take_string(&mut node, "role_name"),
        others: node,
    })
}

fn complex_profile(value: &Value, index: usize) -> Result<ComplexProfile, ValidationError> {
    let owner = format!("complexes[{}]", index);
    let mut node = as_object(value);
    check_fields(&node, &owner, COMPLEX_BASE_RULES)?;

    let targets = match node.remove("targets") {
        Some(Value::Array(targets)) => targets,
        _ => {
            return Err(ValidationError::new(
                InvalidTargetsType,
                format!("{}.targets", owner),
                Problem::NotArray,
            ))
        }
    };

    let target_role_name = take_string(&mut node, "target_role_name");
    let targets = targets
        .iter()
        .enumerate()
        .map(|(i, t)| complex_target_profile(t, i, target_role_name.is_some()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.within(&owner))?;

    Ok(ComplexProfile {
        name: take_string(&mut node, "name").unwrap_or_default(),
        aws_account_id: take_string(&mut node, "aws_account_id").unwrap_or_default(),
        aws_account_alias: take_string(&mut node, "aws_account_alias"),
        role_name: take_string(&mut node, "role_name"),
        target_role_name,
        others: node,
        targets,
    })
}

/// Validates a `{ "singles": [...], "complexes": [...] }` document.
///
/// Both keys are optional. The first violation found is returned; callers wanting every
/// violation have to fix and validate again.
pub fn validate(document: &Value) -> Result<ProfileSet, ValidationError> {
    let root = as_object(document);

    let singles = optional_array(&root, "singles", InvalidSinglesType)?
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| single_profile(item, i))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    let complexes = optional_array(&root, "complexes", InvalidComplexesType)?
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| complex_profile(item, i))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    debug!(
        "profile set validated. singles:{}, complexes:{}",
        singles.len(),
        complexes.len()
    );
    Ok(ProfileSet { singles, complexes })
}

impl TryFrom<RawProfileSet> for ProfileSet {
    type Error = ValidationError;

    fn try_from(value: RawProfileSet) -> Result<Self, Self::Error> {
        validate(&value.into_value())
    }
}
