use std::collections::BTreeMap;

use serde_json::{Map, Value};

pub mod load;
pub mod validate;

/// A profile read from one section, before its schema is validated.
///
/// `role_arn` has already been decomposed into `aws_account_id`/`role_name` and
/// `source_profile` has been consumed. Every other parameter is kept in `params` as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileItem {
    pub name: String,
    pub aws_account_id: String,
    pub role_name: Option<String>,
    pub params: BTreeMap<String, String>,
}

impl ProfileItem {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aws_account_id(&self) -> &str {
        &self.aws_account_id
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|s| s.as_str())
    }

    pub fn region(&self) -> Option<&str> {
        self.param("region")
    }

    fn into_object(self) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("name".to_string(), Value::String(self.name));
        object.insert(
            "aws_account_id".to_string(),
            Value::String(self.aws_account_id),
        );
        if let Some(role_name) = self.role_name {
            object.insert("role_name".to_string(), Value::String(role_name));
        }
        for (key, value) in self.params {
            object.entry(key).or_insert(Value::String(value));
        }
        object
    }
}

/// The root of one or more role chains, owning the profiles chained through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexProfileItem {
    pub base: ProfileItem,
    pub targets: Vec<ProfileItem>,
}

impl ComplexProfileItem {
    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn targets(&self) -> impl Iterator<Item = &ProfileItem> {
        self.targets.iter()
    }
}

/// Output of [`load::load_profiles`]: profiles partitioned by role, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProfileSet {
    pub singles: Vec<ProfileItem>,
    pub complexes: Vec<ComplexProfileItem>,
}

impl RawProfileSet {
    /// The JSON document the validator walks.
    pub fn into_value(self) -> Value {
        let singles = self
            .singles
            .into_iter()
            .map(|p| Value::Object(p.into_object()))
            .collect::<Vec<_>>();

        let complexes = self
            .complexes
            .into_iter()
            .map(|c| {
                let mut object = c.base.into_object();
                let targets = c
                    .targets
                    .into_iter()
                    .map(|t| Value::Object(t.into_object()))
                    .collect::<Vec<_>>();
                object.insert("targets".to_string(), Value::Array(targets));
                Value::Object(object)
            })
            .collect::<Vec<_>>();

        let mut object = Map::new();
        object.insert("singles".to_string(), Value::Array(singles));
        object.insert("complexes".to_string(), Value::Array(complexes));
        Value::Object(object)
    }
}
