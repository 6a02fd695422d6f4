use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields that are not part of a profile's schema, carried verbatim (`color`, `image`, `region`
/// and anything else written in the config file).
pub type Passthrough = Map<String, Value>;

fn passthrough_str<'a>(others: &'a Passthrough, key: &str) -> Option<&'a str> {
    others.get(key).and_then(Value::as_str)
}

/// A standalone profile: not the source of any chain and not chained itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleProfile {
    pub name: String,
    pub aws_account_id: String,
    pub role_name: String,

    #[serde(flatten)]
    pub others: Passthrough,
}

impl SingleProfile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aws_account_id(&self) -> &str {
        &self.aws_account_id
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn color(&self) -> Option<&str> {
        passthrough_str(&self.others, "color")
    }

    pub fn image(&self) -> Option<&str> {
        passthrough_str(&self.others, "image")
    }

    pub fn region(&self) -> Option<&str> {
        passthrough_str(&self.others, "region")
    }
}

/// A profile reached by chaining through the credentials of a [`ComplexProfile`].
///
/// `role_name` may be absent when the owning profile declares a `target_role_name`; the
/// default is not copied here and has to be applied by the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexTargetProfile {
    pub name: String,
    pub aws_account_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,

    #[serde(flatten)]
    pub others: Passthrough,
}

impl ComplexTargetProfile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aws_account_id(&self) -> &str {
        &self.aws_account_id
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        passthrough_str(&self.others, "color")
    }

    pub fn image(&self) -> Option<&str> {
        passthrough_str(&self.others, "image")
    }
}

/// The root of one or more role chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexProfile {
    pub name: String,
    pub aws_account_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_account_alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role_name: Option<String>,

    #[serde(flatten)]
    pub others: Passthrough,

    pub targets: Vec<ComplexTargetProfile>,
}

impl ComplexProfile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aws_account_id(&self) -> &str {
        &self.aws_account_id
    }

    pub fn aws_account_alias(&self) -> Option<&str> {
        self.aws_account_alias.as_deref()
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }

    pub fn target_role_name(&self) -> Option<&str> {
        self.target_role_name.as_deref()
    }

    pub fn targets(&self) -> impl Iterator<Item = &ComplexTargetProfile> {
        self.targets.iter()
    }

    /// The role to assume in `target`: its own `role_name`, or this profile's
    /// `target_role_name` when the target leaves it out.
    pub fn role_name_for<'a>(&'a self, target: &'a ComplexTargetProfile) -> Option<&'a str> {
        target.role_name().or_else(|| self.target_role_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSet {
    pub singles: Vec<SingleProfile>,
    pub complexes: Vec<ComplexProfile>,
}

impl ProfileSet {
    pub fn singles(&self) -> impl Iterator<Item = &SingleProfile> {
        self.singles.iter()
    }

    pub fn complexes(&self) -> impl Iterator<Item = &ComplexProfile> {
        self.complexes.iter()
    }
}
