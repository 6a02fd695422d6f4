use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The account and role an IAM role ARN points at.
///
/// Only `arn:<partition>:iam::<account id>:role/<role name>` is accepted. Role names may
/// contain a path (`role/sso/path/to/role`), which is kept verbatim. An empty account id or role
/// name still decomposes; the resolver and validator reject those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleArn {
    pub partition: String,
    pub aws_account_id: String,
    pub role_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not an IAM role ARN: {0}")]
pub struct InvalidRoleArn(String);

impl RoleArn {
    /// Decomposes `role_arn`. Anything that is not an IAM role ARN is `None`.
    pub fn parse(role_arn: &str) -> Option<RoleArn> {
        let (prefix, role_name) = role_arn.split_once('/')?;
        let fields = prefix.split(':').collect::<Vec<_>>();
        match fields.as_slice() {
            ["arn", partition, "iam", "", account_id, "role"] => Some(RoleArn {
                partition: partition.to_string(),
                aws_account_id: account_id.to_string(),
                role_name: role_name.to_string(),
            }),
            _ => None,
        }
    }

    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn aws_account_id(&self) -> &str {
        &self.aws_account_id
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }
}

impl FromStr for RoleArn {
    type Err = InvalidRoleArn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleArn::parse(s).ok_or_else(|| InvalidRoleArn(s.to_string()))
    }
}

impl fmt::Display for RoleArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:iam::{}:role/{}",
            self.partition, self.aws_account_id, self.role_name
        )
    }
}
