use std::fmt;

use thiserror::Error;

/// Any failure of the tokenize → resolve → validate pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// The name used when rendering the error as `<kind>: <message>`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Parse(_) => "ParseError",
            Error::Load(_) => "LoadError",
            Error::Validation(_) => "ValidationError",
        }
    }
}

/// A malformed line in the config text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unexpected text")]
    UnexpectedText { text: String, line: usize },

    #[error("Invalid parameter definition")]
    InvalidParameter { text: String, line: usize },

    #[error("The `{key}` parameter is duplicated in the same profile.")]
    DuplicateParameter {
        key: String,
        text: String,
        line: usize,
    },
}

impl ParseError {
    /// The offending line, comments and surrounding spaces removed.
    pub fn text(&self) -> &str {
        use ParseError::*;
        match self {
            UnexpectedText { text, .. }
            | InvalidParameter { text, .. }
            | DuplicateParameter { text, .. } => text,
        }
    }

    pub fn line(&self) -> usize {
        use ParseError::*;
        match self {
            UnexpectedText { line, .. }
            | InvalidParameter { line, .. }
            | DuplicateParameter { line, .. } => *line,
        }
    }
}

/// A section that cannot become a profile, or a broken `source_profile` reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("The profile includes both `role_arn` and either `aws_account_id` or `role_name`.")]
    ConflictingRoleArn { line: usize },

    #[error("The profile includes invalid `role_arn` parameter.")]
    InvalidRoleArn { line: usize },

    #[error("The profile doesn't specify an AWS account ID.")]
    MissingAccountId { line: usize },

    #[error(
        "The following profiles are referenced as `source_profile` but not defined: {}",
        .names.join(", ")
    )]
    UndefinedSourceProfiles { names: Vec<String> },
}

impl LoadError {
    /// Start line of the offending section. `None` for errors spanning the whole file.
    pub fn line(&self) -> Option<usize> {
        use LoadError::*;
        match self {
            ConflictingRoleArn { line } | InvalidRoleArn { line } | MissingAccountId { line } => {
                Some(*line)
            }
            UndefinedSourceProfiles { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    InvalidSinglesType,
    InvalidComplexesType,
    InvalidTargetsType,
    InvalidProfileName,
    InvalidAwsAccountId,
    InvalidAwsAccountAlias,
    InvalidRoleName,
    InvalidTargetRoleName,
}

impl ValidationErrorCode {
    pub fn as_str(&self) -> &'static str {
        use ValidationErrorCode::*;
        match self {
            InvalidSinglesType => "INVALID_SINGLES_TYPE",
            InvalidComplexesType => "INVALID_COMPLEXES_TYPE",
            InvalidTargetsType => "INVALID_TARGETS_TYPE",
            InvalidProfileName => "INVALID_PROFILE_NAME",
            InvalidAwsAccountId => "INVALID_AWS_ACCOUNT_ID",
            InvalidAwsAccountAlias => "INVALID_AWS_ACCOUNT_ALIAS",
            InvalidRoleName => "INVALID_ROLE_NAME",
            InvalidTargetRoleName => "INVALID_TARGET_ROLE_NAME",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is wrong with the value found at a [`ValidationError`]'s path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    RequiredString,
    OptionalString,
    NotArray,
}

/// A schema violation at a dotted path such as `complexes[1].targets[0].role_name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.message())]
pub struct ValidationError {
    code: ValidationErrorCode,
    path: String,
    problem: Problem,
}

impl ValidationError {
    pub fn new<S: Into<String>>(code: ValidationErrorCode, path: S, problem: Problem) -> Self {
        ValidationError {
            code,
            path: path.into(),
            problem,
        }
    }

    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn problem(&self) -> Problem {
        self.problem
    }

    pub fn message(&self) -> String {
        match self.problem {
            Problem::RequiredString => format!("{} is required to be a valid string.", self.path),
            Problem::OptionalString => format!("{} must be a valid string.", self.path),
            Problem::NotArray => format!("{} must be an array.", self.path),
        }
    }

    /// Re-roots the error under `owner`, e.g. `targets[0].name` under `complexes[1]`.
    pub fn within(self, owner: &str) -> Self {
        ValidationError {
            path: format!("{}.{}", owner, self.path),
            ..self
        }
    }
}
