use std::convert::TryFrom;

use aesr_config_schema::profile::ProfileSet;
use tracing::debug;

use crate::error::Error;
use crate::ini::parse_sections;
use crate::profile::load::load_profiles;

/// Parses config text into a validated [`ProfileSet`].
///
/// Runs the tokenizer, the `source_profile` resolver and the schema validator in turn, stopping
/// at the first failure.
pub fn parse_ini(text: &str) -> Result<ProfileSet, Error> {
    let sections = parse_sections(text)?;
    debug!("config tokenized. sections:{}", sections.len());

    let raw = load_profiles(&sections)?;
    let profiles = ProfileSet::try_from(raw)?;
    Ok(profiles)
}
