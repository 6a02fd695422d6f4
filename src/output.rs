use std::io::{self, Write};

use aesr_config_schema::profile::ProfileSet;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

pub mod defaults {
    /// Indentation beyond this many spaces is clamped.
    pub const MAX_INDENT: usize = 10;
}

/// Where a parsed profile set goes.
pub trait WriteProfileSet {
    fn write_profile_set(&self, profiles: &ProfileSet) -> anyhow::Result<()>;
}

/// Prints the profile set as one JSON document followed by a newline.
///
/// With an indent of zero (or none) the JSON is compact.
#[derive(Debug, Clone, Default)]
pub struct JsonProfileSetWriter {
    indent: Option<usize>,
}

impl JsonProfileSetWriter {
    pub fn new(indent: Option<usize>) -> JsonProfileSetWriter {
        JsonProfileSetWriter {
            indent: indent
                .filter(|&n| n > 0)
                .map(|n| n.min(defaults::MAX_INDENT)),
        }
    }

    pub fn write_to<W: Write>(&self, mut w: W, profiles: &ProfileSet) -> anyhow::Result<()> {
        match self.indent {
            Some(n) => {
                let indent = " ".repeat(n);
                let formatter = PrettyFormatter::with_indent(indent.as_bytes());
                let mut ser = serde_json::Serializer::with_formatter(&mut w, formatter);
                profiles.serialize(&mut ser)?;
            }
            None => serde_json::to_writer(&mut w, profiles)?,
        }
        writeln!(w)?;
        w.flush()?;
        Ok(())
    }
}

impl WriteProfileSet for JsonProfileSetWriter {
    fn write_profile_set(&self, profiles: &ProfileSet) -> anyhow::Result<()> {
        let stdout = io::stdout();
        self.write_to(stdout.lock(), profiles)
    }
}
