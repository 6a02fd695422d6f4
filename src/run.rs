use tracing::debug;

use crate::input::ReadConfig;
use crate::output::WriteProfileSet;
use crate::parser::parse_ini;

/// Reads config text, parses it and hands the profile set to a writer.
pub struct ParseAesrConfig<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> ParseAesrConfig<R, W>
where
    R: ReadConfig,
    W: WriteProfileSet,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Pipeline failures are returned as [`crate::Error`] inside the `anyhow::Error`.
    pub fn run(self) -> anyhow::Result<()> {
        let text = self.reader.read_config()?;
        let profiles = parse_ini(&text)?;
        debug!(
            "config parsed. singles:{}, complexes:{}",
            profiles.singles.len(),
            profiles.complexes.len()
        );

        self.writer.write_profile_set(&profiles)?;
        Ok(())
    }
}
