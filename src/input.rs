use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Where the config text comes from.
pub trait ReadConfig {
    fn read_config(&self) -> anyhow::Result<String>;
}

pub struct StdinConfigReader;

impl ReadConfig for StdinConfigReader {
    fn read_config(&self) -> anyhow::Result<String> {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        debug!("config read from stdin. bytes:{}", text.len());
        Ok(text)
    }
}

pub struct FileConfigReader {
    path: PathBuf,
}

impl<P: AsRef<Path>> From<P> for FileConfigReader {
    fn from(path: P) -> Self {
        FileConfigReader {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ReadConfig for FileConfigReader {
    fn read_config(&self) -> anyhow::Result<String> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            anyhow::anyhow!("cannot read config file. path:{}, {}", self.path.display(), e)
        })?;
        debug!(
            "config read from file. path:{}, bytes:{}",
            self.path.display(),
            text.len()
        );
        Ok(text)
    }
}

/// Config text held in memory.
pub struct StaticConfigReader {
    text: String,
}

impl<S: Into<String>> From<S> for StaticConfigReader {
    fn from(s: S) -> Self {
        StaticConfigReader { text: s.into() }
    }
}

impl ReadConfig for StaticConfigReader {
    fn read_config(&self) -> anyhow::Result<String> {
        Ok(self.text.clone())
    }
}
