pub mod error;
pub mod ini;
pub mod input;
pub mod output;
pub mod parser;
pub mod profile;
pub mod role_arn;
pub mod run;

pub use aesr_config_schema::profile::ProfileSet;
pub use error::Error;
pub use parser::parse_ini;
