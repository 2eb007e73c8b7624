use anyhow::Result;
use tracing::debug;

use crate::cli::ReloadArgs;
use crate::config_discovery::load_config_with_discovery;
use crate::error::ReloadError;
use crate::merger;
use crate::reload::{self, Direnv};

pub fn run(args: ReloadArgs) -> Result<()> {
    let file_config = match load_config_with_discovery(args.config.as_deref())? {
        Some((path, config)) => {
            debug!(path = %path.display(), "using config");
            Some(config)
        }
        None => None,
    };

    let plan = merger::merge(&args, file_config)?;

    match reload::reload(&plan, &Direnv) {
        Ok(_) => Ok(()),
        Err(err @ ReloadError::SourceDirMissing(_)) => {
            if let Some(lines) = err.diagnostic() {
                for line in lines {
                    println!("{}", line);
                }
            }
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
