//! Handler for the `tradebook init` command.

use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory and an initial configuration pointing at `base_url`.
pub async fn init(home: &Path, base_url: &str) -> Result<Out<()>> {
    let config = Config::create(home, base_url).await?;
    Ok(Out::new_message(format!(
        "Initialized tradebook home at '{}' for backend {}",
        config.root().display(),
        config.base_url()
    )))
}
