//! Loading of session tuning from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use starfall_core::Tuning;

/// Builds the session tuning from an optional TOML file and a seed override.
///
/// Keys missing from the file keep their default values.
pub(crate) fn load_tuning(path: Option<&Path>, seed: Option<u64>) -> Result<Tuning> {
    let mut tuning = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read tuning file {}", path.display()))?;
            parse_tuning(&text)
                .with_context(|| format!("invalid tuning file {}", path.display()))?
        }
        None => Tuning::default(),
    };

    if let Some(seed) = seed {
        tuning.rng_seed = seed;
    }

    tuning.validate().context("tuning does not describe a playable session")?;
    Ok(tuning)
}

fn parse_tuning(text: &str) -> Result<Tuning> {
    toml::from_str(text).context("failed to parse tuning TOML")
}
