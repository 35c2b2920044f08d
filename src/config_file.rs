//! Bundled integration config

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Integration config shipped with the tool
pub const CONFIG_JSON: &str = include_str!("../config.json");

/// Print the config to `out`, or copy it verbatim to `destination`
pub fn extract_config<W: Write>(destination: Option<&Path>, out: &mut W) -> Result<()> {
    match destination {
        Some(path) => fs::write(path, CONFIG_JSON).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?,
        None => writeln!(out, "{}", CONFIG_JSON)
            .and_then(|_| out.flush())
            .map_err(|source| Error::Config {
                path: "<stdout>".into(),
                source,
            })?,
    }

    Ok(())
}
