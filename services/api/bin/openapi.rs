//! Writes the API's OpenAPI document to disk, by default `openapi.json`.

use anyhow::Context;
use partner_api::router::openapi_json;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));

    let json = openapi_json().context("failed to render the OpenAPI document")?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("OpenAPI document written to {}", path.display());
    Ok(())
}
