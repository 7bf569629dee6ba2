//! services/api/src/bin/openapi.rs
//!
//! Writes the Eco-Focus OpenAPI document to disk so front-end clients can be
//! generated without a running server.
//!
//! Usage: `openapi [OUTPUT_PATH]` (defaults to `openapi.json`).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn eco_focus_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    spec.info.title = "Eco-Focus Impact API".to_string();
    spec.info.version = env!("CARGO_PKG_VERSION").to_string();
    spec
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());

    let spec = eco_focus_spec();
    std::fs::write(&path, spec.to_pretty_json()?)?;
    println!(
        "OpenAPI specification ({} paths) written to {}",
        spec.paths.paths.len(),
        path
    );
    Ok(())
}
