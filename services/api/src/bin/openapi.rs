//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the portfolio analysis API to disk so it
//! can be committed or fed to client generators without starting the server.
//! The output path defaults to `openapi.json` and can be overridden with the
//! first command-line argument.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());

    let document = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(&path, document)?;
    println!("OpenAPI document written to {path}");
    Ok(())
}
