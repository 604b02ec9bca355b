//! Model catalog listing
//!
//! Prints the known Gemini models. The catalog is static: model selection
//! is not restricted to it, and any configured name is sent verbatim.

use prettytable::{cell, row, Table};
use serde_json::json;

use crate::error::Result;
use crate::providers::KNOWN_MODELS;

/// List known models as a table or JSON
///
/// # Arguments
///
/// * `json` - Output a JSON array instead of a table
pub fn list_models(json: bool) -> Result<()> {
    if json {
        let models: Vec<_> = KNOWN_MODELS
            .iter()
            .map(|m| json!({ "name": m.name, "label": m.label }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else {
        print_models_table();
    }
    Ok(())
}

/// Print the model catalog as a table
pub fn print_models_table() {
    let mut table = Table::new();
    table.add_row(row!["NAME", "DESCRIPTION"]);
    for model in KNOWN_MODELS {
        table.add_row(row![model.name, model.label]);
    }
    table.printstd();
}
