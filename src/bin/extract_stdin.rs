//! Reads HTML from stdin and prints the extracted article as JSON.
//!
//! Usage: `extract_stdin [BASE_URI] < page.html`

use rs_readability::{extract_bytes, Options};
use serde::Serialize;
use std::io::{self, Read};

#[derive(Serialize)]
struct ErrorOutput {
    error: String,
}

fn main() {
    let base_uri = std::env::args().nth(1);

    let mut html = Vec::new();
    if io::stdin().read_to_end(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let output = match extract_bytes(&html, base_uri.as_deref(), &Options::default()) {
        Ok(result) => serde_json::to_string(&result),
        Err(err) => serde_json::to_string(&ErrorOutput {
            error: err.to_string(),
        }),
    };

    println!("{}", output.unwrap_or_default());
}
