//! CLI tool for matrixgrid - lays out a JSON request and outputs JSON
//!
//! Usage:
//!   matrixgrid_cli <request.json>              # Output JSON to stdout
//!   matrixgrid_cli <request.json> -o out.json  # Output JSON to file
//!
//! Set `RUST_LOG=debug` to see layout diagnostics on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use matrixgrid::request::{render_request, LayoutRequest};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: matrixgrid_cli <request.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read input file
    let text = match fs::read_to_string(input_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {input_path}: {e}");
            std::process::exit(1);
        }
    };

    let request = match LayoutRequest::from_json(&text) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error parsing request: {e}");
            std::process::exit(1);
        }
    };

    let output = match render_request(&request) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Layout failed: {e}");
            std::process::exit(2);
        }
    };

    let json = match output.to_json() {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {e}");
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            log::info!("wrote {} blocks to {path}", output.block_spans.len());
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
