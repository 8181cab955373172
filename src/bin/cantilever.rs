//! Cantilever JSON adapter
//!
//! Reads a cantilever request from the file given as the first argument (or
//! stdin) and prints the response as JSON.
//!
//! ```text
//! echo '{"length": 3.0, "n_elems": 20}' | vlasov-cantilever
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use vlasov_fea::wire::{solve_cantilever, CantileverRequest};

fn read_input() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let input = read_input()?;
    let request: CantileverRequest = if input.trim().is_empty() {
        CantileverRequest::default()
    } else {
        serde_json::from_str(&input).context("invalid cantilever request")?
    };
    log::info!(
        "Solving cantilever: L = {} m, {} elements, P = {} N",
        request.length,
        request.n_elems,
        request.load
    );

    let response = solve_cantilever(&request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
