//! Kiln - Entry Point
//!
//! Binary entry point for the `kiln` command. Lives in the facade crate so
//! every linked module's registrations are part of the binary.

// Force-link kiln-infrastructure so its linkme registrations are included
extern crate kiln_infrastructure;

use clap::Parser;
use kiln::cli::{Cli, run};

/// Main entry point for Kiln
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(&cli)?;
    Ok(())
}
