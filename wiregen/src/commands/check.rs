use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use wiregen_codegen::{ConvertOptions, Converter};
use wiregen_codegen_rust::RustGenerator;

use super::UnwrapOrExit;
use crate::config::Config;

#[derive(Args)]
pub struct CheckCommand {
    /// Directory searched for schema files (defaults to wiregen.toml or .)
    pub root: Option<PathBuf>,

    /// Path to wiregen.toml (defaults to ./wiregen.toml)
    #[arg(short, long, default_value = "wiregen.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let config = Config::load(&self.config)?.generate;
        let root = self
            .root
            .clone()
            .or(config.src)
            .unwrap_or_else(|| PathBuf::from("."));

        // Parse, preprocess, and link. Unresolved references and parse
        // failures surface here as pretty-printed errors.
        let converter = Converter::new(RustGenerator, ConvertOptions::default());
        let analysis = converter.analyze(&root).unwrap_or_exit();

        for warning in &analysis.warnings {
            eprintln!("warning: {}", warning.message);
            if let Some(loc) = &warning.location {
                eprintln!("  --> {}", loc);
            }
        }
        if !analysis.warnings.is_empty() {
            println!();
        }

        println!("✓ {} is valid\n", root.display());

        let files = analysis.files.len();
        let symbols = analysis.table.len();
        println!("  {} schema file{}", files, if files == 1 { "" } else { "s" });
        println!(
            "  {} linked symbol{}",
            symbols,
            if symbols == 1 { "" } else { "s" }
        );

        Ok(())
    }
}
