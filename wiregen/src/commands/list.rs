use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use wiregen_codegen::discover;
use wiregen_schema::Decl;

use super::UnwrapOrExit;
use crate::config::Config;

#[derive(Args)]
pub struct ListCommand {
    /// Directory searched for schema files (defaults to wiregen.toml or .)
    pub root: Option<PathBuf>,

    /// Path to wiregen.toml (defaults to ./wiregen.toml)
    #[arg(short, long, default_value = "wiregen.toml")]
    pub config: PathBuf,
}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let config = Config::load(&self.config)?.generate;
        let root = self
            .root
            .clone()
            .or(config.src)
            .unwrap_or_else(|| PathBuf::from("."));

        let entries = discover(&root).unwrap_or_exit();
        if entries.is_empty() {
            println!("No schema files under {}", root.display());
            return Ok(());
        }

        // Parse-only: declarations are shown as written, before
        // qualifier stripping and nested-type flattening.
        for (index, entry) in entries.iter().enumerate() {
            if index > 0 {
                println!();
            }
            let file = wiregen_schema::parse_file(&entry.path).unwrap_or_exit();
            match &file.package {
                Some(package) => println!("{} (package {})", entry.rel.display(), package),
                None => println!("{}", entry.rel.display()),
            }
            for import in &file.public_imports {
                println!("  import public \"{}\"", import);
            }
            for import in &file.imports {
                println!("  import \"{}\"", import);
            }
            for decl in &file.decls {
                match decl {
                    Decl::Message(message) => println!(
                        "  message {} ({})",
                        message.name,
                        count(message.fields.len(), "field")
                    ),
                    Decl::Enum(decl) => {
                        println!("  enum {} ({})", decl.name, count(decl.values.len(), "value"))
                    }
                    Decl::Service(service) => println!(
                        "  service {} ({})",
                        service.name,
                        count(service.rpcs.len(), "rpc")
                    ),
                }
            }
        }

        Ok(())
    }
}

fn count(n: usize, noun: &str) -> String {
    format!("{} {}{}", n, noun, if n == 1 { "" } else { "s" })
}
