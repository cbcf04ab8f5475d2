use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use wiregen_codegen::pipeline::Warning;
use wiregen_codegen::{ConvertOptions, Converter, Preview};
use wiregen_codegen_rust::RustGenerator;

use super::UnwrapOrExit;
use crate::config::Config;
use crate::reports::{
    GenerateReport, GenerationResult, PreviewResult, PreviewUnit, Report, TerminalOutput,
    WrittenResult,
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Directory searched for schema files (defaults to wiregen.toml or .)
    #[arg(short, long)]
    pub src: Option<PathBuf>,

    /// Directory generated code is written to (defaults to wiregen.toml or generated)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Module the generated tree is mounted under in import paths
    #[arg(short, long)]
    pub module: Option<String>,

    /// Process schema files sequentially instead of fanning out across threads
    #[arg(long)]
    pub no_fork: bool,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,

    /// Path to wiregen.toml (defaults to ./wiregen.toml)
    #[arg(short, long, default_value = "wiregen.toml")]
    pub config: PathBuf,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let config = Config::load(&self.config)?.generate;

        // CLI flags win over wiregen.toml, which wins over defaults.
        let src = self
            .src
            .clone()
            .or(config.src)
            .unwrap_or_else(|| PathBuf::from("."));
        let out = self
            .out
            .clone()
            .or(config.out)
            .unwrap_or_else(|| PathBuf::from("generated"));
        let mut options = ConvertOptions::default();
        if let Some(module) = self.module.clone().or(config.module) {
            options.module = module;
        }
        options.no_fork = self.no_fork || config.no_fork.unwrap_or(false);

        let converter = Converter::new(RustGenerator, options);

        let report = if self.dry_run {
            let Preview {
                units,
                failures,
                warnings,
            } = converter.preview(&src).unwrap_or_exit();
            print_warnings(&warnings);
            GenerateReport {
                failures: failures.iter().map(ToString::to_string).collect(),
                result: GenerationResult::Preview(PreviewResult {
                    units: units
                        .into_iter()
                        .map(|unit| PreviewUnit {
                            path: unit.rel_path().display().to_string(),
                            content: unit.content().to_string(),
                        })
                        .collect(),
                }),
            }
        } else {
            let outcome = converter.convert(&src, &out).unwrap_or_exit();
            print_warnings(&outcome.warnings);
            GenerateReport {
                failures: outcome.failures.iter().map(ToString::to_string).collect(),
                result: GenerationResult::Written(WrittenResult {
                    out_root: out,
                    module: converter.options().module.clone(),
                    schema_files: outcome.files,
                    written: outcome.written,
                }),
            }
        };

        let clean = report.is_clean();
        report.render(&mut TerminalOutput::new());

        if !clean {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("{}", warning);
    }
}
