mod bootstrap_helpers;
mod cli_args;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use boxen_engine::{find_cli, CliImplementation, Context, Session};
use boxen_model::{BoxModel, ModelRoot};
use boxen_render::TemplateStore;
use clap::Parser;

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;

/// CLI implementations built into this binary.
const REGISTRY: &[CliImplementation] = &[boxen_example_switch::CLI];

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&cli, REGISTRY, &mut stdin.lock(), &mut stdout.lock())
}

fn run(
    cli: &Cli,
    registry: &[CliImplementation],
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<()> {
    if cli.list_clis {
        for implementation in registry {
            writeln!(
                output,
                "Vendor {}, model {}, version {}",
                implementation.vendor, implementation.model, implementation.version
            )?;
        }
        return Ok(());
    }

    let Some(model_file) = cli.model_file.as_deref() else {
        bail!("--model-file is required");
    };
    let root = load_model_root(model_file)?;

    if cli.list_boxen {
        for model in &root.boxen {
            writeln!(
                output,
                "Vendor {}, model {}, version {}, instance {}",
                model.vendor, model.model, model.version, model.uuid
            )?;
        }
        return Ok(());
    }

    let Some(uuid) = cli.box_uuid.as_deref() else {
        bail!("--box-uuid is required");
    };
    let mut model = root.into_box(uuid)?;
    tracing::debug!(uuid, "found requested box");

    let implementation = find_cli(registry, &model.vendor, &model.model, &model.version)?;
    let template_root = cli
        .template_root
        .clone()
        .unwrap_or_else(boxen_example_switch::default_template_root);
    run_box(implementation, &mut model, &template_root, input, output)
}

fn load_model_root(path: &Path) -> Result<ModelRoot> {
    ModelRoot::load(path).with_context(|| format!("cannot load boxen from {}", path.display()))
}

fn run_box(
    implementation: &CliImplementation,
    model: &mut BoxModel,
    template_root: &Path,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<()> {
    let renderer = TemplateStore::from_dir(template_root);
    let mut session = Session::new(model, &renderer, input, output);
    let mut context = Context::new();
    (implementation.run)(&mut session, &mut context)?;
    tracing::debug!("CLI session ended");
    Ok(())
}
