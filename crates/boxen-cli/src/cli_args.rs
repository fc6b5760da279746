use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "boxen",
    about = "Command-line simulator of network equipment",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long = "model-file",
        env = "BOXEN_MODEL_FILE",
        help = "JSON document describing the simulated boxen"
    )]
    pub(crate) model_file: Option<PathBuf>,

    #[arg(
        long = "template-root",
        env = "BOXEN_TEMPLATE_ROOT",
        help = "Top directory of CLI output templates. Defaults to the templates shipped with the CLI implementation"
    )]
    pub(crate) template_root: Option<PathBuf>,

    #[arg(
        long = "list-clis",
        help = "Print the installed CLI implementations and exit"
    )]
    pub(crate) list_clis: bool,

    #[arg(
        long = "list-boxen",
        help = "Print the boxen found in --model-file and exit"
    )]
    pub(crate) list_boxen: bool,

    #[arg(
        long = "box-uuid",
        env = "BOXEN_BOX_UUID",
        help = "Run a CLI session backed by the box with this UUID"
    )]
    pub(crate) box_uuid: Option<String>,
}
