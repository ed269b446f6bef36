use clap::Parser;

/// Report which OS users are using which GPUs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gpuwho",
    about = "Report which OS users are using which GPUs",
    version
)]
pub struct Settings {
    /// Show one row per process instead of the per-(gpu, user) summary
    #[arg(long)]
    pub verbose: bool,
}
