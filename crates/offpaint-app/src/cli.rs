use clap::Parser;

/// offpaint: drives a simulated renderer through the off-screen paint
/// transport and logs every step.
#[derive(Parser, Debug)]
#[command(name = "offpaint", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log directive override (e.g. `offpaint=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of frames to simulate; overrides `demo.frames`.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub dump_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
