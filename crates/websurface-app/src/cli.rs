use std::path::PathBuf;

use clap::Parser;
use websurface_common::{next_surface_id, SurfaceId};

/// websurface: replay a scripted session against a headless surface and
/// print the host events it produces as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "websurface", version, about)]
pub struct Args {
    /// Scenario file (JSON) to replay.
    #[arg(required_unless_present = "print_config")]
    pub scenario: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Identity given to the surface. Allocated when omitted.
    #[arg(long)]
    pub surface_id: Option<u32>,
}

impl Args {
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id.map(SurfaceId).unwrap_or_else(next_surface_id)
    }

    /// The tracing filter directive to use, if overridden.
    pub fn log_directive(&self) -> Option<String> {
        self.log_level.as_deref().map(|level| {
            if level.contains('=') {
                level.to_string()
            } else {
                format!("websurface={level}")
            }
        })
    }
}

pub fn parse() -> Args {
    Args::parse()
}
