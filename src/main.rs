use anyhow::Result;
use clap::Parser;

use tedit::cli::{self, CliArgs};
use tedit::EditorConfig;

fn main() -> Result<()> {
    tedit::tracing::init();

    let args = CliArgs::parse();
    let config = EditorConfig::load();

    args.check(&config)?;
    if let Some(pattern) = args.pattern() {
        cli::remember_pattern(&config, pattern);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    args.run(&config, &mut out)
}
