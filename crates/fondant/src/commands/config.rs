use clap::Parser;
use fondant_config::FondantConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Print the effective configuration as TOML")]
pub struct ConfigArgs {
    /// Config file (defaults to ./fondant.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> bool {
    match FondantConfig::load(args.config.as_deref()).and_then(|c| c.to_toml()) {
        Ok(toml) => {
            print!("{toml}");
            true
        }
        Err(e) => {
            eprintln!("[config] ERROR: {e:#}");
            false
        }
    }
}
