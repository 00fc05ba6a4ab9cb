mod commands;

use clap::{Parser, Subcommand, builder::styling};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

#[derive(Parser)]
#[command(name = "fondant")]
#[command(about = "Bake vector fonts into bitmap font atlases")]
#[command(version = env!("FONDANT_VERSION"))]
#[command(long_version = env!("FONDANT_VERSION"))]
#[command(
    styles = styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Cyan.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a font into atlas pages and a BMFont descriptor
    Generate(commands::generate::GenerateArgs),
    /// Print the effective configuration as TOML
    Config(commands::config::ConfigArgs),
}

fn init_logging(verbose: &Verbosity<InfoLevel>) -> MultiProgress {
    let logger = env_logger::Builder::new()
        .filter_level(verbose.log_level_filter())
        .format_timestamp(None)
        .format_target(false)
        .build();
    let level = logger.filter();
    let progress = MultiProgress::new();

    if LogWrapper::new(progress.clone(), logger).try_init().is_ok() {
        log::set_max_level(level);
    }
    progress
}

fn main() {
    let cli = Cli::parse();
    let progress = init_logging(&cli.verbose);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args, &progress),
        Commands::Config(args) => commands::config::run(args),
    };

    std::process::exit(if result { 0 } else { 1 });
}
