use clap::Parser;
use miette::Result;
use pagekit::cli::{Cli, Commands, OutputFormat};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_logging(global.verbose);
    if global.format == OutputFormat::Text {
        console::set_colors_enabled(false);
    }

    match cli.command {
        Commands::Validate(args) => pagekit::cli::commands::validate::run(args, &global),
        Commands::Render(args) => pagekit::cli::commands::render::run(args, &global),
        Commands::Catalog(cmd) => pagekit::cli::commands::catalog::run(cmd, &global),
        Commands::Prompt(args) => pagekit::cli::commands::prompt::run(args, &global),
        Commands::Generate(args) => pagekit::cli::commands::generate::run(args, &global),
        Commands::Completions(args) => pagekit::cli::commands::completions::run(args),
    }
}

/// Log to stderr, filtered by PAGEKIT_LOG (or debug with --verbose)
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("pagekit=debug")
    } else {
        EnvFilter::try_from_env("PAGEKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
