use clap::{Parser, Subcommand};
use patchnova::config::{default_config_path, load_config};
use patchnova::dialogs::{Dialogs, TerminalDialogs};
use patchnova::display::{render_host_profile, render_menu};
use patchnova::App;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "patchnova")]
#[command(about = "Show host information and run OS and software update checks")]
#[command(version)]
struct Cli {
    /// Enable debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Config file to use instead of the per-user one
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Print host identification
    Info,
    /// Run the operating system's update workflow
    Update {
        /// Skip the consent prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// Check installed software for newer versions
    Software,
    /// Move the history and error logs to another directory
    LogLocation {
        /// Target directory; prompts when omitted
        dir: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", config_path.display(), err);
            return ExitCode::from(78);
        }
    };

    let mut app = App::detect(config, config_path);
    let mut dialogs = TerminalDialogs::stdio();
    let colored = std::io::stdout().is_terminal();

    match cli.command {
        Some(Commands::Info) => {
            println!("{}", render_host_profile(&app.hardware_info(), colored));
        }
        Some(Commands::Update { yes: true }) => {
            app.update_with_consent(true, &mut dialogs);
        }
        Some(Commands::Update { yes: false }) => {
            app.check_updates(&mut dialogs);
        }
        Some(Commands::Software) => {
            app.check_software_updates(&mut dialogs);
        }
        Some(Commands::LogLocation { dir: Some(dir) }) => {
            if !dir.is_dir() {
                eprintln!("Not a directory: {}", dir.display());
                return ExitCode::from(2);
            }
            if let Err(err) = app.relocate_logs(&dir) {
                eprintln!("Could not save log location: {}", err);
                return ExitCode::FAILURE;
            }
            println!("Log files will be saved in: {}", dir.display());
        }
        Some(Commands::LogLocation { dir: None }) => {
            app.choose_log_location(&mut dialogs);
        }
        None => {
            if let Err(err) = interactive(&mut app, &mut dialogs, colored) {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Menu loop standing in for the main window; returns when the user quits
fn interactive<R: BufRead, W: Write>(
    app: &mut App,
    dialogs: &mut TerminalDialogs<R, W>,
    colored: bool,
) -> patchnova::Result<()> {
    writeln!(dialogs.output(), "{}\n", render_host_profile(&app.hardware_info(), colored))?;

    loop {
        writeln!(dialogs.output(), "{}", render_menu())?;
        let Some(choice) = dialogs.prompt("> ")? else {
            return Ok(());
        };

        match choice.to_lowercase().as_str() {
            "1" => {
                writeln!(dialogs.output(), "{}", render_host_profile(&app.hardware_info(), colored))?;
                app.check_updates(dialogs);
            }
            "2" => {
                app.check_software_updates(dialogs);
            }
            "3" => {
                app.choose_log_location(dialogs);
            }
            "4" => {
                writeln!(dialogs.output(), "{}", render_host_profile(&app.hardware_info(), colored))?;
            }
            "q" | "quit" | "exit" => return Ok(()),
            "" => {}
            other => dialogs.show("Unknown choice", &format!("'{}' is not a menu option", other)),
        }
    }
}
