//! `bmitrack` - CLI for the BMI tracker and password generator
//!
//! Each subcommand runs one handler synchronously and exits. Errors are
//! reported on stderr and end the process with a failure status.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;

use bmitrack::cli::{
    CalcCommand, Cli, Command, ConfigCommand, ExportCommand, HistoryCommand, PasswordCommand,
};
use bmitrack::{init_logging, App, Config, ExportOutcome};
use bmitrack_passgen::{ClipboardSink, SystemClipboard};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Password(cmd) => handle_password(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
        command => {
            let app = App::open(config)?;
            let result = dispatch(&app, command);
            app.finish(result)
        }
    }
}

fn dispatch(app: &App, command: Command) -> CliResult {
    match command {
        Command::Calc(cmd) => handle_calc(app, &cmd),
        Command::History(cmd) => handle_history(app, &cmd),
        Command::Export(cmd) => handle_export(app, &cmd),
        Command::Feedback(cmd) => handle_feedback(app, &cmd.message()),
        Command::Status(cmd) => handle_status(app, cmd.json),
        Command::Password(_) | Command::Config(_) => Ok(()),
    }
}

fn handle_calc(app: &App, cmd: &CalcCommand) -> CliResult {
    let record = app.calculate(&cmd.user, &cmd.weight, &cmd.height)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", record.assessment());
    }
    Ok(())
}

fn handle_history(app: &App, cmd: &HistoryCommand) -> CliResult {
    if cmd.json {
        let records = app.records(&cmd.user)?;
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let Some(chart) = app.history(&cmd.user)? else {
        println!("No records found for this user.");
        return Ok(());
    };

    let width = cmd.width.unwrap_or(app.config().chart.width);
    let height = cmd.height.unwrap_or(app.config().chart.height);
    print!("{}", chart.render_text(width, height));
    Ok(())
}

fn handle_export(app: &App, cmd: &ExportCommand) -> CliResult {
    match app.export(&cmd.user, &cmd.path)? {
        ExportOutcome::NoData => println!("No records found to export."),
        ExportOutcome::Written { path, rows } => {
            println!(
                "History exported successfully to {} ({rows} records)",
                path.display()
            );
        }
    }
    Ok(())
}

fn handle_feedback(app: &App, message: &str) -> CliResult {
    if app.submit_feedback(message)? {
        println!("Thank you for your feedback!");
    } else {
        println!("Feedback was empty; nothing recorded.");
    }
    Ok(())
}

fn handle_status(app: &App, json: bool) -> CliResult {
    let stats = app.stats()?;
    if json {
        let status = serde_json::json!({
            "database_path": app.storage().path(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("bmitrack status");
        println!("---------------");
        println!("Database:      {}", app.storage().path().display());
        println!("Records:       {}", stats.total_records);
        println!("Users:         {}", stats.total_users);
        if let (Some(oldest), Some(newest)) = (stats.oldest_record, stats.newest_record) {
            println!("Oldest:        {}", oldest.format("%Y-%m-%d %H:%M:%S"));
            println!("Newest:        {}", newest.format("%Y-%m-%d %H:%M:%S"));
        }
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_password(config: &Config, cmd: &PasswordCommand) -> CliResult {
    let request = cmd.to_request(&config.password)?;
    let password = bmitrack_passgen::generate(&request)?;
    println!("{password}");

    if cmd.copy {
        if bmitrack_passgen::clipboard::OWNER_MUST_STAY_ALIVE {
            eprintln!(
                "Serving the clipboard for up to {}s or until something else is copied...",
                config.password.clipboard_hold_secs
            );
        }
        SystemClipboard::with_hold(config.password.clipboard_hold()).set_text(&password)?;
        eprintln!("Password copied to clipboard!");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Feedback]");
                println!("  Feedback path:      {}", config.feedback_path().display());
                println!();
                println!("[Chart]");
                println!(
                    "  Size:               {}x{}",
                    config.chart.width, config.chart.height
                );
                println!();
                println!("[Password]");
                println!("  Length:             {}", config.password.length);
                println!("  Letters:            {}", config.password.letters);
                println!("  Numbers:            {}", config.password.numbers);
                println!("  Symbols:            {}", config.password.symbols);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
