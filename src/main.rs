use clap::Parser;
use smart_tasks::{
    Cli, Dispatcher, OutputFormatter, OutputMode, SmartTasks, TaskError, UserFriendlyError,
};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(&cli);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match SmartTasks::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    tracing::info!(
        version = smart_tasks::version_info(),
        log_file = %app.config().log.file.display(),
        "starting interactive menu"
    );

    let sink = app.log_sink();
    let stdin = io::stdin();
    let mut dispatcher = Dispatcher::new(&app, &sink, stdin.lock(), io::stdout());

    match dispatcher.run() {
        Ok(()) => 0,
        Err(e) => {
            let _ = app
                .output_formatter()
                .print_user_friendly_error(&mut io::stderr(), &e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "smart-tasks.toml".to_string());

    match SmartTasks::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  smart-tasks --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &TaskError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    let _ = formatter.print_user_friendly_error(&mut io::stderr(), error);
}

fn setup_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.tracing_filter()));

    // Diagnostics go to stderr so they never mix with menu prompts.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
