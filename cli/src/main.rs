use std::io::{Stdout, StdinLock};
use std::path::PathBuf;

use clap::Parser;
use plugin_shell_core::Execution;
use plugin_shell_registry::{PluginRegistry, ShellConfig};
use plugin_shell_resolver::{ExecutionParser, ResolutionError, Shell, ShellError, StdioShell};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

type StdioParser<'r> = ExecutionParser<'r, PluginRegistry, StdioShell<StdinLock<'static>, Stdout>>;

#[derive(Debug, Parser)]
#[command(name = "plugin-shell")]
#[command(about = "Interactive shell resolving plugin commands from declarative metadata")]
#[command(version)]
struct Cli {
    /// Shell configuration file (YAML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Plugin directories or bundle files; replaces the configured sources.
    #[arg(long = "plugins", value_name = "PATH")]
    plugins: Vec<PathBuf>,
    /// Report unrecognized tokens instead of rejecting the line.
    #[arg(long)]
    lenient: bool,
    /// Resolve a single line, print it and exit.
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    command: Option<String>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

// RUST_LOG controls verbosity; diagnostics go to stderr so stdout stays JSON.
fn init_tracing() {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: tracing subscriber already installed");
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli)?;
    let registry = config
        .load_registry()
        .map_err(|err| format!("Failed to load plugins: {err}"))?;
    info!(
        plugins = registry.len(),
        strict = config.strict_parsing,
        "plugin registry loaded"
    );

    let mut parser =
        ExecutionParser::new(&registry, StdioShell::stdio()).strict(config.strict_parsing);

    match cli.command {
        Some(line) => run_once(&mut parser, &line),
        None => run_repl(&mut parser, &registry, &config.prompt),
    }
}

fn load_config(cli: &Cli) -> Result<ShellConfig, String> {
    let mut config = match &cli.config {
        Some(path) => ShellConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ShellConfig::default(),
    };

    if !cli.plugins.is_empty() {
        config.plugin_sources = cli.plugins.clone();
    }
    if cli.lenient {
        config.strict_parsing = false;
    }
    Ok(config)
}

fn run_once(parser: &mut StdioParser<'_>, line: &str) -> Result<(), String> {
    let execution = parser.parse(line).map_err(|err| err.to_string())?;
    if !execution.is_resolved() {
        return Err(format!("unknown command: {line}"));
    }
    let json = render_execution(&execution)?;
    emit(parser, &json)
}

fn run_repl(
    parser: &mut StdioParser<'_>,
    registry: &PluginRegistry,
    prompt: &str,
) -> Result<(), String> {
    loop {
        let line = match parser.shell_mut().read_line(prompt) {
            Ok(line) => line,
            Err(ShellError::Closed) => break,
            Err(err) => return Err(err.to_string()),
        };

        // Keywords match on the trimmed text; resolution sees the raw line.
        match line.trim() {
            "" => continue,
            "exit" | "quit" => break,
            "plugins" => {
                for entry in describe_plugins(registry) {
                    emit(parser, &entry)?;
                }
            }
            command => match parser.parse(&line) {
                Ok(execution) if execution.is_resolved() => {
                    let json = render_execution(&execution)?;
                    emit(parser, &json)?;
                }
                Ok(_) => emit(parser, &format!("unknown command: {command}"))?,
                Err(ResolutionError::Shell(ShellError::Closed)) => break,
                Err(err) => eprintln!("error: {err}"),
            },
        }
    }

    debug!("leaving shell");
    Ok(())
}

fn render_execution(execution: &Execution<'_>) -> Result<String, String> {
    serde_json::to_string_pretty(execution)
        .map_err(|err| format!("Failed to serialize execution: {err}"))
}

fn emit(parser: &mut StdioParser<'_>, text: &str) -> Result<(), String> {
    parser
        .shell_mut()
        .println(text)
        .map_err(|err| format!("Failed to write output: {err}"))
}

fn describe_plugins(registry: &PluginRegistry) -> Vec<String> {
    if registry.is_empty() {
        return vec!["no plugins loaded".to_string()];
    }

    registry
        .plugins()
        .values()
        .map(|plugin| {
            let commands = plugin.command_names();
            let mut entry = if commands.is_empty() {
                plugin.name.clone()
            } else {
                format!("{}: {}", plugin.name, commands.join(", "))
            };
            if let Some(default) = &plugin.default_command {
                entry.push_str(&format!(" (default: {})", default.name));
            }
            entry
        })
        .collect()
}
