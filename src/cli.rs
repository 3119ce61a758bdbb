// File: ./src/cli.rs
//! Command-line parsing and help text.
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one watch cycle from a captured site state.
    Run { snapshot: Option<PathBuf> },
    /// Write a config skeleton.
    Init { url: String },
    /// Forget the persisted appointment set.
    Reset,
    /// Print the persisted appointment set.
    State,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub root: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

/// Parses arguments (without the program name).
pub fn parse_args<I, S>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut root = None;
    let mut verbose = false;
    let mut snapshot = None;
    let mut positional: Vec<String> = Vec::new();

    let mut args = args.into_iter().map(Into::into);
    while let Some(a) = args.next() {
        match a.as_str() {
            "-h" | "--help" | "help" => {
                return Ok(CliArgs {
                    root,
                    verbose,
                    command: Command::Help,
                });
            }
            "-r" | "--root" => {
                root = Some(PathBuf::from(args.next().ok_or("Missing value for --root")?));
            }
            "-s" | "--snapshot" => {
                snapshot = Some(PathBuf::from(
                    args.next().ok_or("Missing value for --snapshot")?,
                ));
            }
            "-v" | "--verbose" => verbose = true,
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("Unknown option: {}", other));
            }
            _ => positional.push(a),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("run") => Command::Run { snapshot },
        Some("init") => Command::Init {
            url: positional
                .next()
                .ok_or("Missing reservation URL: slotwatch init <url>")?,
        },
        Some("reset") => Command::Reset,
        Some("state") => Command::State,
        Some(other) => return Err(format!("Unknown command: {}", other)),
    };
    if let Some(extra) = positional.next() {
        return Err(format!("Unexpected argument: {}", extra));
    }

    Ok(CliArgs {
        root,
        verbose,
        command,
    })
}

pub fn print_help(binary_name: &str) {
    println!(
        "Slotwatch v{} - Watches a driving-exam reservation for earlier slots",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [run] --snapshot <file.json|->   Run one watch cycle", binary_name);
    println!("    {} init <reservation-url>           Write a default config.toml", binary_name);
    println!("    {} state                            Show the last seen dates", binary_name);
    println!("    {} reset                            Forget the last seen dates", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>       Use a different directory for config and data.");
    println!("    -s, --snapshot <file>   Captured site state (JSON); '-' reads stdin.");
    println!("    -v, --verbose           Debug logging.");
    println!("    -h, --help              Show this help message.");
    println!();
    println!("CONFIG (config.toml):");
    println!("    [DEFAULT]   URL, DATE_LANGUAGES (\"de, fr\"), HEADLESS");
    println!("    [TELEGRAM]  ENABLED, TELEGRAM_BOT_TOKEN, CHAT_ID,");
    println!("                FORCE_NOTIFY, NOTIFY_ONLY_IF_EARLIER");
}
