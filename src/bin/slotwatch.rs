use anyhow::{Context, Result};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use slotwatch::cli::{self, CliArgs, Command};
use slotwatch::config::Config;
use slotwatch::context::{AppContext, StandardContext};
use slotwatch::driver::SnapshotDriver;
use slotwatch::message::format_slot;
use slotwatch::notify::TelegramNotifier;
use slotwatch::runner::run_cycle;
use slotwatch::storage::{DateStore, FileDateStore};
use std::env;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match cli::parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Try 'slotwatch --help'.");
            std::process::exit(2);
        }
    };

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new().add_filter_allow_str("slotwatch").build();
    let _ = TermLogger::init(level, log_config, TerminalMode::Mixed, ColorChoice::Auto);

    if let Err(e) = run(args).await {
        if Config::is_missing_config_error(&e) {
            eprintln!("Error: {:#}", e);
            eprintln!("Create one with 'slotwatch init <reservation-url>'.");
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let ctx = StandardContext::new(args.root);

    match args.command {
        Command::Help => {
            cli::print_help("slotwatch");
            Ok(())
        }
        Command::Init { url } => {
            let path = ctx.get_config_file_path()?;
            if path.exists() {
                anyhow::bail!("Config already exists at {}", path.display());
            }
            Config::template(&url).save(&ctx)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        Command::Reset => {
            let store = FileDateStore::from_context(&ctx)?;
            store.clear()?;
            println!("Cleared {}", store.path().display());
            Ok(())
        }
        Command::State => {
            let store = FileDateStore::from_context(&ctx)?;
            let dates = store.load();
            if dates.is_empty() {
                println!("No dates recorded.");
            }
            for slot in &dates {
                println!("{}", format_slot(slot));
            }
            Ok(())
        }
        Command::Run { snapshot } => {
            let config = Config::load(&ctx)?;
            let snapshot = snapshot.context(
                "No site driver available; pass a captured site state with --snapshot <file>",
            )?;
            let mut driver = SnapshotDriver::from_path(&snapshot, config.date_languages()?)?;
            let mut store = FileDateStore::from_context(&ctx)?;

            let notifier = if config.telegram_ready() {
                Some(TelegramNotifier::new(&config.telegram.telegram_bot_token)?)
            } else {
                None
            };

            log::info!("Checking {}", config.default.url);
            let report = run_cycle(&config, &mut driver, &mut store, notifier.as_ref()).await?;
            log::debug!("Cycle finished: {:?}", report.verdict);
            Ok(())
        }
    }
}
