//! Command-line interface parsing and handling
//!
//! Without a subcommand the full-screen booking manager starts. The other
//! subcommands run one operation against the configured backend and print
//! the result.

pub mod listing;
pub mod say;

use std::error::Error;
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::listing::{print_bookings, print_calendar};
use crate::cli::say::run_say;
use crate::core::config::data::path_display;
use crate::core::config::store::ConfigStore;
use crate::core::manager::{BookingManager, InputError};
use crate::core::mode::ModeSelector;
use crate::core::transport::BookingQuery;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::{init_diagnostics, Transcript};

#[derive(Parser)]
#[command(name = "aastha")]
#[command(version)]
#[command(about = "A terminal booking manager for the Aastha booking assistant")]
#[command(
    long_about = "Aastha is a full-screen terminal front end for a hotel booking assistant. \
Chat with the assistant to make bookings; confirmed bookings show up in the Bookings \
and Calendar tabs.\n\n\
Environment Variables:\n\
  AASTHA_API_BASE_URL       Chat backend base URL (default http://localhost:3002)\n\
  AASTHA_BOOKINGS_BASE_URL  Booking backend base URL (defaults to the chat URL)\n\
  AASTHA_API_TOKEN          Bearer token sent with every request\n\
  AASTHA_ENV                development or production; picks the default API mode\n\
  RUST_LOG                  Diagnostics filter (default warn)\n\n\
Controls:\n\
  Tab/Shift+Tab     Switch between Chat, Bookings and Calendar\n\
  Enter             Send the message\n\
  Ctrl+T            Toggle mock/live API mode\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write diagnostics to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Record the chat transcript to the specified file
    #[arg(long, global = true, value_name = "FILE")]
    pub transcript: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the booking manager (default)
    Chat,
    /// Send one message to the assistant and print its reply
    Say {
        /// Message to send (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        message: Vec<String>,
    },
    /// List bookings in the current booking window
    Bookings,
    /// Show this month's calendar with bookings and highlighted dates
    Calendar,
    /// Show or set the API mode
    Mode {
        /// Mode to switch to; omit to show the current one
        mode: Option<ModeArg>,
    },
    /// Register the phone number bookings are looked up by
    Register {
        /// WhatsApp number, digits with optional country code
        number: String,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Mock,
    Live,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);
    init_diagnostics(args.log.as_deref(), matches!(command, Commands::Chat))?;

    let store = ConfigStore::open_default()?;
    let mut selector = ModeSelector::open(store)?;

    match command {
        Commands::Chat => {
            let transcript = Transcript::new(args.transcript)?;
            run_chat(BookingManager::new(selector), transcript).await
        }
        Commands::Say { message } => {
            let transcript = Transcript::new(args.transcript)?;
            run_say(message, &selector, &transcript).await
        }
        Commands::Bookings => {
            let settings = selector.settings();
            let query = BookingQuery::window(
                Local::now().date_naive(),
                settings.booking_months_ahead,
                settings.registered_number.clone(),
            );
            let bookings = selector.transport().fetch_bookings(&query).await;
            print_bookings(&query, &bookings);
            Ok(())
        }
        Commands::Calendar => {
            let mut manager = BookingManager::new(selector);
            manager.load_initial().await;
            print_calendar(&manager.month_grid(Local::now().date_naive()));
            Ok(())
        }
        Commands::Mode { mode } => {
            if let Some(mode) = mode {
                selector.set_mode(mode == ModeArg::Mock)?;
                println!("✅ Switched to {}", selector.mode().badge());
            } else {
                println!("{}", selector.mode().badge());
            }
            Ok(())
        }
        Commands::Register { number } => {
            if number.trim().is_empty() {
                return Err(InputError::EmptyPhone.into());
            }
            selector.set_registered_number(&number)?;
            println!("✅ Registered {}", number.trim());
            Ok(())
        }
        Commands::Config => {
            let config = selector.store().load()?;
            println!("Config file: {}", path_display(selector.store().path()));
            config.print_all();
            Ok(())
        }
    }
}
