mod app;
mod config;
mod day;
mod help;
mod strip;
mod theme;
use crate::app::App;
use crate::config::{Config, YMD_FMT};
use crate::strip::WeekStrip;
use anyhow::Context;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};

const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        config: Option<PathBuf>,
        log_file: Option<PathBuf>,
        date: Option<Date>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = None;
        let mut log_file = None;
        let mut date = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => {
                    log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            config,
            log_file,
            date,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                config,
                log_file,
                date,
            } => {
                // Log output would garble the screen, so there is no logging
                // without a file to log to
                let _logger = log_file.map(init_logging).transpose()?;
                let config = Config::load_suitable(config.as_deref())
                    .context("failed to load configuration")?;
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                log::info!("Starting up; today is {today}");
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    let mut strip = WeekStrip::new(today, config);
                    if let Some(date) = date {
                        strip = strip.start_date(date);
                    }
                    App::new(strip).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: calday [<options>] [YYYY-MM-DD]");
                println!();
                println!("Terminal week strip for picking a day");
                println!();
                println!("Options:");
                println!("  -c PATH, --config PATH");
                println!("                    Read configuration from the given file");
                println!();
                println!("  --log-file PATH   Write log messages to the given file");
                println!();
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: PathBuf) -> anyhow::Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?
        .log_to_file(FileSpec::try_from(path)?)
        .start()
        .context("failed to start logger")?;
    Ok(handle)
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
