mod cli;

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Args;
use userlist::UserListStore;
use userlist::config::LogConfig;
use userlist::storage;

fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(true);

  match &log.file {
    Some(path) => {
      let file = OpenOptions::new().create(true).append(true).open(path)?;
      builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    None => builder.with_writer(std::io::stderr).init(),
  }
  Ok(())
}

fn main() -> anyhow::Result<()> {
  let args = Args::parse();
  let config = args.load_config()?;
  init_logging(&config.log)?;

  info!("Starting userlist {}", env!("CARGO_PKG_VERSION"));
  debug!("Configuration: {:?}", config);

  let storage = storage::open(&config.storage)?;
  let mut store = UserListStore::new(storage);
  info!("Loaded {} users", store.len());

  let output = cli::execute(&args.command, &mut store)?;
  print!("{}", output);

  Ok(())
}
