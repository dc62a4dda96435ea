use clap::{Parser, Subcommand};
use serde_json::Value;

use userlist::config::Config;
use userlist::{Storage, UserListStore};

/// Manage a persisted list of user records
#[derive(Debug, Parser)]
#[command(name = "userlist", version, about)]
pub struct Args {
  /// Path to a TOML configuration file
  #[arg(short, long, global = true)]
  pub config: Option<String>,

  /// Override the slot directory of the file backend
  #[arg(long, global = true)]
  pub data_dir: Option<String>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
  /// Print every user with its position
  List,
  /// Append a user given as JSON
  Add { user: String },
  /// Replace the user at a position
  Update { position: usize, user: String },
  /// Remove the user at a position
  Remove { position: usize },
}

impl Args {
  /// Resolve the effective configuration from the file and overrides
  pub fn load_config(&self) -> anyhow::Result<Config> {
    let mut config = match &self.config {
      Some(path) => Config::from_file(path).map_err(|e| anyhow::anyhow!(e))?,
      None => Config::default(),
    };
    if let Some(dir) = &self.data_dir {
      config.storage.path = dir.clone();
    }
    Ok(config)
  }
}

fn parse_user(raw: &str) -> anyhow::Result<Value> {
  serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("invalid user JSON '{}': {}", raw, e))
}

/// Run one command against the store and return what should be printed
pub fn execute<S: Storage>(
  command: &Command,
  store: &mut UserListStore<S>,
) -> anyhow::Result<String> {
  match command {
    Command::List => {
      let mut out = String::new();
      for (position, user) in store.users().iter().enumerate() {
        out.push_str(&format!("{}: {}\n", position, serde_json::to_string_pretty(user)?));
      }
      Ok(out)
    }
    Command::Add { user } => {
      store.add_user(parse_user(user)?)?;
      Ok(format!("added user at position {}\n", store.len() - 1))
    }
    Command::Update { position, user } => {
      store.update_user(*position, parse_user(user)?)?;
      Ok(format!("updated user at position {}\n", position))
    }
    Command::Remove { position } => {
      store.remove_user(*position)?;
      Ok(format!("removed user at position {}\n", position))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use userlist::storage::MemoryStorage;

  #[test]
  fn test_parse_args() {
    let args = Args::parse_from(["userlist", "--data-dir", "/tmp/x", "update", "1", "{\"name\":\"Z\"}"]);
    assert_eq!(args.data_dir.as_deref(), Some("/tmp/x"));
    assert_eq!(
      args.command,
      Command::Update {
        position: 1,
        user: "{\"name\":\"Z\"}".to_string(),
      }
    );

    let config = args.load_config().unwrap();
    assert_eq!(config.storage.path, "/tmp/x");
  }

  #[test]
  fn test_execute_commands() {
    let storage = MemoryStorage::new();
    let mut store = UserListStore::new(&storage);

    let out = execute(&Command::Add { user: "{\"name\":\"A\"}".to_string() }, &mut store).unwrap();
    assert_eq!(out, "added user at position 0\n");
    execute(&Command::Add { user: "\"B\"".to_string() }, &mut store).unwrap();

    let out = execute(&Command::List, &mut store).unwrap();
    assert_eq!(out, "0: {\n  \"name\": \"A\"\n}\n1: \"B\"\n");

    execute(&Command::Remove { position: 0 }, &mut store).unwrap();
    assert_eq!(store.users(), &[json!("B")]);
  }

  #[test]
  fn test_execute_errors() {
    let storage = MemoryStorage::new();
    let mut store = UserListStore::new(&storage);

    assert!(execute(&Command::Add { user: "{oops".to_string() }, &mut store).is_err());
    let err = execute(&Command::Remove { position: 3 }, &mut store).unwrap_err();
    assert_eq!(err.to_string(), "position 3 out of range for 0 users");
    assert!(store.is_empty());
  }
}
