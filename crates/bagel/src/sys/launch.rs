use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Shell-style command line run when a leaf is selected.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ExecCommand(String);

glide::impl_string_newtype!(ExecCommand);

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Command is empty")]
    Empty,
    #[error("Failed to parse command '{command}': {source}")]
    Parse {
        command: String,
        source: shell_words::ParseError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn argv(exec: &ExecCommand) -> Result<Vec<String>, LaunchError> {
    let args = shell_words::split(exec).map_err(|source| LaunchError::Parse {
        command: exec.to_string(),
        source,
    })?;
    if args.is_empty() {
        return Err(LaunchError::Empty);
    }
    Ok(args)
}

pub fn launch(exec: &ExecCommand) -> Result<(), LaunchError> {
    let args = argv(exec)?;
    let (program, rest) = args.split_first().ok_or(LaunchError::Empty)?;

    Command::new(program)
        .args(rest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    log::info!("Launched '{}'", exec);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_splits_quotes() {
        let args = argv(&ExecCommand::from("notify-send 'Hello there' -t 500")).unwrap();
        assert_eq!(args, vec!["notify-send", "Hello there", "-t", "500"]);
    }

    #[test]
    fn test_argv_rejects_empty_and_unbalanced() {
        assert!(matches!(argv(&ExecCommand::from("   ")), Err(LaunchError::Empty)));
        assert!(matches!(
            argv(&ExecCommand::from("echo 'oops")),
            Err(LaunchError::Parse { .. })
        ));
    }
}
