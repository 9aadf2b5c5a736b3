use anyhow::{anyhow, Context, Result};
use log::debug;
use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use crate::config::Config;

/// Runs one gcloud invocation and returns its captured stdout.
///
/// Arguments exclude the executable itself, e.g. `["config", "configurations", "list"]`.
pub trait CommandRunner {
    fn run(&self, args: &[String]) -> Result<String>;
}

pub struct GcloudRunner {
    config: Config,
    executable: OnceLock<PathBuf>,
}

impl GcloudRunner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            executable: OnceLock::new(),
        }
    }

    /// Located once, then reused for the rest of the process.
    pub fn executable(&self) -> &PathBuf {
        self.executable.get_or_init(|| {
            let resolved = resolve_executable(&self.config);
            debug!("Using gcloud at {}", resolved.display());
            resolved
        })
    }
}

fn resolve_executable(config: &Config) -> PathBuf {
    if let Some(path) = &config.gcloud_override {
        return path.clone();
    }
    config
        .gcloud_candidates()
        .into_iter()
        .find(|c| c.is_file())
        .unwrap_or_else(|| PathBuf::from("gcloud"))
}

impl CommandRunner for GcloudRunner {
    fn run(&self, args: &[String]) -> Result<String> {
        let display = format!("gcloud {}", args.join(" "));
        debug!("Running `{}`", display);

        let output = Command::new(self.executable())
            .args(args)
            .env("PATH", self.config.extended_path())
            .output()
            .with_context(|| format!("Failed to run `{}`", display))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let status = output
                .status
                .code()
                .map_or("terminated by signal".to_string(), |c| format!("exit status {}", c));
            return Err(if stderr.is_empty() {
                anyhow!("`{}` failed ({})", display, status)
            } else {
                anyhow!("`{}` failed ({}): {}", display, status, stderr)
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    type Reply = std::result::Result<String, String>;

    /// Records every invocation; replies from canned outputs keyed by the joined args.
    ///
    /// Replies queued for the same command are consumed in order; the last one repeats.
    #[derive(Default)]
    pub struct FakeRunner {
        calls: RefCell<Vec<String>>,
        replies: RefCell<HashMap<String, VecDeque<Reply>>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        fn push(self, command: &str, reply: Reply) -> Self {
            self.replies
                .borrow_mut()
                .entry(command.to_string())
                .or_default()
                .push_back(reply);
            self
        }

        pub fn reply(self, command: &str, output: &str) -> Self {
            self.push(command, Ok(output.to_string()))
        }

        pub fn fail(self, command: &str, message: &str) -> Self {
            self.push(command, Err(message.to_string()))
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, args: &[String]) -> Result<String> {
            let command = args.join(" ");
            self.calls.borrow_mut().push(command.clone());

            let mut replies = self.replies.borrow_mut();
            let reply = match replies.get_mut(&command) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            };
            match reply {
                Some(Ok(output)) => Ok(output),
                Some(Err(message)) => Err(anyhow!("{}", message)),
                None => Ok(String::new()),
            }
        }
    }
}
