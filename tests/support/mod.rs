#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use immich_bootstrap::ProvisionResult;
use immich_bootstrap::cmd::{CommandOutput, Runner};

/// A command seen by [`Recorder`], with any stdin it was fed.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub command: String,
    pub stdin: Option<String>,
}

/// Runner that records commands instead of executing them.
/// Commands containing the `fail_on` needle exit with the given
/// code.
#[derive(Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<Recorded>>>,
    fail_on: Option<(String, i32)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, needle: &str, code: i32) -> Self {
        self.fail_on = Some((needle.to_string(), code));
        self
    }

    /// Shared handle to the log, readable after the recorder has
    /// been moved into a pipeline.
    pub fn log(&self) -> Rc<RefCell<Vec<Recorded>>> {
        Rc::clone(&self.log)
    }
}

impl Runner for Recorder {
    fn exec(&self, command: &str, stdin: Option<&[u8]>) -> ProvisionResult<CommandOutput> {
        self.log.borrow_mut().push(Recorded {
            command: command.to_string(),
            stdin: stdin.map(|s| String::from_utf8_lossy(s).to_string()),
        });

        match &self.fail_on {
            Some((needle, code)) if command.contains(needle.as_str()) => Ok(CommandOutput {
                command: command.to_string(),
                code: Some(*code),
                stdout: String::new(),
                stderr: format!("{command}: simulated failure"),
            }),
            _ => Ok(CommandOutput::ok(command, "")),
        }
    }
}

pub fn commands(log: &Rc<RefCell<Vec<Recorded>>>) -> Vec<String> {
    log.borrow().iter().map(|r| r.command.clone()).collect()
}

pub const ENV: &str = "\
# Immich environment
UPLOAD_LOCATION=./library
DB_DATA_LOCATION=./postgres

DB_PASSWORD=postgres
DB_USERNAME=postgres
";

pub const NGINX_CONF: &str = "\
user www-data;

http {
\tsendfile on;
\ttcp_nopush on;
\ttypes_hash_max_size 2048;
\tinclude /etc/nginx/mime.types;
}
";

pub const COMPOSE: &str = "\
services:
  immich-server:
    image: ghcr.io/immich-app/immich-server:release
    ports:
      - '2283:2283'
    restart: always
  database:
    image: docker.io/tensorchord/pgvecto-rs:pg14-v0.2.0
    restart: always
";
