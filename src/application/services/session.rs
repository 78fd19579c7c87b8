//! Line-oriented session over a single store
//!
//! A session owns one [`TeamStore`] for its whole lifetime and threads its
//! organization through every mutation. Scripts hold one command per line:
//!
//! ```text
//! # comment
//! ls                  list root teams
//! ls BU1              list children of BU1
//! add Team3 BU1       insert Team3 below BU1
//! add "Sales EMEA"    insert a root team (quote names with spaces)
//! rm BU1              remove every team named BU1
//! tree                render the hierarchy
//! orphans             list teams whose parent is gone
//! dump                print the current state as a seed snapshot
//! ```

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, Snapshot};
use crate::application::services::BrowserService;
use crate::domain::{Entity, Filters, TeamStore};

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    List { parent: Option<String> },
    Add { name: String, parent: Option<String> },
    Remove { name: String },
    Tree,
    Orphans,
    Dump,
}

impl SessionCommand {
    /// Parse one script line; blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let tokens = tokenize(trimmed)?;
        let (verb, args) = match tokens.split_first() {
            Some((verb, args)) => (verb.as_str(), args),
            None => return Ok(None),
        };

        let command = match (verb, args) {
            ("ls", []) => Self::List { parent: None },
            ("ls", [parent]) => Self::List {
                parent: Some(parent.clone()),
            },
            ("add", [name]) => Self::Add {
                name: name.clone(),
                parent: None,
            },
            ("add", [name, parent]) => Self::Add {
                name: name.clone(),
                parent: Some(parent.clone()),
            },
            ("rm", [name]) => Self::Remove { name: name.clone() },
            ("tree", []) => Self::Tree,
            ("orphans", []) => Self::Orphans,
            ("dump", []) => Self::Dump,
            ("ls" | "add" | "rm" | "tree" | "orphans" | "dump", _) => {
                return Err(format!("wrong number of arguments for '{verb}'"))
            }
            _ => return Err(format!("unknown command '{verb}'")),
        };
        Ok(Some(command))
    }
}

/// Result of one executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutput {
    Listing {
        parent: Option<String>,
        entities: Vec<Entity>,
    },
    Added {
        name: String,
        parent: Option<String>,
        success: bool,
    },
    Removed {
        name: String,
        success: bool,
    },
    Tree(String),
    Orphans(Vec<Entity>),
    Dump(String),
}

/// Session owning one store.
pub struct SessionService {
    store: TeamStore,
    organization: String,
    browser: BrowserService,
}

impl SessionService {
    pub fn new(store: TeamStore, organization: impl Into<String>, browser: BrowserService) -> Self {
        Self {
            store,
            organization: organization.into(),
            browser,
        }
    }

    pub fn store(&self) -> &TeamStore {
        &self.store
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn into_store(self) -> TeamStore {
        self.store
    }

    /// Execute a single parsed command.
    #[instrument(level = "debug", skip(self), fields(organization = %self.organization))]
    pub fn execute(&mut self, command: SessionCommand) -> ApplicationResult<SessionOutput> {
        let output = match command {
            SessionCommand::List { parent } => {
                let filters = match &parent {
                    Some(p) => Filters::children_of(p.as_str()),
                    None => Filters::roots(),
                };
                SessionOutput::Listing {
                    entities: self.store.list_children(&filters),
                    parent,
                }
            }
            SessionCommand::Add { name, parent } => {
                let success = self
                    .store
                    .insert(&name, &self.organization, parent.as_deref())?;
                SessionOutput::Added {
                    name,
                    parent,
                    success,
                }
            }
            SessionCommand::Remove { name } => {
                let success = self.store.remove(&name, &self.organization)?;
                SessionOutput::Removed { name, success }
            }
            SessionCommand::Tree => {
                let tree = self.browser.browse(&self.store);
                SessionOutput::Tree(self.browser.render(&tree, &self.organization))
            }
            SessionCommand::Orphans => SessionOutput::Orphans(self.store.orphans()),
            SessionCommand::Dump => {
                let toml = Snapshot::capture(&self.store).to_toml().map_err(|e| {
                    ApplicationError::OperationFailed {
                        context: "serialize snapshot".into(),
                        source: Box::new(e),
                    }
                })?;
                SessionOutput::Dump(toml)
            }
        };
        Ok(output)
    }

    /// Parse and execute one line; `line_no` is reported on failure.
    pub fn execute_line(
        &mut self,
        line_no: usize,
        line: &str,
    ) -> ApplicationResult<Option<SessionOutput>> {
        let command = SessionCommand::parse(line).map_err(|message| {
            ApplicationError::InvalidCommand {
                line: line_no,
                message,
            }
        })?;
        match command {
            Some(command) => self
                .execute(command)
                .map(Some)
                .map_err(|e| match e {
                    ApplicationError::Domain(d) => ApplicationError::InvalidCommand {
                        line: line_no,
                        message: d.to_string(),
                    },
                    other => other,
                }),
            None => Ok(None),
        }
    }

    /// Run a whole script, stopping at the first failing line.
    pub fn run_script(&mut self, script: &str) -> ApplicationResult<Vec<SessionOutput>> {
        let outputs: Vec<SessionOutput> = script
            .lines()
            .enumerate()
            .map(|(i, line)| self.execute_line(i + 1, line))
            .filter_map_ok(|o| o)
            .collect::<ApplicationResult<_>>()?;
        debug!("script produced {} outputs", outputs.len());
        Ok(outputs)
    }
}

/// Split on whitespace, keeping double-quoted segments together.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                quoted = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quote".into());
    }
    if !current.is_empty() || quoted {
        tokens.push(current);
    }
    Ok(tokens)
}
