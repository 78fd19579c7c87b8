//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{BrowserService, SessionOutput};
use crate::application::IoResultExt;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Filters, TeamStore};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let dir = local_dir(cli)?;
    let settings = Settings::load(Some(dir.as_path()))?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);
    let seed = cli.seed.as_deref();

    match command {
        Commands::Ls { parent } => cmd_ls(&container, seed, parent.as_deref()),
        Commands::Tree { depth } => cmd_tree(&container, seed, cli.org.as_deref(), *depth),
        Commands::Orphans => cmd_orphans(&container, seed),
        Commands::Add { name, parent } => {
            cmd_add(&container, seed, cli.org.as_deref(), name, parent.as_deref())
        }
        Commands::Rm { name } => cmd_rm(&container, seed, cli.org.as_deref(), name),
        Commands::Session { script } => {
            cmd_session(&container, seed, cli.org.as_deref(), script.as_deref())
        }
        Commands::Config { command } => cmd_config(&container, &dir, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("determine current directory", e))),
    }
}

fn organization<'a>(container: &'a ServiceContainer, org: Option<&'a str>) -> &'a str {
    org.unwrap_or(&container.settings.organization)
}

#[instrument(skip(container))]
fn cmd_ls(
    container: &ServiceContainer,
    seed: Option<&Path>,
    parent: Option<&str>,
) -> CliResult<()> {
    let store = container.open_store(seed)?;
    let filters = match parent {
        Some(p) => Filters::children_of(p),
        None => Filters::roots(),
    };
    output::entities(&store.list_children(&filters));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    seed: Option<&Path>,
    org: Option<&str>,
    depth: Option<usize>,
) -> CliResult<()> {
    let store = container.open_store(seed)?;
    let mut config = container.settings.tree.clone();
    if let Some(depth) = depth {
        config.max_depth = depth;
    }
    let browser = BrowserService::new(config);
    let tree = browser.browse(&store);
    print!("{}", browser.render(&tree, organization(container, org)));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_orphans(container: &ServiceContainer, seed: Option<&Path>) -> CliResult<()> {
    let store = container.open_store(seed)?;
    output::entities(&store.orphans());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_add(
    container: &ServiceContainer,
    seed: Option<&Path>,
    org: Option<&str>,
    name: &str,
    parent: Option<&str>,
) -> CliResult<()> {
    let mut store = container.open_store(seed)?;
    warn_unknown_parent(&store, parent);
    store.insert(name, organization(container, org), parent)?;

    match parent.filter(|p| !p.is_empty()) {
        Some(p) => {
            output::success(&format!("added {name} below {p}"));
            output::entities(&store.list_children(&Filters::children_of(p)));
        }
        None => {
            output::success(&format!("added {name}"));
            output::entities(&store.roots());
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_rm(
    container: &ServiceContainer,
    seed: Option<&Path>,
    org: Option<&str>,
    name: &str,
) -> CliResult<()> {
    let mut store = container.open_store(seed)?;
    if !store.contains(name) {
        output::warning(&format!("no team named {name}"));
    }
    store.remove(name, organization(container, org))?;
    output::success(&format!("removed {name}"));
    output::entities(&store.roots());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_session(
    container: &ServiceContainer,
    seed: Option<&Path>,
    org: Option<&str>,
    script: Option<&Path>,
) -> CliResult<()> {
    let text = match script {
        Some(path) => container
            .fs
            .read_to_string(path)
            .with_path_context("read session script", path)?,
        None => io::read_to_string(io::stdin())
            .map_err(|e| CliError::Infra(InfraError::io("read session script from stdin", e)))?,
    };

    let mut session = container.open_session(seed, org)?;
    for out in session.run_script(&text)? {
        print_session_output(&out);
    }
    Ok(())
}

fn print_session_output(out: &SessionOutput) {
    match out {
        SessionOutput::Listing { parent, entities } => {
            match parent {
                Some(p) => output::header(&format!("children of {p}")),
                None => output::header("root teams"),
            }
            output::entities(entities);
        }
        SessionOutput::Added { name, parent, .. } => {
            match parent.as_deref().filter(|p| !p.is_empty()) {
                Some(p) => output::success(&format!("added {name} below {p}")),
                None => output::success(&format!("added {name}")),
            }
        }
        SessionOutput::Removed { name, .. } => output::success(&format!("removed {name}")),
        SessionOutput::Tree(rendered) => print!("{rendered}"),
        SessionOutput::Orphans(entities) => {
            output::header("orphans");
            output::entities(entities);
        }
        SessionOutput::Dump(toml) => output::info(toml.trim_end()),
    }
}

fn warn_unknown_parent(store: &TeamStore, parent: Option<&str>) {
    if let Some(p) = parent.filter(|p| !p.is_empty()) {
        if !store.contains(p) {
            output::warning(&format!("parent {p} does not exist, the team will be an orphan"));
        }
    }
}

#[instrument(skip(container))]
fn cmd_config(container: &ServiceContainer, dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(container.settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::info(&format!("global: {}", p.display())),
                None => output::info("global: (no config directory)"),
            }
            output::info(&format!("local:  {}", local_config_path(dir).display()));
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::InvalidArgs("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::InvalidArgs(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                container
                    .fs
                    .create_dir_all(parent)
                    .with_path_context("create config directory", parent)?;
            }
            container
                .fs
                .write(&path, &Settings::template())
                .with_path_context("write config", &path)?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}
