//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{auto_mount, MountReport};
use crate::cli::args::{Cli, Commands, ConfigCommands, LoadArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{Index, MountPoint, Tree};
use crate::infrastructure::{InfraError, ServiceContainer};
use crate::tree_traits::{node_line, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::Tree(args)) => cmd_tree(&container, args),
        Some(Commands::Edges(args)) => cmd_edges(&container, args),
        Some(Commands::Mounts(args)) => cmd_mounts(&container, args),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Loads the document, converts it and resolves eager mounts unless disabled.
#[instrument(skip(container))]
pub fn load_tree(container: &ServiceContainer, args: &LoadArgs) -> CliResult<Tree> {
    let mut provider = container.provider();
    let source = args.file.to_string_lossy();
    let (path, mut document) = provider
        .load(&source, None, false)?
        .ok_or_else(|| InfraError::Load(source.to_string()))?;
    if let Some(root) = &args.root {
        document.root = Some(root.clone());
    }
    let mut tree = document.to_tree()?;

    if container.settings.auto_mount && !args.no_auto_mount {
        let base = container.base_for(&path);
        debug!("mount base: {:?}", base.as_ref().map(|u| u.as_str()));
        let report = auto_mount(
            &mut tree,
            &mut provider,
            base.as_ref(),
            &container.parameters(),
        );
        report_mounts(&report);
    }
    Ok(tree)
}

fn report_mounts(report: &MountReport) {
    if report.mounted > 0 {
        output::resolved(&format!("{} mount point(s) resolved", report.mounted));
    }
    if report.failed > 0 {
        output::warning(&format!(
            "{} mount point(s) could not be resolved",
            report.failed
        ));
    }
}

fn cmd_tree(container: &ServiceContainer, args: &LoadArgs) -> CliResult<()> {
    let tree = load_tree(container, args)?;
    output::plain(&tree.to_tree_string());
    let nodes = tree.nodes();
    output::detail(&format!(
        "{} node(s), depth {}, {} leaves, {} non-tree edge(s)",
        nodes.iter().count(),
        nodes.depth(),
        nodes.leaf_nodes().len(),
        tree.edges().len()
    ));
    Ok(())
}

fn cmd_edges(container: &ServiceContainer, args: &LoadArgs) -> CliResult<()> {
    let tree = load_tree(container, args)?;
    output::header(&format!("{} non-tree edge(s)", tree.edges().len()));
    for edge in tree.edges() {
        let mut line = format!("{} -> {}", id_of(&tree, edge.from), id_of(&tree, edge.to));
        if let Some(label) = &edge.decoration.label {
            line.push_str(&format!(" ({})", label));
        }
        output::detail(&line);
    }
    Ok(())
}

fn id_of(tree: &Tree, idx: Index) -> &str {
    tree.node(idx).map(|n| n.data.id.as_str()).unwrap_or("?")
}

fn cmd_mounts(container: &ServiceContainer, args: &LoadArgs) -> CliResult<()> {
    let tree = load_tree(container, args)?;
    output::header("Mount points");
    for (idx, node) in tree.nodes().iter() {
        match &node.mount {
            Some(MountPoint::Mounting { .. }) => output::unresolved(&node_line(node)),
            Some(MountPoint::Mounted { mounting, .. }) => {
                let url = match tree.mount_point(*mounting) {
                    Some(MountPoint::Mounting { url, .. }) => url.as_str(),
                    _ => "?",
                };
                output::detail(&format!(
                    "{} <- {} ({})",
                    node.data.display_name(),
                    url,
                    tree.nodes().path_to_root(idx).join("/")
                ));
            }
            None => {}
        }
    }
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::plain(&container.settings.to_toml()?),
        ConfigCommands::Template => output::plain(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::plain(&path.display()),
            None => {
                return Err(CliError::Usage(
                    "cannot determine config directory".to_string(),
                ))
            }
        },
    }
    Ok(())
}
