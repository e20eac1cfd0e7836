//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, MapCommands, TreeCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{AssocMap, Delimiter, NodeId, OrderedMap, Outline};
use crate::tree_traits::TreeDisplay;

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Map { command }) => execute_map(command, settings),
        Some(Commands::Tree { command }) => execute_tree(command, settings),
        Some(Commands::Config { command }) => execute_config(command, settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

// ============================================================
// map
// ============================================================

fn execute_map(command: &MapCommands, settings: &Settings) -> CliResult<()> {
    match command {
        MapCommands::Encode { entries, delim } => {
            let delim = resolve_delimiter(delim.as_deref(), settings)?;
            output::info(&encode(entries, delim.as_ref())?);
            Ok(())
        }
        MapCommands::Decode { text, delim } => {
            let delim = resolve_delimiter(delim.as_deref(), settings)?;
            let map = decode(text, delim.as_ref());
            if map.is_empty() {
                output::warning("no entries found");
            }
            for (key, value) in map.entries() {
                output::entry(key, value);
            }
            Ok(())
        }
        MapCommands::Format {
            text,
            key,
            args,
            delim,
        } => {
            let delim = resolve_delimiter(delim.as_deref(), settings)?;
            let map = decode(text, delim.as_ref());
            output::info(&map.format(key, args.as_slice())?);
            Ok(())
        }
    }
}

/// `--delim` wins over the configured delimiter.
fn resolve_delimiter(flag: Option<&str>, settings: &Settings) -> CliResult<Option<Delimiter>> {
    match flag {
        Some(d) => Ok(Some(Delimiter::new(d)?)),
        None => Ok(settings.delimiter()),
    }
}

/// Build a map from `KEY=VALUE` arguments and serialize it.
#[instrument(level = "debug")]
pub fn encode(entries: &[String], delim: Option<&Delimiter>) -> CliResult<String> {
    let mut map = OrderedMap::new();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| CliError::InvalidArgs(format!("expected KEY=VALUE, got '{entry}'")))?;
        map.put(key, value.to_string());
    }
    Ok(match delim {
        Some(d) => map.export_to_string_delim(d),
        None => map.export_to_string(),
    })
}

#[instrument(level = "debug")]
pub fn decode(text: &str, delim: Option<&Delimiter>) -> OrderedMap {
    let mut map = OrderedMap::new();
    let read = match delim {
        Some(d) => map.import_from_string_delim(text, d),
        None => map.import_from_string(text),
    };
    debug!(read, unique = map.len(), "decoded");
    map
}

// ============================================================
// tree
// ============================================================

fn execute_tree(command: &TreeCommands, settings: &Settings) -> CliResult<()> {
    match command {
        TreeCommands::Show { file } => {
            let outline = load_outline(file, settings)?;
            for &root in &outline.roots {
                output::info(&outline.tree.to_tree_string(root)?);
            }
        }
        TreeCommands::Walk { file, reverse } => {
            let outline = load_outline(file, settings)?;
            for line in walk(&outline, *reverse)? {
                output::info(&line);
            }
        }
        TreeCommands::Leaves { file } => {
            let outline = load_outline(file, settings)?;
            for &root in &outline.roots {
                for leaf in outline.tree.leaves(root)? {
                    output::info(outline.tree.data(leaf)?);
                }
            }
        }
    }
    Ok(())
}

fn load_outline(path: &Path, settings: &Settings) -> CliResult<Outline> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(settings.outline_builder().build(&text)?)
}

/// Step through every tree with `next_node` (or `previous_node` when
/// `reverse`), returning one indented label per node.
pub fn walk(outline: &Outline, reverse: bool) -> CliResult<Vec<String>> {
    let tree = &outline.tree;
    let mut lines = Vec::with_capacity(tree.len());

    let label = |id: NodeId| -> CliResult<String> {
        Ok(format!("{}{}", "  ".repeat(tree.depth(id)?), tree.data(id)?))
    };

    if reverse {
        for &root in outline.roots.iter().rev() {
            let mut current = Some(tree.last_leaf(root)?);
            while let Some(id) = current {
                lines.push(label(id)?);
                current = tree.previous_node(id)?;
            }
        }
    } else {
        for &root in &outline.roots {
            let mut current = Some(root);
            while let Some(id) = current {
                lines.push(label(id)?);
                current = tree.next_node(id)?;
            }
        }
    }
    Ok(lines)
}

// ============================================================
// config
// ============================================================

fn execute_config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective settings");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutlineBuilder;

    #[test]
    fn given_entries_when_encode_then_escaped_pairs() {
        let entries = vec!["a=1".to_string(), "msg=hi there".to_string()];
        assert_eq!(encode(&entries, None).unwrap(), "a=1 msg=hi%20there");
    }

    #[test]
    fn given_value_with_equals_when_encode_then_split_at_first() {
        let entries = vec!["expr=x=y".to_string()];
        assert_eq!(encode(&entries, None).unwrap(), "expr=x%3Dy");
    }

    #[test]
    fn given_entry_without_equals_when_encode_then_invalid_args() {
        let entries = vec!["oops".to_string()];
        assert!(matches!(
            encode(&entries, None),
            Err(CliError::InvalidArgs(_))
        ));
    }

    #[test]
    fn given_delimiter_when_encode_then_decode_round_trips() {
        let delim = Delimiter::new(";").unwrap();
        let entries = vec!["a=1".to_string(), "b=2".to_string()];
        let text = encode(&entries, Some(&delim)).unwrap();
        assert_eq!(text, "a;1;b;2");
        let map = decode(&text, Some(&delim));
        assert_eq!(map.to_string(), "[a=1,b=2]");
    }

    #[test]
    fn given_flag_and_settings_then_flag_wins() {
        let mut settings = Settings::default();
        settings.map.delimiter = Some("|".into());
        assert_eq!(
            resolve_delimiter(Some(";"), &settings).unwrap(),
            Some(Delimiter::new(";").unwrap())
        );
        assert_eq!(
            resolve_delimiter(None, &settings).unwrap(),
            Some(Delimiter::new("|").unwrap())
        );
        assert!(resolve_delimiter(Some(""), &settings).is_err());
    }

    #[test]
    fn given_outline_when_walk_forward_and_reverse_then_mirror_images() {
        let outline = OutlineBuilder::new(2).build("r\n  x\n    z\n  y\n").unwrap();
        let forward = walk(&outline, false).unwrap();
        assert_eq!(forward, vec!["r", "  x", "    z", "  y"]);

        let mut backward = walk(&outline, true).unwrap();
        backward.reverse();
        assert_eq!(backward, forward);
    }
}
