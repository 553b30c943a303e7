// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Parley CLI entrypoint.
//!
//! Loads a simulation folder, optionally bookmarks and selects a node, and prints the renderer
//! payload (or a transcript, or the payload schema) to stdout.

use std::error::Error;
use std::path::Path;

use parley::explorer::{Explorer, SelectOutcome};
use parley::layout::LayoutOptions;
use parley::model::{MessageId, SimulationId};
use parley::store::{SimulationFolder, WriteDurability};
use parley::tree::format_transcript;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<simulation-dir>] [--simulation <id>] [--select <message-id>] [--bookmark <message-id> <name>] [--rank-sep <px>] [--sibling-sep <px>] [--durable-writes]\n  {program} [<simulation-dir>] [--simulation <id>] --transcript <message-id> [--plain]\n  {program} --schema\n\nPrints the styled graph of the simulation's dialogue tree as JSON.\nIf simulation-dir is omitted, the current working directory is used; the simulation id\ndefaults to the directory name.\n\n--transcript prints the conversation up to a message instead (--plain for text).\n--schema prints the JSON schema of the graph payload.\n\nLogging goes to stderr; set PARLEY_LOG (or RUST_LOG) to e.g. `parley=debug`."
    );
}

#[derive(Debug, Default, Clone, PartialEq)]
struct CliOptions {
    simulation_dir: Option<String>,
    simulation_id: Option<String>,
    select: Option<String>,
    bookmark: Option<(String, String)>,
    transcript: Option<String>,
    plain: bool,
    schema: bool,
    rank_separation: Option<f64>,
    sibling_separation: Option<f64>,
    durable_writes: bool,
}

fn parse_px(raw: Option<String>) -> Result<f64, ()> {
    let value: f64 = raw.ok_or(())?.parse().map_err(|_| ())?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(())
    }
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--simulation" => {
                if options.simulation_id.is_some() {
                    return Err(());
                }
                options.simulation_id = Some(args.next().ok_or(())?);
            }
            "--select" => {
                if options.select.is_some() {
                    return Err(());
                }
                options.select = Some(args.next().ok_or(())?);
            }
            "--bookmark" => {
                if options.bookmark.is_some() {
                    return Err(());
                }
                let node = args.next().ok_or(())?;
                let name = args.next().ok_or(())?;
                options.bookmark = Some((node, name));
            }
            "--transcript" => {
                if options.transcript.is_some() {
                    return Err(());
                }
                options.transcript = Some(args.next().ok_or(())?);
            }
            "--plain" => {
                if options.plain {
                    return Err(());
                }
                options.plain = true;
            }
            "--schema" => {
                if options.schema {
                    return Err(());
                }
                options.schema = true;
            }
            "--rank-sep" => {
                if options.rank_separation.is_some() {
                    return Err(());
                }
                options.rank_separation = Some(parse_px(args.next())?);
            }
            "--sibling-sep" => {
                if options.sibling_separation.is_some() {
                    return Err(());
                }
                options.sibling_separation = Some(parse_px(args.next())?);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.simulation_dir.is_some() {
                    return Err(());
                }
                options.simulation_dir = Some(arg);
            }
        }
    }

    if options.plain && options.transcript.is_none() {
        return Err(());
    }

    if options.schema && options != (CliOptions { schema: true, ..CliOptions::default() }) {
        return Err(());
    }

    Ok(options)
}

fn default_simulation_id(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "default".to_owned())
}

async fn explore(
    folder: SimulationFolder,
    simulation_id: SimulationId,
    layout_options: LayoutOptions,
    options: &CliOptions,
) -> Result<(), Box<dyn Error>> {
    let explorer = Explorer::new(folder, simulation_id).with_layout_options(layout_options);
    explorer.reload().await?;
    explorer.reload_bookmarks().await?;

    if let Some(node) = options.select.as_deref() {
        if explorer.select(node) == SelectOutcome::NotFound {
            return Err(format!("message {node} is not in the tree").into());
        }
    }

    if let Some(node) = options.transcript.as_deref() {
        let turns = explorer.transcript(node);
        if turns.is_empty() {
            return Err(format!("message {node} is not in the tree").into());
        }
        if options.plain {
            print!("{}", format_transcript(&turns));
        } else {
            println!("{}", serde_json::to_string_pretty(&turns)?);
        }
        return Ok(());
    }

    let graph = explorer.render()?;
    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "parley".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if let Err(err) = parley::logging::init_stderr() {
            eprintln!("parley: {err}");
        }

        if options.schema {
            let schema = parley::render::render_graph_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }

        let dir = options.simulation_dir.clone().unwrap_or_else(|| ".".to_owned());
        let simulation_id = match options.simulation_id.clone() {
            Some(id) => SimulationId::new(id)?,
            None => SimulationId::new(default_simulation_id(Path::new(&dir)))?,
        };
        let durability = if options.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        };
        let folder = SimulationFolder::new(dir, simulation_id.clone()).with_durability(durability);

        let mut layout_options = folder.load_layout_options()?;
        if let Some(rank_separation) = options.rank_separation {
            layout_options.rank_separation = rank_separation;
        }
        if let Some(sibling_separation) = options.sibling_separation {
            layout_options.sibling_separation = sibling_separation;
        }
        layout_options.validate()?;

        if let Some((node, name)) = options.bookmark.clone() {
            let bookmark = folder.add_bookmark(&MessageId::new(node)?, name)?;
            eprintln!("parley: bookmarked message {} as {:?}", bookmark.node_id, bookmark.name);
        }

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        runtime.block_on(explore(folder, simulation_id, layout_options, &options))?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("parley: {err}");
        std::process::exit(1);
    }
}
