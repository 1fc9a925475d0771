// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `nsctl`: inspect and manage stored namespace histories.
//!
//! # Usage
//! ```text
//! nsctl [--config-dir <dir>] <command>
//!
//!   demo    --dir <dir> [--mode full|latest-only]
//!   inspect <file> [--json]
//!   list    [--dir <dir>]
//! ```
//!
//! Without `--dir`, `list` reads the data directory from the `store` config
//! (see [`ns_store::StoreConfig`]). Logs go to stderr and honor `RUST_LOG`.
#![deny(rust_2018_idioms)]
// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Table};
use ns_state::{
    Height, Key, MosaicId, NamespaceId, NamespaceLifetime, NamespaceNode, NamespacePath,
    RootNamespace, RootNamespaceHistory, SerializerMode,
};
use ns_store::frame::{read_history, CHECKSUM_SIZE};
use ns_store::{ConfigService, FsConfigStore, FsTier, NamespaceStateStore, StoreConfig};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and manage stored namespace histories")]
struct Args {
    /// Directory holding `store.json` (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a history record file and print its snapshots
    Inspect {
        /// Record file (`<root id>.nsh`)
        file: PathBuf,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the histories stored in a data directory
    List {
        /// Data directory (defaults to the configured one)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Write a sample history (root 100, child 100.200 aliased to mosaic 7)
    Demo {
        /// Data directory to write into
        #[arg(long)]
        dir: PathBuf,
        /// Serializer mode (defaults to the configured one)
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Full,
    LatestOnly,
}

impl From<ModeArg> for SerializerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => Self::Full,
            ModeArg::LatestOnly => Self::LatestOnly,
        }
    }
}

#[derive(Serialize)]
struct RecordView {
    mode: SerializerMode,
    root: NamespaceId,
    checksum: String,
    snapshots: Vec<SnapshotView>,
}

#[derive(Serialize)]
struct SnapshotView {
    owner: String,
    start: Height,
    end: Height,
    alias: String,
    children: Vec<ChildView>,
}

#[derive(Serialize)]
struct ChildView {
    path: String,
    alias: String,
}

impl From<&RootNamespace> for SnapshotView {
    fn from(root: &RootNamespace) -> Self {
        let root_alias = root.alias(root.id()).unwrap_or_default();
        Self {
            owner: root.owner().to_string(),
            start: root.lifetime().start(),
            end: root.lifetime().end(),
            alias: root_alias.to_string(),
            children: root
                .children()
                .map(|node| ChildView {
                    path: node.path.to_string(),
                    alias: node.alias.to_string(),
                })
                .collect(),
        }
    }
}

fn load_config(config_dir: Option<&Path>) -> Result<StoreConfig> {
    let store = match config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    let config = ConfigService::new(store)
        .load()
        .context("load store config")?;
    debug!(?config, "loaded store config");
    Ok(config)
}

fn inspect(file: &Path, json: bool) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("read {}", file.display()))?;
    let (mode, history) =
        read_history(&bytes).with_context(|| format!("decode {}", file.display()))?;
    let checksum = hex::encode(&bytes[bytes.len().saturating_sub(CHECKSUM_SIZE)..]);

    let view = RecordView {
        mode,
        root: history.id(),
        checksum,
        snapshots: history.iter().map(SnapshotView::from).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("root:     {}", view.root);
    println!("mode:     {:?}", view.mode);
    println!("bytes:    {}", bytes.len());
    println!("checksum: {}", view.checksum);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "owner", "lifetime", "alias", "children"]);
    for (index, snapshot) in view.snapshots.iter().enumerate() {
        let children = snapshot
            .children
            .iter()
            .map(|child| format!("{} -> {}", child.path, child.alias))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            index.to_string(),
            snapshot.owner.clone(),
            format!("[{}, {})", snapshot.start, snapshot.end),
            snapshot.alias.clone(),
            children,
        ]);
    }
    println!("{table}");
    Ok(())
}

fn list(dir: &Path, mode: SerializerMode) -> Result<()> {
    let tier = FsTier::open(dir).with_context(|| format!("open {}", dir.display()))?;
    let store = NamespaceStateStore::new(tier, mode);
    let histories = store
        .restore_all()
        .with_context(|| format!("restore histories from {}", dir.display()))?;

    if histories.is_empty() {
        println!("no histories in {}", dir.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["root", "depth", "owner", "lifetime", "children"]);
    for history in &histories {
        let current = history.back()?;
        table.add_row(vec![
            history.id().to_string(),
            history.history_depth().to_string(),
            current.owner().to_string(),
            format!("[{}, {})", current.lifetime().start(), current.lifetime().end()),
            current.child_count().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn demo_history() -> Result<RootNamespaceHistory> {
    let root_id = NamespaceId(100);
    let mut history = RootNamespaceHistory::new(root_id);
    let root = history.push(
        Key([0xA1; 32]),
        NamespaceLifetime::new(Height(10), Height(100))?,
    );
    let path = NamespacePath::try_from_ids(&[root_id, NamespaceId(200)])?;
    root.add(NamespaceNode::with_alias(path, MosaicId(7).into()))?;
    Ok(history)
}

fn demo(dir: &Path, mode: SerializerMode) -> Result<()> {
    let tier = FsTier::open(dir).with_context(|| format!("open {}", dir.display()))?;
    let mut store = NamespaceStateStore::new(tier, mode);
    let history = demo_history()?;
    let bytes = store.persist(&history).context("persist demo history")?;
    let path = store.store().path_for(history.id());
    info!(path = %path.display(), bytes, "wrote demo history");
    println!("wrote root {} ({bytes} bytes) to {}", history.id(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.cmd {
        Command::Inspect { file, json } => inspect(&file, json),
        Command::List { dir } => {
            let config = load_config(args.config_dir.as_deref())?;
            let dir = match dir {
                Some(dir) => dir,
                None => config.resolve_data_dir()?,
            };
            list(&dir, config.mode)
        }
        Command::Demo { dir, mode } => {
            let mode = match mode {
                Some(mode) => mode.into(),
                None => load_config(args.config_dir.as_deref())?.mode,
            };
            demo(&dir, mode)
        }
    }
}
