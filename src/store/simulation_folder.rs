// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::explorer::{ExternalError, ExternalOperation, RecordSource};
use crate::layout::LayoutOptions;
use crate::model::{BookmarkId, BookmarkRecord, MessageId, MessageRecord, Party, SimulationId};

const MESSAGES_FILENAME: &str = "messages.json";
const BOOKMARKS_FILENAME: &str = "bookmarks.json";
const LAYOUT_FILENAME: &str = "layout.json";
const META_FILENAME: &str = "meta.json";

/// Bookkeeping that must survive record deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct FolderMeta {
    /// Lowest message id that may still be handed out.
    #[serde(default)]
    next_message_id: u64,
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    UnknownSimulation {
        expected: SimulationId,
        requested: SimulationId,
    },
    UnknownNode {
        node_id: MessageId,
    },
    BrokenParentChain {
        node_id: MessageId,
    },
    Join {
        source: tokio::task::JoinError,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::UnknownSimulation {
                expected,
                requested,
            } => write!(
                f,
                "folder holds simulation {expected}, not simulation {requested}"
            ),
            Self::UnknownNode { node_id } => write!(f, "unknown message {node_id}"),
            Self::BrokenParentChain { node_id } => {
                write!(f, "parent chain of message {node_id} does not reach a root")
            }
            Self::Join { source } => write!(f, "store task failed: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Join { source } => Some(source),
            Self::UnknownSimulation { .. } => None,
            Self::UnknownNode { .. } => None,
            Self::BrokenParentChain { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, no fsync.
    #[default]
    BestEffort,

    /// Also syncs the written file and its directory where the platform allows it.
    Durable,
}

/// One simulation persisted as a folder of JSON files:
///
/// - `messages.json`: the dialogue records, flat or pre-nested
/// - `bookmarks.json`: named pointers into the tree (optional)
/// - `layout.json`: [`LayoutOptions`] overrides (optional)
/// - `meta.json`: the message id high-water mark (written on first append or removal)
///
/// Writes always store records flat, in id-assignment order. Message ids are never reused,
/// even after the records holding them were removed.
#[derive(Debug, Clone)]
pub struct SimulationFolder {
    root: PathBuf,
    simulation_id: SimulationId,
    durability: WriteDurability,
}

impl SimulationFolder {
    pub fn new(root: impl Into<PathBuf>, simulation_id: SimulationId) -> Self {
        Self {
            root: root.into(),
            simulation_id,
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn simulation_id(&self) -> &SimulationId {
        &self.simulation_id
    }

    pub fn messages_path(&self) -> PathBuf {
        self.root.join(MESSAGES_FILENAME)
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.root.join(BOOKMARKS_FILENAME)
    }

    pub fn layout_path(&self) -> PathBuf {
        self.root.join(LAYOUT_FILENAME)
    }

    pub fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILENAME)
    }

    /// Records as stored. A folder without `messages.json` holds an empty simulation.
    pub fn load_records(&self) -> Result<Vec<MessageRecord>, StoreError> {
        Ok(read_json_if_exists(&self.messages_path())?.unwrap_or_default())
    }

    pub fn save_records(&self, records: &[MessageRecord]) -> Result<(), StoreError> {
        write_json(&self.root, &self.messages_path(), &records, self.durability)
    }

    pub fn load_bookmarks(&self) -> Result<Vec<BookmarkRecord>, StoreError> {
        Ok(read_json_if_exists(&self.bookmarks_path())?.unwrap_or_default())
    }

    pub fn save_bookmarks(&self, bookmarks: &[BookmarkRecord]) -> Result<(), StoreError> {
        write_json(&self.root, &self.bookmarks_path(), &bookmarks, self.durability)
    }

    /// Bookmarks `node_id` under `name` and returns the stored bookmark.
    pub fn add_bookmark(
        &self,
        node_id: &MessageId,
        name: impl Into<String>,
    ) -> Result<BookmarkRecord, StoreError> {
        let records = flatten_records(self.load_records()?);
        if !records.iter().any(|record| &record.id == node_id) {
            return Err(StoreError::UnknownNode {
                node_id: node_id.clone(),
            });
        }

        let mut bookmarks = self.load_bookmarks()?;
        let taken = bookmarks.iter().map(|b| b.id.as_str()).collect::<BTreeSet<_>>();
        let id = BookmarkId::from(next_numeric_id(&taken));
        let bookmark = BookmarkRecord {
            id,
            simulation_id: self.simulation_id.clone(),
            node_id: node_id.clone(),
            name: name.into(),
        };
        bookmarks.push(bookmark.clone());
        self.save_bookmarks(&bookmarks)?;
        Ok(bookmark)
    }

    /// Returns `false` when no bookmark has that id.
    pub fn remove_bookmark(&self, bookmark_id: &BookmarkId) -> Result<bool, StoreError> {
        let mut bookmarks = self.load_bookmarks()?;
        let before = bookmarks.len();
        bookmarks.retain(|bookmark| &bookmark.id != bookmark_id);
        if bookmarks.len() == before {
            return Ok(false);
        }
        self.save_bookmarks(&bookmarks)?;
        Ok(true)
    }

    /// Ids from the root down to `node_id`, following stored parent ids.
    pub fn traversal(&self, node_id: &MessageId) -> Result<Vec<MessageId>, StoreError> {
        let records = flatten_records(self.load_records()?);
        let parents = records
            .iter()
            .map(|record| (&record.id, record.parent_id.as_ref()))
            .collect::<BTreeMap<_, _>>();

        if !parents.contains_key(node_id) {
            return Err(StoreError::UnknownNode {
                node_id: node_id.clone(),
            });
        }

        let mut path = Vec::<MessageId>::new();
        let mut seen = BTreeSet::<&MessageId>::new();
        let mut current = Some(node_id);
        while let Some(id) = current {
            if !seen.insert(id) {
                return Err(StoreError::BrokenParentChain {
                    node_id: node_id.clone(),
                });
            }
            let Some(parent) = parents.get(id) else {
                return Err(StoreError::BrokenParentChain {
                    node_id: node_id.clone(),
                });
            };
            path.push(id.clone());
            current = *parent;
        }

        path.reverse();
        Ok(path)
    }

    /// Appends new turns as children of `parent_id`, assigning fresh numeric ids.
    pub fn append_children(
        &self,
        parent_id: &MessageId,
        turns: impl IntoIterator<Item = (Party, String)>,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let mut records = flatten_records(self.load_records()?);
        if !records.iter().any(|record| &record.id == parent_id) {
            return Err(StoreError::UnknownNode {
                node_id: parent_id.clone(),
            });
        }

        let turns = turns.into_iter().collect::<Vec<_>>();
        let ids = self.allocate_message_ids(&records, turns.len())?;
        let appended = ids
            .into_iter()
            .zip(turns)
            .map(|(id, (party, content))| {
                MessageRecord::new(id, Some(parent_id.clone()), party, content)
            })
            .collect::<Vec<_>>();

        records.extend(appended.iter().cloned());
        self.save_records(&records)?;
        info!(
            parent = %parent_id,
            appended = appended.len(),
            "appended generated turns"
        );
        Ok(appended)
    }

    /// Appends a user-authored turn below `parent_id` and makes it the persisted selection:
    /// the new turn and its ancestors are selected, their siblings are not.
    pub fn append_turn(
        &self,
        parent_id: &MessageId,
        party: Party,
        content: impl Into<String>,
    ) -> Result<MessageRecord, StoreError> {
        let mut records = flatten_records(self.load_records()?);
        if !records.iter().any(|record| &record.id == parent_id) {
            return Err(StoreError::UnknownNode {
                node_id: parent_id.clone(),
            });
        }

        let id = self
            .allocate_message_ids(&records, 1)?
            .pop()
            .expect("one message id was allocated");
        let turn = MessageRecord::new(id, Some(parent_id.clone()), party, content)
            .with_selected(true);
        records.push(turn.clone());

        let on_path = ancestry(&records, &turn.id)
            .into_iter()
            .collect::<BTreeSet<_>>();
        for record in &mut records {
            if on_path.contains(&record.id) {
                record.selected = true;
            } else if record
                .parent_id
                .as_ref()
                .is_some_and(|parent| on_path.contains(parent))
            {
                record.selected = false;
            }
        }

        self.save_records(&records)?;
        info!(parent = %parent_id, turn = %turn.id, "appended custom turn");
        Ok(turn)
    }

    /// Deletes everything below `node_id` (the node itself stays) and returns the number of
    /// removed records. Bookmarks pointing into the removed subtree are dropped too.
    pub fn remove_descendants(&self, node_id: &MessageId) -> Result<usize, StoreError> {
        let records = flatten_records(self.load_records()?);
        if !records.iter().any(|record| &record.id == node_id) {
            return Err(StoreError::UnknownNode {
                node_id: node_id.clone(),
            });
        }

        let mut removed = BTreeSet::<MessageId>::new();
        let mut frontier = vec![node_id.clone()];
        while let Some(parent) = frontier.pop() {
            for record in &records {
                if record.parent_id.as_ref() == Some(&parent) && removed.insert(record.id.clone())
                {
                    frontier.push(record.id.clone());
                }
            }
        }
        if removed.is_empty() {
            return Ok(0);
        }

        // Reserve the removed ids so later appends never hand them out again.
        self.allocate_message_ids(&records, 0)?;

        let kept = records
            .into_iter()
            .filter(|record| !removed.contains(&record.id))
            .collect::<Vec<_>>();
        self.save_records(&kept)?;

        let mut bookmarks = self.load_bookmarks()?;
        let before = bookmarks.len();
        bookmarks.retain(|bookmark| !removed.contains(&bookmark.node_id));
        if bookmarks.len() != before {
            self.save_bookmarks(&bookmarks)?;
        }

        debug!(node = %node_id, removed = removed.len(), "removed descendants");
        Ok(removed.len())
    }

    /// Layout settings for this simulation; defaults when `layout.json` is absent.
    pub fn load_layout_options(&self) -> Result<LayoutOptions, StoreError> {
        Ok(read_json_if_exists(&self.layout_path())?.unwrap_or_default())
    }

    pub fn save_layout_options(&self, options: &LayoutOptions) -> Result<(), StoreError> {
        write_json(&self.root, &self.layout_path(), options, self.durability)
    }

    fn load_meta(&self) -> Result<FolderMeta, StoreError> {
        Ok(read_json_if_exists(&self.meta_path())?.unwrap_or_default())
    }

    /// Hands out `count` unused numeric ids above both the stored high-water mark and every
    /// numeric id in `records`, and persists the new mark before returning.
    fn allocate_message_ids(
        &self,
        records: &[MessageRecord],
        count: usize,
    ) -> Result<Vec<MessageId>, StoreError> {
        let taken = records
            .iter()
            .map(|record| record.id.as_str())
            .collect::<BTreeSet<_>>();
        let highest = taken
            .iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let meta = self.load_meta()?;
        let mut next = meta.next_message_id.max(highest + 1);
        let mut ids = Vec::with_capacity(count);
        while ids.len() < count {
            if !taken.contains(next.to_string().as_str()) {
                ids.push(MessageId::from(next));
            }
            next += 1;
        }

        let updated = FolderMeta {
            next_message_id: next,
        };
        if updated != meta {
            write_json(&self.root, &self.meta_path(), &updated, self.durability)?;
        }
        Ok(ids)
    }

    fn check_simulation(&self, requested: &SimulationId) -> Result<(), StoreError> {
        if requested != &self.simulation_id {
            return Err(StoreError::UnknownSimulation {
                expected: self.simulation_id.clone(),
                requested: requested.clone(),
            });
        }
        Ok(())
    }

    async fn run_blocking<T, F>(&self, task: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(SimulationFolder) -> Result<T, StoreError> + Send + 'static,
    {
        let folder = self.clone();
        tokio::task::spawn_blocking(move || task(folder))
            .await
            .map_err(|source| StoreError::Join { source })?
    }
}

impl RecordSource for SimulationFolder {
    async fn load_records(
        &self,
        simulation_id: &SimulationId,
    ) -> Result<Vec<MessageRecord>, ExternalError> {
        let external = |err| ExternalError::new(ExternalOperation::LoadRecords, err);
        self.check_simulation(simulation_id).map_err(external)?;
        self.run_blocking(|folder| folder.load_records())
            .await
            .map_err(external)
    }

    async fn load_bookmarks(
        &self,
        simulation_id: &SimulationId,
    ) -> Result<Vec<BookmarkRecord>, ExternalError> {
        let external = |err| ExternalError::new(ExternalOperation::LoadBookmarks, err);
        self.check_simulation(simulation_id).map_err(external)?;
        self.run_blocking(|folder| folder.load_bookmarks())
            .await
            .map_err(external)
    }

    async fn traversal(
        &self,
        simulation_id: &SimulationId,
        node_id: &MessageId,
    ) -> Result<Vec<MessageId>, ExternalError> {
        let external = |err| ExternalError::new(ExternalOperation::Traversal, err);
        self.check_simulation(simulation_id).map_err(external)?;
        let node_id = node_id.clone();
        self.run_blocking(move |folder| folder.traversal(&node_id))
            .await
            .map_err(external)
    }

    async fn append_turn(
        &self,
        simulation_id: &SimulationId,
        parent_id: &MessageId,
        party: Party,
        content: String,
    ) -> Result<MessageRecord, ExternalError> {
        let external = |err| ExternalError::new(ExternalOperation::AppendTurn, err);
        self.check_simulation(simulation_id).map_err(external)?;
        let parent_id = parent_id.clone();
        self.run_blocking(move |folder| folder.append_turn(&parent_id, party, content))
            .await
            .map_err(external)
    }
}

/// Unnests pre-nested records into parent-id form, parents before children.
pub fn flatten_records(records: Vec<MessageRecord>) -> Vec<MessageRecord> {
    let mut flat = Vec::with_capacity(records.len());
    let mut stack = records
        .into_iter()
        .rev()
        .map(|record| (record, None::<MessageId>))
        .collect::<Vec<_>>();

    while let Some((mut record, nested_parent)) = stack.pop() {
        if record.parent_id.is_none() {
            record.parent_id = nested_parent;
        }
        let children = std::mem::take(&mut record.children);
        let parent_id = record.id.clone();
        flat.push(record);
        stack.extend(
            children
                .into_iter()
                .rev()
                .map(|child| (child, Some(parent_id.clone()))),
        );
    }
    flat
}

/// Ids from the root down to `node_id` over flat records; stops at a missing parent or a
/// repeated id.
fn ancestry(records: &[MessageRecord], node_id: &MessageId) -> Vec<MessageId> {
    let parents = records
        .iter()
        .map(|record| (&record.id, record.parent_id.as_ref()))
        .collect::<BTreeMap<_, _>>();

    let mut path = Vec::new();
    let mut current = Some(node_id);
    while let Some(id) = current {
        if path.contains(id) {
            break;
        }
        path.push(id.clone());
        current = parents.get(id).copied().flatten();
    }
    path.reverse();
    path
}

fn next_numeric_id(taken: &BTreeSet<&str>) -> u64 {
    let max = taken
        .iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    let mut next = max + 1;
    while taken.contains(next.to_string().as_str()) {
        next += 1;
    }
    next
}

fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn write_json<T: Serialize + ?Sized>(
    root: &Path,
    path: &Path,
    value: &T,
    durability: WriteDurability,
) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    write_atomic(path, format!("{json}\n").as_bytes(), durability)
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".parley.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    let written = file.write_all(contents).and_then(|()| {
        if durability == WriteDurability::Durable {
            file.sync_all()
        } else {
            Ok(())
        }
    });
    drop(file);
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: tmp_path,
            source,
        });
    }

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
