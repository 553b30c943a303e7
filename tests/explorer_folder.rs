// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Parley-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Parley and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parley::explorer::{
    DialogueGenerator, Explorer, ExternalError, ExternalOperation, GenerationRequest,
    SelectOutcome,
};
use parley::highlight::NodeTier;
use parley::model::{MessageId, Party, SimulationId};
use parley::render::{EdgeStyle, Fill};
use parley::store::SimulationFolder;
use parley::tree::format_transcript;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("parley-it-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn negotiation_folder(tmp: &TempDir) -> SimulationFolder {
    std::fs::write(
        tmp.path.join("messages.json"),
        include_str!("fixtures/negotiation/messages.json"),
    )
    .unwrap();
    std::fs::write(
        tmp.path.join("bookmarks.json"),
        include_str!("fixtures/negotiation/bookmarks.json"),
    )
    .unwrap();
    SimulationFolder::new(&tmp.path, SimulationId::from(42))
}

/// Writes two counter-proposals below the requested turn, replacing old ones on refresh.
struct FolderGenerator {
    folder: SimulationFolder,
}

impl DialogueGenerator for FolderGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<(), ExternalError> {
        let external = |err| ExternalError::new(ExternalOperation::Generate, err);
        if request.refresh {
            self.folder
                .remove_descendants(&request.last_message_id)
                .map_err(external)?;
        }
        self.folder
            .append_children(
                &request.last_message_id,
                [
                    (Party::B, "We can offer a partial refund.".to_owned()),
                    (Party::B, "We dispute the claim entirely.".to_owned()),
                ],
            )
            .map_err(external)?;
        Ok(())
    }
}

#[tokio::test]
async fn folder_backed_exploration_end_to_end() {
    let tmp = TempDir::new("e2e");
    let folder = negotiation_folder(&tmp);
    let generator = FolderGenerator {
        folder: folder.clone(),
    };
    let explorer = Explorer::new(folder.clone(), SimulationId::from(42));

    explorer.reload().await.expect("reload");
    explorer.reload_bookmarks().await.expect("bookmarks");

    let graph = explorer.render().expect("render");
    assert_eq!(graph.nodes.len(), 10);
    let bookmarked = graph.node("9").expect("9");
    assert_eq!(bookmarked.style.tier, NodeTier::Bookmarked);
    assert_eq!(bookmarked.style.fill, Fill::Filled);
    assert_eq!(graph.node("6").expect("6").style.tier, NodeTier::OnPath);
    assert_eq!(graph.edge("6", "9").expect("edge").style, EdgeStyle::Dashed);

    let outcome = explorer.advance("10", &generator).await.expect("advance");
    assert_eq!(outcome, SelectOutcome::Selected { leaf: true });

    let tree = explorer.tree().expect("tree");
    assert_eq!(tree.node_count(), 12);
    let selected = explorer
        .selected_ids()
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>();
    assert_eq!(selected, vec!["1", "3", "6", "10"]);

    let transcript = format_transcript(&explorer.transcript("12"));
    assert_eq!(
        transcript,
        "System: Let's begin the legal case discussion.\n\
         Party A: The company failed to deliver services.\n\
         Party B: We'll focus on proving service failure.\n\
         Party A: I'm not sure if I have enough proof yet.\n\
         Party B: We dispute the claim entirely.\n"
    );

    explorer.regenerate("10", &generator).await.expect("regenerate");
    let tree = explorer.tree().expect("tree");
    assert_eq!(tree.node_count(), 12);
    let stored = folder.load_records().expect("records");
    let under_ten = stored
        .iter()
        .filter(|r| r.parent_id == Some(MessageId::from(10)))
        .map(|r| r.id.to_string())
        .collect::<Vec<_>>();
    assert_eq!(under_ten, vec!["13", "14"]);
    assert!(stored.iter().all(|r| r.id != MessageId::from(11)));

    let custom = explorer
        .add_turn("13", Party::A, "Then we will see you in court.")
        .await
        .expect("custom turn");
    assert_eq!(custom.as_str(), "15");
    let selected = explorer
        .selected_ids()
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>();
    assert_eq!(selected, vec!["1", "3", "6", "10", "13", "15"]);

    // A fresh explorer over the same folder follows the persisted selection.
    let reopened = Explorer::new(folder.clone(), SimulationId::from(42));
    reopened.reload().await.expect("reload");
    assert_eq!(reopened.selected_ids(), explorer.selected_ids());
}

#[tokio::test]
async fn traversal_errors_surface_as_external_failures() {
    let tmp = TempDir::new("dangling");
    let folder = negotiation_folder(&tmp);
    folder
        .add_bookmark(&MessageId::from(7), "settle")
        .expect("bookmark");
    std::fs::write(
        tmp.path.join("messages.json"),
        r#"[{"id": 1, "party": "system", "content": "Only the root is left"}]"#,
    )
    .unwrap();

    let explorer = Explorer::new(folder, SimulationId::from(42));
    explorer.reload().await.expect("reload");
    let err = explorer
        .reload_bookmarks()
        .await
        .expect_err("bookmarked node is gone");

    assert!(err.to_string().starts_with("traversal query failed: unknown message"));
    assert!(explorer.bookmarks().is_empty());
}
