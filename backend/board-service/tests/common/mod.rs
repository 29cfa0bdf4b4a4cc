//! Shared test collaborators
#![allow(dead_code)]

pub mod in_memory;

use board_service::services::{
    ArchivalEngine, AttachmentPipeline, CommentService, IdentityResolver, ThreadService,
};
use in_memory::{FakeCatalog, FakeStorage, InMemoryBoard};
use std::sync::Arc;
use std::time::Duration;

pub const CATALOG_SIZE: u32 = 826;

/// Every service wired to one in-memory board
pub struct TestServices {
    pub board: InMemoryBoard,
    pub catalog: FakeCatalog,
    pub storage: FakeStorage,
    pub identities: Arc<IdentityResolver>,
    pub threads: ThreadService,
    pub comments: CommentService,
    pub archival: ArchivalEngine,
}

pub fn services(window: Duration) -> TestServices {
    let board = InMemoryBoard::default();
    let catalog = FakeCatalog::new(CATALOG_SIZE);
    let storage = FakeStorage::default();
    let timeout = Duration::from_secs(1);

    let identities = Arc::new(IdentityResolver::new(
        Arc::new(board.clone()),
        Arc::new(catalog.clone()),
        CATALOG_SIZE,
        timeout,
    ));
    let attachments = AttachmentPipeline::new(Arc::new(storage.clone()), 5 << 20, timeout);

    TestServices {
        threads: ThreadService::new(
            Arc::new(board.clone()),
            identities.clone(),
            attachments.clone(),
            "posts",
        ),
        comments: CommentService::new(
            Arc::new(board.clone()),
            identities.clone(),
            attachments,
            "comments",
        ),
        archival: ArchivalEngine::new(Arc::new(board.clone()), window),
        identities,
        board,
        catalog,
        storage,
    }
}

/// Smallest byte string the sniffer recognises as PNG
pub fn png() -> Vec<u8> {
    b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x02\0\0\0".to_vec()
}
