//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which creates an in-memory catalog, a temporary
//! media directory, default config, and the full [`AppContext`]. Requests go
//! through the router with `oneshot`, so no port is bound.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use streamcat::config::Config;
use streamcat::server::{create_router, AppContext};
use streamcat_common::{ContentId, ViewerId};
use streamcat_db::models::{ContentRecord, NewContent};
use streamcat_db::pool::{init_memory_pool, DbPool};
use streamcat_db::queries::{content, lists};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub media_dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::new(Config::default(), db.clone());
        let media_dir = tempfile::tempdir().expect("failed to create media dir");
        Self { ctx, db, media_dir }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Write a media file into the temporary media directory.
    pub fn media_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.media_dir.path().join(name);
        std::fs::write(&path, bytes).expect("failed to write media file");
        path
    }

    pub fn insert(&self, new: NewContent) -> ContentId {
        let conn = self.db.get().unwrap();
        content::create_content(&conn, &new).unwrap().id
    }

    /// Visible, unrestricted audio content backed by the 26-byte alphabet.
    pub fn alphabet_audio(&self) -> ContentId {
        let path = self.media_file("alphabet.mp3", ALPHABET);
        self.insert(NewContent::audio("Alphabet", path.to_str().unwrap()))
    }

    pub fn content(&self, id: &ContentId) -> ContentRecord {
        let conn = self.db.get().unwrap();
        content::get_content(&conn, id).unwrap().unwrap()
    }

    pub fn set_visibility(&self, id: &ContentId, visible: bool) {
        let conn = self.db.get().unwrap();
        content::set_visibility(&conn, id, visible).unwrap();
    }

    /// Put content in a new curated list owned by `curator`.
    pub fn list_content(&self, id: &ContentId, is_private: bool) {
        let conn = self.db.get().unwrap();
        let owner: ViewerId = "curator".parse().unwrap();
        let list = lists::create_list(&conn, "List", &owner, is_private).unwrap();
        lists::add_entry(&conn, list.id, id).unwrap();
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
