use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::autolink::{AutoLinkSummary, AutoLinker};
use crate::classify::{past_contests, ContestBoard, ContestFilter};
use crate::config::app::AppConfig;
use crate::contest::{Contest, Platform};
use crate::ingest::providers::{build_http_client, default_providers};
use crate::ingest::scheduler::{refresh_once, ContestCache};
use crate::ingest::Aggregator;
use crate::store::bookmarks::BookmarkStore;
use crate::store::solutions::{SolutionLinkError, SolutionLinkForm, SolutionLinkStore};
use crate::store::{FileBackend, StorageBackend};
use crate::video::youtube::YoutubePlaylistProvider;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub cache: Arc<ContestCache>,
    pub bookmarks: Arc<BookmarkStore>,
    pub solutions: Arc<SolutionLinkStore>,
    pub autolinker: Arc<AutoLinker>,
}

impl AppState {
    /// Live providers, file-backed stores under `cfg.data_dir`.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let backend: Arc<dyn StorageBackend> = Arc::new(FileBackend::new(&cfg.data_dir));
        let solutions = Arc::new(SolutionLinkStore::new(Arc::clone(&backend)));
        let client = build_http_client(cfg.request_timeout())?;
        let videos = Arc::new(YoutubePlaylistProvider::from_config(&cfg.youtube, client));
        Ok(Self {
            aggregator: Arc::new(Aggregator::new(default_providers(cfg)?)),
            cache: Arc::new(ContestCache::new()),
            bookmarks: Arc::new(BookmarkStore::new(backend)),
            autolinker: Arc::new(AutoLinker::new(
                videos,
                cfg.youtube.playlists.clone(),
                Arc::clone(&solutions),
            )),
            solutions,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/contests", get(list_contests))
        .route("/contests/refresh", post(refresh_contests))
        .route("/bookmarks", get(list_bookmarks).post(add_bookmark))
        .route("/bookmarks/{id}", get(bookmark_status).delete(remove_bookmark))
        .route("/solutions", put(put_solution))
        .route("/solutions/{id}", get(get_solution))
        .route("/admin/auto-link", post(auto_link))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct BoardQuery {
    /// Comma-separated platform ids; absent means all.
    #[serde(default)]
    platforms: Option<String>,
    #[serde(default)]
    q: Option<String>,
}

impl BoardQuery {
    fn filter(&self) -> ContestFilter {
        let mut f = ContestFilter::default().with_query(self.q.clone().unwrap_or_default());
        if let Some(list) = self.platforms.as_deref() {
            let selected: Vec<Platform> = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .filter_map(|s| s.parse().ok())
                .collect();
            f = f.with_platforms(selected);
        }
        f
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardOut {
    refreshed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    board: ContestBoard,
}

fn board_for(state: &AppState, contests: Vec<Contest>, q: &BoardQuery) -> ContestBoard {
    let filtered = q.filter().apply(contests);
    let resolved = state.solutions.resolve_all(&filtered);
    ContestBoard::build(resolved, Utc::now())
}

async fn list_contests(State(state): State<AppState>, Query(q): Query<BoardQuery>) -> Json<BoardOut> {
    let snap = state.cache.snapshot();
    Json(BoardOut {
        refreshed_at: snap.refreshed_at,
        board: board_for(&state, snap.contests, &q),
    })
}

#[derive(Serialize)]
struct CountOut {
    count: usize,
}

async fn refresh_contests(State(state): State<AppState>) -> Json<CountOut> {
    let count = refresh_once(&state.aggregator, &state.cache).await;
    Json(CountOut { count })
}

async fn list_bookmarks(State(state): State<AppState>, Query(q): Query<BoardQuery>) -> Json<ContestBoard> {
    Json(board_for(&state, state.bookmarks.list(), &q))
}

#[derive(Serialize)]
struct AddedOut {
    added: bool,
}

#[derive(Serialize)]
struct RemovedOut {
    removed: bool,
}

#[derive(Serialize)]
struct BookmarkedOut {
    bookmarked: bool,
}

#[derive(Serialize)]
struct ErrorOut {
    error: String,
}

fn storage_failure(e: anyhow::Error) -> Response {
    tracing::warn!(error = ?e, "storage write failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorOut {
            error: format!("{e:#}"),
        }),
    )
        .into_response()
}

async fn add_bookmark(State(state): State<AppState>, Json(contest): Json<Contest>) -> Response {
    // keep the duration invariant even for client-supplied contests
    let contest = Contest::new(
        contest.id,
        contest.name,
        contest.platform,
        contest.url,
        contest.start_time,
        contest.end_time,
    );
    match state.bookmarks.add(&contest) {
        Ok(added) => Json(AddedOut { added }).into_response(),
        Err(e) => storage_failure(e),
    }
}

async fn bookmark_status(State(state): State<AppState>, Path(id): Path<String>) -> Json<BookmarkedOut> {
    Json(BookmarkedOut {
        bookmarked: state.bookmarks.is_bookmarked(&id),
    })
}

async fn remove_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.bookmarks.remove(&id) {
        Ok(removed) => Json(RemovedOut { removed }).into_response(),
        Err(e) => storage_failure(e),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SolutionOut {
    contest_id: String,
    solution_url: Option<String>,
}

async fn get_solution(State(state): State<AppState>, Path(id): Path<String>) -> Json<SolutionOut> {
    Json(SolutionOut {
        solution_url: state.solutions.get(&id),
        contest_id: id,
    })
}

async fn put_solution(State(state): State<AppState>, Json(form): Json<SolutionLinkForm>) -> Response {
    match state.solutions.submit(&form) {
        Ok(()) => Json(SolutionOut {
            contest_id: form.contest_id.trim().to_string(),
            solution_url: Some(form.solution_url.trim().to_string()),
        })
        .into_response(),
        Err(SolutionLinkError::Storage(e)) => storage_failure(e),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorOut {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn auto_link(State(state): State<AppState>) -> Json<AutoLinkSummary> {
    let snap = state.cache.snapshot();
    let past = past_contests(&snap.contests, Utc::now());
    Json(state.autolinker.run(&past).await)
}
