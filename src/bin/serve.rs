//! Demo HTTP wrapper around two in-memory [`weave::Doc`]s, mirroring the
//! reference transport sketched in spec.md §6 (and, before that, the
//! original `go-eggwalker` server: `/send-left`, `/send-right`, `/delete`,
//! `/reset`). Out of scope for the core crate itself — see DESIGN.md for
//! what's kept and what's redesigned versus the original.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use weave::{Doc, Id, Item, OriginLeft, OriginRight};

#[derive(Parser, Debug)]
#[command(about = "Demo server exposing two synchronized weave documents")]
struct ServeArgs {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Agent name for the left-hand demo document.
    #[arg(long, default_value = "agent1")]
    left_agent: String,

    /// Agent name for the right-hand demo document.
    #[arg(long, default_value = "agent2")]
    right_agent: String,
}

struct AppState {
    left: Mutex<Doc>,
    right: Mutex<Doc>,
    left_agent: String,
    right_agent: String,
}

impl AppState {
    fn new(left_agent: String, right_agent: String) -> AppState {
        return AppState {
            left: Mutex::new(Doc::new(&left_agent)),
            right: Mutex::new(Doc::new(&right_agent)),
            left_agent,
            right_agent,
        };
    }
}

#[derive(Serialize)]
struct ContentResponse {
    left: String,
    right: String,
}

impl ContentResponse {
    fn snapshot(state: &AppState) -> ContentResponse {
        return ContentResponse {
            left: state.left.lock().unwrap().string_content(),
            right: state.right.lock().unwrap().string_content(),
        };
    }
}

#[derive(Deserialize)]
struct InsertRequest {
    text: String,
    position: u64,
}

#[derive(Deserialize)]
struct DeleteRequest {
    agent: String,
    position: u64,
    #[serde(rename = "numDeletions")]
    num_deletions: u64,
}

/// Wire form of an [`Item`]'s tagged origin: `"begin"`, `"end"`, or
/// `{"ref": {"agent", "seq"}}`, per spec.md §6.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum WireOrigin {
    Begin,
    End,
    Ref { agent: String, seq: u64 },
}

impl WireOrigin {
    fn left(origin: &OriginLeft) -> WireOrigin {
        return match origin {
            OriginLeft::DocBeginning => WireOrigin::Begin,
            OriginLeft::Ref(id) => WireOrigin::from_id(id),
        };
    }

    fn right(origin: &OriginRight) -> WireOrigin {
        return match origin {
            OriginRight::DocEnding => WireOrigin::End,
            OriginRight::Ref(id) => WireOrigin::from_id(id),
        };
    }

    fn from_id(id: &Id) -> WireOrigin {
        return WireOrigin::Ref {
            agent: id.agent.to_string(),
            seq: id.seq,
        };
    }
}

#[derive(Serialize)]
struct WireItem {
    agent: String,
    seq: u64,
    content: char,
    origin_left: WireOrigin,
    origin_right: WireOrigin,
    deleted: bool,
}

impl From<&Item> for WireItem {
    fn from(item: &Item) -> WireItem {
        return WireItem {
            agent: item.id.agent.to_string(),
            seq: item.id.seq,
            content: item.content,
            origin_left: WireOrigin::left(&item.origin_left),
            origin_right: WireOrigin::right(&item.origin_right),
            deleted: item.deleted,
        };
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Json<ContentResponse> {
    return Json(ContentResponse::snapshot(&state));
}

async fn items_for(side: &str, state: &AppState) -> Vec<WireItem> {
    let doc = if side == "left" {
        state.left.lock().unwrap()
    } else {
        state.right.lock().unwrap()
    };
    return doc.items().iter().map(WireItem::from).collect();
}

async fn left_items(State(state): State<Arc<AppState>>) -> Json<Vec<WireItem>> {
    return Json(items_for("left", &state).await);
}

async fn right_items(State(state): State<Arc<AppState>>) -> Json<Vec<WireItem>> {
    return Json(items_for("right", &state).await);
}

/// Text typed into the left pane: insert into `left`, then sync both ways.
async fn send_right(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InsertRequest>,
) -> Json<ContentResponse> {
    {
        let mut left = state.left.lock().unwrap();
        left.local_insert_text(&req.text, req.position)
            .expect("demo endpoint: position out of range");
    }
    sync(&state);
    return Json(ContentResponse::snapshot(&state));
}

/// Text typed into the right pane: insert into `right`, then sync both ways.
async fn send_left(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InsertRequest>,
) -> Json<ContentResponse> {
    {
        let mut right = state.right.lock().unwrap();
        right
            .local_insert_text(&req.text, req.position)
            .expect("demo endpoint: position out of range");
    }
    sync(&state);
    return Json(ContentResponse::snapshot(&state));
}

async fn handle_delete(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Json<ContentResponse> {
    if req.agent == state.left_agent {
        let mut left = state.left.lock().unwrap();
        left.local_delete(req.position, req.num_deletions)
            .expect("demo endpoint: position out of range");
    } else {
        let mut right = state.right.lock().unwrap();
        right
            .local_delete(req.position, req.num_deletions)
            .expect("demo endpoint: position out of range");
    }
    sync(&state);
    return Json(ContentResponse::snapshot(&state));
}

async fn reset(State(state): State<Arc<AppState>>) -> Json<ContentResponse> {
    *state.left.lock().unwrap() = Doc::new(&state.left_agent);
    *state.right.lock().unwrap() = Doc::new(&state.right_agent);
    return Json(ContentResponse::snapshot(&state));
}

/// Merge both documents into each other until they agree.
fn sync(state: &AppState) {
    let mut left = state.left.lock().unwrap();
    let mut right = state.right.lock().unwrap();
    left.merge_into(&right).expect("demo documents diverged causally");
    right.merge_into(&left).expect("demo documents diverged causally");
    tracing::debug!(left = %left.string_content(), right = %right.string_content(), "synced");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = Arc::new(AppState::new(args.left_agent, args.right_agent));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index))
        .route("/items/left", get(left_items))
        .route("/items/right", get(right_items))
        .route("/send-right", post(send_right))
        .route("/send-left", post(send_left))
        .route("/delete", post(handle_delete))
        .route("/reset", post(reset))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app).await?;
    return Ok(());
}
