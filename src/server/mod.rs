//! JSON API over the content stores, with theme cookie handling

use anyhow::Result;
use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{
    sort_newest_first, tag_summary, BlogPost, BlogPostPreview, BlogStore, ContentError,
    MarkdownRenderer, Project, ProjectStore, TagCount,
};
use crate::theme::{ThemePicker, ThemeSelection};
use crate::Folio;

/// Shared server state
pub struct AppState {
    pub blog: BlogStore,
    pub projects: ProjectStore,
    pub themes: ThemePicker,
    pub renderer: MarkdownRenderer,
}

impl AppState {
    pub fn new(folio: &Folio, cache: bool) -> Self {
        Self {
            blog: folio.blog().with_cache(cache),
            projects: folio.projects().with_cache(cache),
            themes: ThemePicker::new(folio.config.theme.clone()),
            renderer: MarkdownRenderer::from_config(&folio.config.highlight),
        }
    }
}

/// Error response body: `{"statusCode": 404, "statusMessage": "..."}`
#[derive(Debug)]
pub enum ApiError {
    NotFound(&'static str),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        let body = serde_json::json!({
            "statusCode": status.as_u16(),
            "statusMessage": message,
        });
        (status, Json(body)).into_response()
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        tracing::error!("{}", err);
        ApiError::Internal(err.to_string())
    }
}

/// Run a store call on the blocking pool
async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppState) -> Result<T, ContentError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

/// Build the router
pub fn router(state: Arc<AppState>, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/blog", get(list_posts))
        .route("/api/blog/:slug", get(get_post))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/list", get(list_projects))
        .route("/api/projects/:slug", get(get_project))
        .route("/api/tags", get(list_tags))
        .route("/api/theme", get(get_theme))
        .route("/api/theme/:name", put(put_theme))
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(middleware::from_fn_with_state(state.clone(), theme_header))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(folio: &Folio, ip: &str, port: u16, watch: bool) -> Result<()> {
    // The watcher invalidates cached listings
    let state = Arc::new(AppState::new(folio, folio.config.cache || watch));
    let app = router(Arc::clone(&state), folio.public_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    if watch {
        let dirs = vec![folio.blog_dir.clone(), folio.projects_dir.clone()];
        let state = Arc::clone(&state);
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_content(dirs, state) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    tracing::info!("Serving blog from {:?}", folio.blog_dir);
    tracing::info!("Serving projects from {:?}", folio.projects_dir);
    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Directories to watch so that a content root appearing, vanishing or
/// changing is noticed: the nearest existing parent of each root
fn watch_targets(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = Vec::new();
    for root in roots {
        let Some(target) = root.ancestors().skip(1).find(|dir| dir.is_dir()) else {
            tracing::warn!("Nothing to watch for {:?}", root);
            continue;
        };
        if !targets.iter().any(|t| target.starts_with(t)) {
            targets.retain(|t| !t.starts_with(target));
            targets.push(target.to_path_buf());
        }
    }
    targets
}

/// Clear cached listings whenever a content directory changes
fn watch_content(roots: Vec<PathBuf>, state: Arc<AppState>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in watch_targets(&roots) {
        debouncer.watcher().watch(&dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", dir);
    }

    for result in rx {
        match result {
            Ok(events) => {
                if events.is_empty() {
                    continue;
                }
                for event in &events {
                    tracing::debug!("Changed: {}", event.path.display());
                }
                state.blog.invalidate();
                state.projects.invalidate();
                tracing::info!("Content changed, cleared cached listings");
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Adds `x-theme` with the visitor's resolved theme to every response
async fn theme_header(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let theme = state
        .themes
        .theme_from_cookies(cookie_header(request.headers()))
        .to_string();

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&theme) {
        response.headers_mut().insert("x-theme", value);
    }
    response
}

fn cookie_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::COOKIE).and_then(|v| v.to_str().ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    /// `date` sorts newest first
    pub sort: Option<String>,
    /// Keep posts carrying this tag slug
    pub tag: Option<String>,
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogQuery>,
) -> Result<Json<Vec<BlogPostPreview>>, ApiError> {
    let mut posts = blocking(&state, |s| s.blog.list_posts()).await?;

    if let Some(tag) = query.tag.as_deref().filter(|t| !t.is_empty()) {
        posts.retain(|p| p.has_tag(tag));
    }
    if query.sort.as_deref() == Some("date") {
        sort_newest_first(&mut posts);
    }

    Ok(Json(posts))
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    #[serde(default)]
    pub render: bool,
}

/// A blog post, optionally with its body rendered to HTML
#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(flatten)]
    pub post: BlogPost,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<RenderQuery>,
) -> Result<Json<PostResponse>, ApiError> {
    let render = query.render;
    let response = blocking(&state, move |s| {
        Ok(s.blog.get_post_by_slug(&slug)?.map(|post| {
            let html = render.then(|| s.renderer.render(&post.content));
            PostResponse { post, html }
        }))
    })
    .await?;

    response
        .map(Json)
        .ok_or(ApiError::NotFound("Blog post not found"))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub grouped: Option<String>,
    pub category: Option<String>,
}

async fn list_projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProjectQuery>,
) -> Result<Response, ApiError> {
    let grouped = query
        .grouped
        .as_deref()
        .is_some_and(|g| g.eq_ignore_ascii_case("true"));

    if grouped {
        let grouped = blocking(&state, |s| s.projects.list_projects_grouped_by_category()).await?;
        return Ok(Json(grouped).into_response());
    }

    let category = query.category.map(|c| c.trim().to_string());
    let projects = match category.filter(|c| !c.is_empty()) {
        Some(category) => {
            blocking(&state, move |s| s.projects.list_projects_by_category(&category)).await?
        }
        None => blocking(&state, |s| s.projects.list_project_previews()).await?,
    };

    Ok(Json(projects).into_response())
}

async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Project>, ApiError> {
    blocking(&state, move |s| s.projects.get_project_by_slug(&slug))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Project not found"))
}

async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TagCount>>, ApiError> {
    let posts = blocking(&state, |s| s.blog.list_posts()).await?;
    Ok(Json(tag_summary(&posts)))
}

async fn get_theme(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<ThemeSelection> {
    let theme = state.themes.theme_from_cookies(cookie_header(&headers));
    Json(state.themes.selection(theme))
}

async fn put_theme(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.themes.accepts(&name) {
        return Err(ApiError::BadRequest(format!("Unknown theme: {}", name)));
    }

    tracing::debug!("Theme set to {}", name);
    let cookie = state.themes.set_cookie(&name);
    Ok(([(header::SET_COOKIE, cookie)], Json(state.themes.selection(&name))))
}
