// apiserver.rs

use std::io;

use askama::Template;
use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Response, StatusCode, header},
    response::{Html, IntoResponse},
    routing::*,
};
use tower_http::trace::TraceLayer;

use crate::*;

#[derive(Template)]
#[template(path = "index.html.ask", escape = "html")]
pub struct IndexPage<'a> {
    pub v: &'a DashboardView,
}

#[derive(Template)]
#[template(path = "error.html.ask", escape = "html")]
pub struct ErrorPage<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TempResponse {
    pub reading: Option<SensorReading>,
    pub setpoints: Option<Setpoints>,
    pub settemp_f: Option<f64>,
    pub error: Option<String>,
}

pub async fn run_api_server(state: Arc<MyState>) -> anyhow::Result<()> {
    let addr = state.config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening to {addr}");
    serve(listener, state).await
}

pub async fn serve(listener: tokio::net::TcpListener, state: Arc<MyState>) -> anyhow::Result<()> {
    Ok(axum::serve(listener, router(state).into_make_service()).await?)
}

pub fn router(state: Arc<MyState>) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/index.css", get(get_indexcss))
        .route("/image", get(get_image))
        .route("/temp", get(get_temp))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_page(status: StatusCode, title: &str, message: &str) -> Response<Body> {
    match (ErrorPage { title, message }).render() {
        Ok(s) => (status, Html(s)).into_response(),
        Err(e) => {
            error!("Error template error: {e:?}");
            (status, message.to_string()).into_response()
        }
    }
}

fn not_logged_in() -> Response<Body> {
    error_page(
        StatusCode::UNAUTHORIZED,
        "Not logged in",
        "Please log in to view the dashboard.",
    )
}

/// Settings and the newest log record, read side by side off the async threads.
async fn load_inputs(state: &MyState) -> (DashResult<Settings>, DashResult<SensorReading>) {
    let settings_file = state.config.settings_file();
    let log = state.sensor_log();

    let (settings, reading) = tokio::join!(
        tokio::task::spawn_blocking(move || Settings::load(settings_file)),
        tokio::task::spawn_blocking(move || log.latest()),
    );

    let settings = settings.unwrap_or_else(|e| {
        Err(DashError::ConfigUnreadable {
            path: state.config.settings_file(),
            source: io::Error::other(e.to_string()),
        })
    });
    let reading = reading.unwrap_or_else(|e| {
        Err(DashError::LogUnreadable {
            path: state.config.sensor_log(),
            source: io::Error::other(e.to_string()),
        })
    });
    (settings, reading)
}

pub async fn get_index(
    State(state): State<Arc<MyState>>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response<Body> {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_index()");
    let query = DashQuery::from_pairs(pairs);

    let Some(user) = state.gate.authorize(&headers) else {
        warn!("#{cnt} not authorized");
        return not_logged_in();
    };

    let ctx = RequestContext::new(&query, user);
    let (settings, reading) = load_inputs(&state).await;
    let now = Local::now().naive_local();

    let view = match state.presenter.build(&ctx, settings, reading, now) {
        Ok(v) => v,
        Err(e) => {
            error!("#{cnt} {e}");
            return error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error",
                &e.to_string(),
            );
        }
    };

    let arg = view.target.renderer_arg;
    if state.config.render_wait {
        state.graphs.render_and_wait(arg).await;
    } else {
        state.graphs.spawn(arg);
    }

    match (IndexPage { v: &view }).render() {
        Ok(s) => (StatusCode::OK, Html(s)).into_response(),
        Err(e) => {
            let err_msg = format!("Index template error: {e:?}\n");
            error!("{err_msg}");
            (StatusCode::INTERNAL_SERVER_ERROR, err_msg).into_response()
        }
    }
}

pub async fn get_indexcss(State(state): State<Arc<MyState>>) -> Response<Body> {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_indexcss()");

    let indexcss = include_bytes!("index.css");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        indexcss.to_vec(),
    )
        .into_response()
}

pub async fn get_image(
    State(state): State<Arc<MyState>>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response<Body> {
    let span = pairs
        .into_iter()
        .filter(|(k, _)| k == "span")
        .map(|(_, v)| v)
        .last();
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_image({span:?})");

    if state.gate.authorize(&headers).is_none() {
        warn!("#{cnt} not authorized");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let key = span.as_deref().unwrap_or_default();
    if !is_image_key(key) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.config.image_dir().join(format!("graph-{key}.png"));
    match tokio::fs::read(&path).await {
        Ok(png) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            png,
        )
            .into_response(),
        Err(e) => {
            warn!("#{cnt} cannot read {path:?}: {e}");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub async fn get_temp(
    State(state): State<Arc<MyState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<TempResponse>) {
    let cnt = state.api_cnt.fetch_add(1, Ordering::Relaxed);
    info!("#{cnt} get_temp()");

    if state.gate.authorize(&headers).is_none() {
        warn!("#{cnt} not authorized");
        let resp = TempResponse {
            reading: None,
            setpoints: None,
            settemp_f: None,
            error: Some("not logged in".into()),
        };
        return (StatusCode::UNAUTHORIZED, Json(resp));
    }

    let (settings, reading) = load_inputs(&state).await;
    let mut errors = Vec::new();

    let setpoints = match settings {
        Ok(s) => Some(s.setpoints()),
        Err(e) => {
            error!("#{cnt} {e}");
            errors.push(e.to_string());
            None
        }
    };
    let reading = match reading {
        Ok(r) => Some(r),
        Err(e) => {
            warn!("#{cnt} {e}");
            errors.push(e.to_string());
            None
        }
    };

    let status = if setpoints.is_some() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let resp = TempResponse {
        settemp_f: setpoints.as_ref().and_then(Setpoints::settemp_f),
        reading,
        setpoints,
        error: (!errors.is_empty()).then(|| errors.join("; ")),
    };
    (status, Json(resp))
}

// EOF
