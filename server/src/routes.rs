use std::{net::SocketAddr, path::Path as FsPath, sync::Arc};

use axum::{
    body::Body, extract::{ConnectInfo, Path, State}, handler::HandlerWithoutStateExt, http::{Request, StatusCode}, middleware::{self, Next}, response::{Html, IntoResponse, Response}, routing::get, Json, Router
};
use scan_report_data_management::{source::SummarySource, DataManagerError};
use serde_json::json;
use tower_http::services::ServeDir;

use crate::{dashboard::build_dashboard, render, server_state::ServerState};

pub fn router<S: SummarySource + 'static>(state: Arc<ServerState<S>>, static_dir: impl AsRef<FsPath>) -> Router {
    let api = Router::new()
        .route("/countries", get(get_country_codes::<S>))
        .route("/dashboard/{country_code}", get(get_dashboard::<S>));

    Router::new()
        .route("/", get(get_default_landing_page::<S>))
        .route("/not", get(get_indeterminate_page))
        .route("/{country_code}", get(get_landing_page::<S>))
        .nest("/api", api)
        .nest_service("/static", ServeDir::new(static_dir.as_ref()).not_found_service(page_not_found.into_service()))
        .fallback(page_not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_visit))
}

async fn log_visit(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    match req.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => tracing::debug!("{} {} from {}", method, path, addr.ip()),
        None => tracing::debug!("{} {}", method, path),
    }

    let response = next.run(req).await;
    tracing::debug!("{} {} -> {}", method, path, response.status());
    response
}

async fn get_default_landing_page<S: SummarySource + 'static>(State(state): State<Arc<ServerState<S>>>) -> Response {
    landing_page(&state, &state.default_country).await
}

async fn get_landing_page<S: SummarySource + 'static>(
    State(state): State<Arc<ServerState<S>>>,
    Path(country_code): Path<String>,
) -> Response {
    landing_page(&state, &country_code).await
}

async fn landing_page<S: SummarySource>(state: &ServerState<S>, country_code: &str) -> Response {
    match state.data_manager.verified_country(country_code).await {
        Ok(country) => {
            let dashboard = build_dashboard(&country).await;
            Html(render::dashboard_page(&dashboard)).into_response()
        },
        Err(DataManagerError::UnknownCountry(_)) => page_not_found().await,
        Err(err) => {
            tracing::warn!("Serving the unavailable page for {}: {}", country_code, err);
            Html(render::indeterminate_page()).into_response()
        },
    }
}

async fn get_indeterminate_page() -> Response {
    Html(render::indeterminate_page()).into_response()
}

async fn page_not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response()
}

async fn get_country_codes<S: SummarySource + 'static>(State(state): State<Arc<ServerState<S>>>) -> Response {
    match state.data_manager.get_country_codes().await {
        Ok(codes) => Json(codes).into_response(),
        Err(err) => {
            tracing::error!("Failed to get country codes: {}", err);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": err.to_string() }))).into_response()
        },
    }
}

async fn get_dashboard<S: SummarySource + 'static>(
    State(state): State<Arc<ServerState<S>>>,
    Path(country_code): Path<String>,
) -> Response {
    match state.data_manager.verified_country(&country_code).await {
        Ok(country) => Json(build_dashboard(&country).await).into_response(),
        Err(err @ DataManagerError::UnknownCountry(_)) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
        },
        Err(err) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "error": err.to_string() }))).into_response(),
    }
}
