use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Path segments that are followed by a team id
const TEAM_ID_MARKERS: [&str; 5] = ["team", "challenge", "sector-info", "verify", "time"];

#[derive(Clone, Debug)]
pub struct RequestTraceContext {
    pub trace_id: String,
    /// Team addressed by the path, when there is one
    pub team_id: Option<String>,
}

/// Pulls the team id out of paths like `/api/round2/team/{id}` or `/api/teams/{id}`
pub fn team_id_from_path(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if let ["api", "teams", id] = segments.as_slice() {
        return (*id != "register").then(|| id.to_string());
    }
    if let ["api", "admin", "teams", id] = segments.as_slice() {
        return Some(id.to_string());
    }

    segments
        .windows(2)
        .find(|pair| TEAM_ID_MARKERS.contains(&pair[0]))
        .map(|pair| pair[1].to_string())
}

/// Echoes the caller's `x-trace-id` or assigns a fresh one, and runs the rest
/// of the stack inside a span carrying the trace id and addressed team.
pub async fn trace_context_middleware(mut request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let team_id = team_id_from_path(request.uri().path());

    let span = tracing::info_span!(
        "event_request",
        trace_id = %trace_id,
        team_id = tracing::field::Empty
    );
    if let Some(team_id) = &team_id {
        span.record("team_id", team_id.as_str());
    }

    request.extensions_mut().insert(RequestTraceContext {
        trace_id: trace_id.clone(),
        team_id,
    });

    let header_value = HeaderValue::from_str(&trace_id).ok();
    if let Some(value) = &header_value {
        request
            .headers_mut()
            .entry(HeaderName::from_static(TRACE_ID_HEADER))
            .or_insert_with(|| value.clone());
    }

    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header_value {
        response
            .headers_mut()
            .entry(HeaderName::from_static(TRACE_ID_HEADER))
            .or_insert(value);
    }

    response
}
