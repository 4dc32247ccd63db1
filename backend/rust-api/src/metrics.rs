use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Database Metrics (MongoDB)
    pub static ref DB_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "db_operations_total",
        "Total number of database operations",
        &["operation", "collection", "status"]
    )
    .unwrap();

    pub static ref DB_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "db_operation_duration_seconds",
        "Database operation duration in seconds",
        &["operation", "collection"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .unwrap();

    pub static ref WRITE_CONFLICTS_TOTAL: IntCounter = register_int_counter!(
        "team_write_conflicts_total",
        "Optimistic team updates that lost a race and were retried"
    )
    .unwrap();

    // Business Metrics
    pub static ref TEAMS_REGISTERED_TOTAL: IntCounter = register_int_counter!(
        "teams_registered_total",
        "Total number of registered teams"
    )
    .unwrap();

    pub static ref QUIZ_SUBMISSIONS_TOTAL: IntCounter = register_int_counter!(
        "quiz_submissions_total",
        "Total number of round 1 quiz submissions"
    )
    .unwrap();

    pub static ref PURCHASES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "component_purchases_total",
        "Round 1 purchase attempts by outcome",
        &["outcome"]
    )
    .unwrap();

    pub static ref SCHEMATICS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "schematics_submitted_total",
        "Round 2 schematic submissions",
        &["all_correct"]
    )
    .unwrap();

    pub static ref ROUND3_SUBMISSIONS_TOTAL: IntCounter = register_int_counter!(
        "round3_submissions_total",
        "Round 3 results reported by teams"
    )
    .unwrap();

    pub static ref ROUND3_VERIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "round3_verifications_total",
        "Admin decisions on round 3 results",
        &["verified"]
    )
    .unwrap();

    pub static ref ROUND3_OVERRIDES_TOTAL: IntCounter = register_int_counter!(
        "round3_overrides_total",
        "Manual round 3 corrections by admins"
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track database operation with metrics
pub async fn track_db_operation<F, T>(
    operation: &str,
    collection: &str,
    future: F,
) -> Result<T, anyhow::Error>
where
    F: std::future::Future<Output = Result<T, anyhow::Error>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    DB_OPERATIONS_TOTAL
        .with_label_values(&[operation, collection, status])
        .inc();

    DB_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation, collection])
        .observe(duration);

    result
}
