use axum::http::header;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::cli::ServeArgs;
use crate::core::types::EntryId;
use crate::database::store::GameDatabase;
use crate::matching::engine::{MatchingConfig, MatchingEngine, DEFAULT_RESULT_LIMIT};
use crate::parsing::sgf::{parse_record_bytes, ParseError};
use crate::utils::validation::{
    clamp_move_count, validate_upload, ValidationError, MAX_RECORD_SIZE,
};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
pub const MAX_TEXT_FIELD_SIZE: usize = 1024; // numbers only
pub const MAX_RESULT_LIMIT: usize = 100;

/// Bytes escaped when a record name becomes one URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Download link for a database record
#[must_use]
pub fn record_url(id: &EntryId) -> String {
    format!("/database/{}", utf8_percent_encode(&id.0, PATH_SEGMENT))
}

/// Shared application state
pub struct AppState {
    /// Records parsed once at startup, cut to `max_moves`
    pub database: GameDatabase,
    pub database_dir: PathBuf,
    /// Ceiling for the per-request move cutoff
    pub max_moves: usize,
}

impl AppState {
    /// Load the database directory once for the lifetime of the server
    ///
    /// # Errors
    ///
    /// Returns an error if the database directory cannot be listed.
    pub fn load(database_dir: PathBuf, max_moves: usize) -> anyhow::Result<Self> {
        let database = GameDatabase::load_dir(&database_dir, max_moves)?;
        Ok(Self {
            database,
            database_dir,
            max_moves,
        })
    }
}

/// Search request extracted from the multipart form
#[derive(Debug)]
struct SearchRequest {
    content: Vec<u8>,
    filename: Option<String>,
    num_moves: usize,
    result_limit: usize,
}

/// Enhanced error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    pub details: Option<String>,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    // Log detailed error server-side for debugging (not exposed to client)
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None, // Never expose internal details to prevent information disclosure
    }
}

fn error_response(
    status: StatusCode,
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> Response {
    (
        status,
        Json(create_safe_error_response(
            error_type,
            user_message,
            internal_error,
        )),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created, the database
/// cannot be loaded, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Routes only, without the middleware stack
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/search", post(search_handler))
        .route("/api/database", get(database_handler))
        .route("/database/{filename}", get(record_file_handler))
        .with_state(state)
}

/// Create the application router with all routes and middleware configured.
#[allow(clippy::missing_panics_doc)] // Panics only on invalid governor config (constants are valid)
pub fn create_router(state: Arc<AppState>) -> Router {
    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .unwrap();

    build_router(state).layer(
        ServiceBuilder::new()
            // Security headers for browser protection
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-xss-protection"),
                HeaderValue::from_static("1; mode=block"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            ))
            // IP-based rate limiting to prevent abuse
            .layer(GovernorLayer {
                config: Arc::new(governor_conf),
            })
            // Request timeout to prevent slow client attacks
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(30),
            ))
            // Limit concurrent requests to prevent DOS
            .layer(ConcurrencyLimitLayer::new(100))
            // One record plus multipart overhead
            .layer(DefaultBodyLimit::max(MAX_RECORD_SIZE + 64 * 1024)),
    )
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let state = AppState::load(args.database.clone(), args.moves)?;

    tracing::info!(
        records = state.database.len(),
        skipped = state.database.skipped().len(),
        max_moves = state.max_moves,
        "Loaded game database"
    );

    let app = create_router(Arc::new(state));

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting kifu-finder web server at http://{addr}");

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

/// API endpoint ranking the database against an uploaded record
async fn search_handler(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let start_time = std::time::Instant::now();

    let request = match extract_request_data(&mut multipart, state.max_moves).await {
        Ok(request) => request,
        Err(error_response) => return error_response,
    };

    let source = request.filename.as_deref().unwrap_or("upload");
    let query = match parse_record_bytes(&request.content, request.num_moves, source) {
        Ok(query) => query,
        Err(e) => return parse_error_response(&e),
    };

    let num_moves = request.num_moves;
    let result_limit = request.result_limit;
    let worker_state = Arc::clone(&state);
    let worker_query = query.clone();

    // Scoring is CPU bound and runs on the rayon pool
    let scored = tokio::task::spawn_blocking(move || {
        let truncated;
        let database = if num_moves < worker_state.max_moves {
            truncated = worker_state.database.truncated(num_moves);
            &truncated
        } else {
            &worker_state.database
        };

        let config = MatchingConfig {
            max_moves: num_moves,
            result_limit,
        };
        MatchingEngine::with_config(database, config).find_top_matches(&worker_query)
    })
    .await;

    let matches = match scored {
        Ok(matches) => matches,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "search_failed",
                "Search failed",
                Some(&e.to_string()),
            );
        }
    };

    #[allow(clippy::cast_possible_truncation)] // Processing time won't exceed u64
    let processing_time = start_time.elapsed().as_millis() as u64;

    Json(serde_json::json!({
        "query": {
            "filename": request.filename,
            "moves": query.len(),
            "sgf": query.to_sgf_nodes(),
        },
        "matches": matches
            .iter()
            .enumerate()
            .map(|(i, row)| {
                serde_json::json!({
                    "rank": i + 1,
                    "id": row.id.0,
                    "url": record_url(&row.id),
                    "score": row.score,
                    "variant": row.variant,
                })
            })
            .collect::<Vec<_>>(),
        "processing_info": {
            "database_size": state.database.len(),
            "processing_time_ms": processing_time,
            "configuration": {
                "num_moves": num_moves,
                "result_limit": result_limit,
            }
        }
    }))
    .into_response()
}

fn parse_error_response(error: &ParseError) -> Response {
    match error {
        ParseError::UnreadableEncoding(_) => error_response(
            StatusCode::BAD_REQUEST,
            "unreadable_encoding",
            "Record is not UTF-8, Shift_JIS or ASCII text",
            None,
        ),
        ParseError::InvalidCoordinate(_) => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_coordinate",
            "Record contains a move outside the 19x19 board",
            None,
        ),
        _ => error_response(
            StatusCode::BAD_REQUEST,
            "parse_error",
            "Failed to read the uploaded record",
            Some(&error.to_string()),
        ),
    }
}

fn validation_error_response(error: &ValidationError) -> Response {
    match error {
        ValidationError::FilenameTooLong => error_response(
            StatusCode::BAD_REQUEST,
            "filename_too_long",
            "Filename exceeds maximum length limit",
            Some("Filename validation failed due to length constraints"),
        ),
        ValidationError::InvalidFilename | ValidationError::EmptyFilename => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_filename",
            "Filename contains invalid or dangerous characters",
            Some("Filename validation failed due to invalid characters"),
        ),
        ValidationError::FileTooLarge => error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            "file_too_large",
            "File size exceeds limit",
            None,
        ),
        ValidationError::InvalidFileContent => error_response(
            StatusCode::BAD_REQUEST,
            "invalid_content",
            "File content appears malformed or empty",
            None,
        ),
    }
}

/// Extract the record and search parameters from the multipart form
async fn extract_request_data(
    multipart: &mut Multipart,
    max_moves: usize,
) -> Result<SearchRequest, Response> {
    let mut content: Option<Vec<u8>> = None;
    let mut filename = None;
    let mut num_moves = max_moves;
    let mut result_limit = DEFAULT_RESULT_LIMIT;

    let mut fields_received = 0usize;
    let mut had_parse_error = false;

    loop {
        // Check field count limit before processing
        if fields_received >= MAX_MULTIPART_FIELDS {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Too many form fields".to_string(),
                    error_type: "field_limit_exceeded".to_string(),
                    details: None, // No internal details for security
                }),
            )
                .into_response());
        }

        match multipart.next_field().await {
            Ok(Some(field)) => {
                fields_received += 1;
                let name = field.name().unwrap_or_default().to_string();

                match name.as_str() {
                    "sgf_file" => {
                        let upload_name = field
                            .file_name()
                            .filter(|n| !n.is_empty())
                            .map(std::string::ToString::to_string);

                        match field.bytes().await {
                            Ok(bytes) => match validate_upload(upload_name.as_deref(), &bytes) {
                                Ok(validated) => {
                                    filename = validated;
                                    content = Some(bytes.to_vec());
                                }
                                Err(e) => return Err(validation_error_response(&e)),
                            },
                            Err(_) => had_parse_error = true,
                        }
                    }
                    "num_moves" => {
                        if let Some(n) = read_count_field(field).await {
                            num_moves = clamp_move_count(n, max_moves);
                        }
                    }
                    "result_limit" => {
                        if let Some(n) = read_count_field(field).await {
                            result_limit = n.clamp(1, MAX_RESULT_LIMIT);
                        }
                    }
                    _ => {} // Ignore unknown fields
                }
            }
            Ok(None) => break, // No more fields
            Err(_) => {
                had_parse_error = true;
                break;
            }
        }
    }

    let Some(content) = content else {
        let error_msg = if had_parse_error {
            "Failed to parse upload. Please check the file."
        } else if fields_received == 0 {
            "No data received. Please upload an SGF file."
        } else {
            "No SGF file found in upload."
        };
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "missing_input",
            error_msg,
            None,
        ));
    };

    Ok(SearchRequest {
        content,
        filename,
        num_moves,
        result_limit,
    })
}

/// Read a small numeric form field; malformed values are ignored
async fn read_count_field(field: axum::extract::multipart::Field<'_>) -> Option<usize> {
    let text = field.text().await.ok()?;
    if text.len() > MAX_TEXT_FIELD_SIZE {
        return None;
    }
    text.trim().parse::<usize>().ok()
}

/// Return list of records in the database
async fn database_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let records: Vec<serde_json::Value> = state
        .database
        .entries()
        .iter()
        .map(|e| {
            serde_json::json!({
                "id": e.id.0,
                "url": record_url(&e.id),
                "moves": e.moves.len(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "directory": state.database_dir.display().to_string(),
        "max_moves": state.max_moves,
        "count": records.len(),
        "records": records,
        "skipped": state.database.skipped().len(),
    }))
}

/// Serve the raw bytes of a database record
///
/// The decoded name is only used as a database key; files that were not
/// loaded at startup are never opened.
async fn record_file_handler(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Response {
    let Some(path) = state
        .database
        .get(&EntryId::new(filename))
        .and_then(|entry| entry.path.clone())
    else {
        return error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            "Record not found in database",
            None,
        );
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, "application/x-go-sgf")],
            bytes,
        )
            .into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "read_failed",
            "Record could not be read",
            Some(&format!("{}: {e}", path.display())),
        ),
    }
}
