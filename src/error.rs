use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("ORS_API_KEY is missing or empty")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Directions service error {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid directions response: {0}")]
    InvalidResponse(String),
    #[error("Directions service returned no routes")]
    NoRoutes,
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] routegraph_core::Error),
}
