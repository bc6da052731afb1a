// Roadsense API Library
//
// HTTP/JSON REST API plus the WebSocket push channel

pub mod http;

// Re-export commonly used types
pub use http::AppState;
