/// SSO Service Library
///
/// Issues signed session tokens to registered users on behalf of registered
/// applications, and answers admin-flag lookups.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `error`: Auth error taxonomy and wire mapping
/// - `grpc`: gRPC server implementation
/// - `http`: Health and metrics endpoints
/// - `metrics`: Prometheus counters
/// - `models`: Data models
/// - `security`: Password hashing and token signing
/// - `services`: Auth business logic
/// - `storage`: Credential store contract and backends
/// - `telemetry`: Tracing subscriber setup
/// - `validators`: Request validation
pub mod config;
pub mod error;
pub mod grpc;
pub mod http;
pub mod metrics;
pub mod models;
pub mod security;
pub mod services;
pub mod storage;
pub mod telemetry;
pub mod validators;

// Re-export commonly used types
pub use error::{AuthError, Result};
pub use grpc::AuthGrpcServer;
pub use services::{AuthService, AuthServiceConfig, Authenticator};
