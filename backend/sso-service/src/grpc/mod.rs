/// gRPC server module for sso-service
///
/// Exports:
/// - AuthGrpcServer: Auth RPC implementation over an `Authenticator`
/// - proto: Generated protobuf types from auth_service.proto
/// - correlation_interceptor: request id propagation
pub mod interceptor;
pub mod server;

pub use interceptor::{correlation_interceptor, CorrelationId, CORRELATION_HEADER};
pub use server::proto;
pub use server::AuthGrpcServer;
