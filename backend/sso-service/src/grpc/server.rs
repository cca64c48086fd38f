/// gRPC server implementation for sso-service
///
/// Implements the RPCs from auth_service.proto:
/// - Register: create an account
/// - Login: verify credentials and issue a token for an application
/// - IsAdmin: admin flag lookup
///
/// Each handler validates the request first; only well-formed requests reach
/// the auth service.
use super::interceptor::CorrelationId;
use crate::metrics::{self, Outcome};
use crate::services::Authenticator;
use crate::validators::{validate_is_admin, validate_login, validate_register};
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::{info_span, Instrument};

// Import generated protobuf types
pub mod proto {
    tonic::include_proto!("sso.auth.v1");
}

use proto::auth_server::Auth;
use proto::*;

/// Auth gRPC server
#[derive(Clone)]
pub struct AuthGrpcServer {
    auth: Arc<dyn Authenticator>,
}

impl AuthGrpcServer {
    pub fn new(auth: Arc<dyn Authenticator>) -> Self {
        Self { auth }
    }
}

fn correlation_id<T>(request: &Request<T>) -> String {
    request
        .extensions()
        .get::<CorrelationId>()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default()
}

/// Count the outcome and pass the result through
fn finish<T>(method: &str, result: Result<Response<T>, Status>) -> Result<Response<T>, Status> {
    let outcome = match &result {
        Ok(_) => Outcome::Ok,
        Err(status) => Outcome::from_code(status.code()),
    };
    metrics::record_request(method, outcome);
    result
}

#[tonic::async_trait]
impl Auth for AuthGrpcServer {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> std::result::Result<Response<RegisterResponse>, Status> {
        let span = info_span!("grpc.register", correlation_id = %correlation_id(&request));
        let req = request.into_inner();

        let result = async {
            validate_register(&req.email, &req.password)?;

            let user_id = self.auth.register_new_user(&req.email, &req.password).await?;

            Ok::<_, Status>(Response::new(RegisterResponse { user_id }))
        }
        .instrument(span)
        .await;

        finish("register", result)
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> std::result::Result<Response<LoginResponse>, Status> {
        let span = info_span!("grpc.login", correlation_id = %correlation_id(&request));
        let req = request.into_inner();

        let result = async {
            validate_login(&req.email, &req.password, req.app_id)?;

            let token = self
                .auth
                .login(&req.email, &req.password, req.app_id)
                .await?;

            Ok::<_, Status>(Response::new(LoginResponse { token }))
        }
        .instrument(span)
        .await;

        finish("login", result)
    }

    async fn is_admin(
        &self,
        request: Request<IsAdminRequest>,
    ) -> std::result::Result<Response<IsAdminResponse>, Status> {
        let span = info_span!("grpc.is_admin", correlation_id = %correlation_id(&request));
        let req = request.into_inner();

        let result = async {
            validate_is_admin(req.user_id)?;

            let is_admin = self.auth.is_admin(req.user_id).await?;

            Ok::<_, Status>(Response::new(IsAdminResponse { is_admin }))
        }
        .instrument(span)
        .await;

        finish("is_admin", result)
    }
}
