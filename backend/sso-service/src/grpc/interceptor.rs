use tonic::{metadata::MetadataValue, Request, Status};
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Request id carried in request extensions for the handler span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reuse the caller's `x-correlation-id` or mint a UUID v4 when absent.
pub fn correlation_interceptor(mut req: Request<()>) -> Result<Request<()>, Status> {
    let existing = req
        .metadata()
        .get(CORRELATION_HEADER)
        .and_then(|val| val.to_str().ok())
        .filter(|val| !val.is_empty())
        .map(str::to_string);

    let correlation_id = match existing {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            let value = MetadataValue::try_from(id.as_str())
                .map_err(|_| Status::internal("failed to set correlation id"))?;
            req.metadata_mut().insert(CORRELATION_HEADER, value);
            id
        }
    };

    req.extensions_mut().insert(CorrelationId(correlation_id));
    Ok(req)
}
