use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, TextEncoder};

/// Outcome label for a finished RPC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    InvalidArgument,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::InvalidArgument => "invalid_argument",
            Outcome::Error => "error",
        }
    }

    pub fn from_code(code: tonic::Code) -> Self {
        match code {
            tonic::Code::Ok => Outcome::Ok,
            tonic::Code::InvalidArgument => Outcome::InvalidArgument,
            _ => Outcome::Error,
        }
    }
}

/// Counter for Auth RPCs, labelled by method and outcome
static GRPC_REQUESTS_TOTAL: Lazy<Option<IntCounterVec>> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("sso_grpc_requests_total", "Total number of Auth RPC requests"),
        &["method", "outcome"],
    )
    .and_then(|c| {
        prometheus::default_registry().register(Box::new(c.clone()))?;
        Ok(c)
    });

    match counter {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::error!("failed to create sso_grpc_requests_total counter: {}", e);
            None
        }
    }
});

/// Record one finished RPC
pub fn record_request(method: &str, outcome: Outcome) {
    if let Some(counter) = GRPC_REQUESTS_TOTAL.as_ref() {
        counter.with_label_values(&[method, outcome.as_str()]).inc();
    }
}

/// Current count for a method and outcome
pub fn request_count(method: &str, outcome: Outcome) -> u64 {
    GRPC_REQUESTS_TOTAL
        .as_ref()
        .map(|counter| counter.with_label_values(&[method, outcome.as_str()]).get())
        .unwrap_or(0)
}

/// Serialise the default registry in Prometheus text format
pub fn gather_text() -> Result<String, prometheus::Error> {
    // Force registration so the family shows up before the first request
    Lazy::force(&GRPC_REQUESTS_TOTAL);

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_code() {
        assert_eq!(Outcome::from_code(tonic::Code::Ok), Outcome::Ok);
        assert_eq!(
            Outcome::from_code(tonic::Code::InvalidArgument),
            Outcome::InvalidArgument
        );
        assert_eq!(Outcome::from_code(tonic::Code::Internal), Outcome::Error);
    }

    #[test]
    fn test_record_request_increments() {
        let before = request_count("metrics_test", Outcome::Ok);
        record_request("metrics_test", Outcome::Ok);
        record_request("metrics_test", Outcome::Ok);
        assert_eq!(request_count("metrics_test", Outcome::Ok), before + 2);
    }

    #[test]
    fn test_gather_text_contains_counter() {
        record_request("metrics_gather_test", Outcome::Error);
        let text = gather_text().unwrap();
        assert!(text.contains("sso_grpc_requests_total"));
        assert!(text.contains("outcome=\"error\""));
    }
}
