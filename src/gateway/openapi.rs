//! OpenAPI Documentation
//!
//! The generated document is served as JSON at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    CreateTransferRequest, ErrorBody, TransferEnvelope, TransferListResponse,
};
use crate::transfer::{Transfer, TransferStatus};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pointflow Transfer API",
        version = "1.0.0",
        description = "Two-party member point transfers with server-minted idempotency keys and an auditable lifecycle.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::create_transfer,
        crate::gateway::handlers::get_transfer,
        crate::gateway::handlers::list_transfers,
    ),
    components(
        schemas(
            Transfer,
            TransferStatus,
            CreateTransferRequest,
            TransferEnvelope,
            TransferListResponse,
            ErrorBody,
            HealthResponse,
        )
    ),
    tags(
        (name = "Transfers", description = "Create and query point transfers"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
