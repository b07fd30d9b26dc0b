use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    #[schema(example = "2025-10-22T08:19:49.171Z")]
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Welcome {
    pub endpoints: Endpoints,
}

/// Mount points of the API, in the order they are listed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct Endpoints {
    #[schema(example = "/api/health")]
    pub health: String,
    #[schema(example = "/api/vaccines")]
    pub vaccines: String,
    #[schema(example = "/api/doses")]
    pub doses: String,
}
