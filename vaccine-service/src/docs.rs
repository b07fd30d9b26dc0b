use crate::dtos;
use crate::handlers;
use crate::models::DoseStatus;
use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use service_core::error::AppError;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::{Config, SwaggerFile};

pub const DOCS_PATH: &str = "/api-docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs.json";
const DOCS_TITLE: &str = "Vaccine Management API Documentation";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vaccine Management API",
        description = "Vaccine catalogue and dose administration records"
    ),
    paths(
        handlers::system::root,
        handlers::system::health_check,
        handlers::vaccines::list_vaccines,
        handlers::vaccines::get_vaccine,
        handlers::vaccines::create_vaccine,
        handlers::vaccines::update_vaccine,
        handlers::vaccines::delete_vaccine,
        handlers::doses::list_doses,
        handlers::doses::get_dose,
        handlers::doses::record_dose,
        handlers::doses::update_dose,
        handlers::doses::delete_dose,
    ),
    components(
        schemas(
            dtos::Health,
            dtos::Welcome,
            dtos::Endpoints,
            dtos::CreateVaccineRequest,
            dtos::UpdateVaccineRequest,
            dtos::VaccineResponse,
            dtos::CreateDoseRequest,
            dtos::UpdateDoseRequest,
            dtos::DoseResponse,
            DoseStatus,
        )
    ),
    tags(
        (name = "System", description = "Service information and liveness"),
        (name = "Vaccines", description = "Vaccine catalogue"),
        (name = "Doses", description = "Administered and scheduled doses")
    )
)]
pub struct ApiDoc;

/// Swagger UI settings: operation filter on, no top bar.
pub fn swagger_config() -> Config<'static> {
    Config::new([OPENAPI_JSON_PATH])
        .filter(true)
        .use_base_layout()
}

#[derive(Clone)]
struct DocsAssets {
    config: Arc<Config<'static>>,
    openapi: Arc<utoipa::openapi::OpenApi>,
}

/// Swagger UI at [`DOCS_PATH`] (the page itself, no redirect), its assets
/// below it, and the OpenAPI document at [`OPENAPI_JSON_PATH`]. The document
/// is generated once.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let assets = DocsAssets {
        config: Arc::new(swagger_config()),
        openapi: Arc::new(ApiDoc::openapi()),
    };

    Router::new()
        .route(DOCS_PATH, get(swagger_page))
        .route(&format!("{}/*asset", DOCS_PATH), get(swagger_asset))
        .route(OPENAPI_JSON_PATH, get(openapi_json))
        .layer(Extension(assets))
}

async fn swagger_page(Extension(assets): Extension<DocsAssets>) -> Result<Response, AppError> {
    let file = load_asset(&assets, "index.html")?;
    let page = customize_page(&String::from_utf8_lossy(&file.bytes));
    Ok(([(header::CONTENT_TYPE, file.content_type)], page).into_response())
}

async fn swagger_asset(
    Path(asset): Path<String>,
    Extension(assets): Extension<DocsAssets>,
) -> Result<Response, AppError> {
    let file = load_asset(&assets, asset.trim_start_matches('/'))?;
    Ok(([(header::CONTENT_TYPE, file.content_type)], file.bytes.into_owned()).into_response())
}

async fn openapi_json(Extension(assets): Extension<DocsAssets>) -> impl IntoResponse {
    Json(assets.openapi.as_ref().clone())
}

fn load_asset(assets: &DocsAssets, path: &str) -> Result<SwaggerFile<'static>, AppError> {
    utoipa_swagger_ui::serve(path, assets.config.clone())
        .map_err(|e| {
            AppError::InternalError(anyhow::anyhow!(
                "Failed to load Swagger UI asset {}: {}",
                path,
                e
            ))
        })?
        .ok_or(AppError::RouteNotFound)
}

/// Set the page title, and a base href so the relative asset links resolve
/// under [`DOCS_PATH`] when the page is served without a trailing slash.
fn customize_page(html: &str) -> String {
    let mut page = html.to_string();

    if let (Some(start), Some(end)) = (page.find("<title>"), page.find("</title>")) {
        if start < end {
            page.replace_range(start..end + "</title>".len(), "");
        }
    }

    let head = format!(
        "\n    <base href=\"{}/\" />\n    <title>{}</title>",
        DOCS_PATH, DOCS_TITLE
    );
    let at = page.find("<head>").map(|i| i + "<head>".len()).unwrap_or(0);
    page.insert_str(at, &head);
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Vaccine Management API");
        for path in [
            "/",
            "/api/health",
            "/api/vaccines",
            "/api/vaccines/{id}",
            "/api/doses",
            "/api/doses/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn page_gets_title_and_base_href() {
        let page = customize_page(
            "<html>\n  <head>\n    <title>Swagger UI</title>\n  </head>\n</html>",
        );
        assert!(page.contains("<base href=\"/api-docs/\" />"));
        assert!(page.contains("<title>Vaccine Management API Documentation</title>"));
        assert!(!page.contains("Swagger UI"));
        assert_eq!(page.matches("<title>").count(), 1);
    }

    #[test]
    fn swagger_ui_points_at_the_document_with_filter_and_no_top_bar() {
        let config = serde_json::to_value(swagger_config()).unwrap();
        assert_eq!(config["filter"], true);
        assert_eq!(config["layout"], "BaseLayout");
        assert!(config.to_string().contains(OPENAPI_JSON_PATH));
    }
}
