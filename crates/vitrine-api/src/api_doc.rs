//! OpenAPI documentation served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::models;
use crate::error;
use crate::handlers;
use vitrine_core::models as core_models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vitrine API",
        version = "0.1.0",
        description = "Personal media library: upload images and videos, order them, and publish them in a public gallery. Versioned endpoints live under /api/v1/."
    ),
    paths(
        // Auth
        handlers::auth::login,
        handlers::auth::me,
        // Gallery
        handlers::gallery::list_gallery,
        handlers::files::serve_file,
        // Media
        handlers::media_upload::upload_media,
        handlers::media_get::list_media,
        handlers::media_get::get_media,
        handlers::media_update::update_media,
        handlers::media_replace::replace_media,
        handlers::media_delete::delete_media,
        handlers::media_sort::sort_media,
    ),
    components(
        schemas(
            core_models::MediaRecord,
            core_models::MediaKind,
            core_models::OrderKey,
            core_models::PageResult,
            models::LoginRequest,
            models::LoginResponse,
            models::UserResponse,
            handlers::media_get::ListMediaQuery,
            handlers::media_update::UpdateMediaRequest,
            handlers::media_sort::SortMediaRequest,
            handlers::responses::MediaEnvelope,
            handlers::responses::MessageResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Login and current user"),
        (name = "media", description = "Owner-scoped upload, listing, ordering, replacement and deletion"),
        (name = "gallery", description = "Public, read-only listing and file serving")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_versioned_paths() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/v1/media/upload"));
        assert!(spec.paths.paths.contains_key("/api/v1/media/{id}/replace"));
        assert!(spec.paths.paths.contains_key("/api/v1/gallery"));
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
