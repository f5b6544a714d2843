use utoipa::{Modify, OpenApi};

use crate::features::bots::{dtos as bots_dtos, handlers as bots_handlers, models as bots_models};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Bots
        bots_handlers::register_bot,
        bots_handlers::register_bot_via_query,
        bots_handlers::get_bot,
        bots_handlers::list_bots,
        bots_handlers::delete_bot,
        // Files
        files_handlers::upload_file,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Bots
            bots_models::BotRecord,
            bots_dtos::RegisterBotDto,
            bots_dtos::RegisterBotResponseDto,
            bots_dtos::RegistrationInfoDto,
            bots_dtos::GetBotResponseDto,
            bots_dtos::ListBotsResponseDto,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::UploadFileResponseDto,
        )
    ),
    tags(
        (name = "bots", description = "Bot registration and lookup"),
        (name = "files", description = "File upload"),
    ),
    info(
        title = "Bot Registry API",
        version = "0.1.0",
        description = "API documentation for the bot registry",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
