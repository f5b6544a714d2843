use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, LiteralQuery};
use crate::features::bots::dtos::{
    GetBotResponseDto, ListBotsResponseDto, RegisterBotDto, RegisterBotResponseDto,
    RegistrationInfoDto, REQUIRED_REGISTRATION_FIELDS,
};
use crate::features::bots::services::BotService;
use crate::shared::types::{ErrorResponse, MessageResponse};

async fn register(
    service: &BotService,
    dto: RegisterBotDto,
) -> Result<Json<RegisterBotResponseDto>> {
    let bot = service.register(dto).await?;

    Ok(Json(RegisterBotResponseDto {
        message: "Bot registered successfully".to_string(),
        bot_id: bot.id,
    }))
}

/// Register a new bot
#[utoipa::path(
    post,
    path = "/api/register-bot",
    request_body = RegisterBotDto,
    responses(
        (status = 200, description = "Bot registered", body = RegisterBotResponseDto),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "bots"
)]
pub async fn register_bot(
    State(service): State<Arc<BotService>>,
    AppJson(dto): AppJson<RegisterBotDto>,
) -> Result<Json<RegisterBotResponseDto>> {
    register(&service, dto).await
}

/// Describe the registration endpoint, or register through the query string
///
/// Without any of `ownerName`, `ownerNumber`, `botName`, `botType` this
/// returns the list of required fields. With at least one of them present
/// it behaves exactly like `POST /api/register-bot`.
#[utoipa::path(
    get,
    path = "/api/register-bot",
    params(
        ("ownerName" = Option<String>, Query, description = "Owner name"),
        ("ownerNumber" = Option<String>, Query, description = "Owner number"),
        ("botName" = Option<String>, Query, description = "Bot name"),
        ("botType" = Option<String>, Query, description = "Bot type")
    ),
    responses(
        (status = 200, description = "Endpoint description or registration result", body = RegistrationInfoDto),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "bots"
)]
pub async fn register_bot_via_query(
    State(service): State<Arc<BotService>>,
    query: LiteralQuery,
) -> Result<Response> {
    let dto = RegisterBotDto {
        owner_name: query.get("ownerName").map(str::to_string),
        owner_number: query.get("ownerNumber").map(str::to_string),
        bot_name: query.get("botName").map(str::to_string),
        bot_type: query.get("botType").map(str::to_string),
    };

    if !dto.has_any_field() {
        return Ok(Json(RegistrationInfoDto {
            message: "Submit ownerName, ownerNumber, botName and botType to register a bot"
                .to_string(),
            required_fields: REQUIRED_REGISTRATION_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        })
        .into_response());
    }

    Ok(register(&service, dto).await?.into_response())
}

/// Find the first bot registered for an owner name and number
#[utoipa::path(
    get,
    path = "/api/get-bot",
    params(
        ("name" = String, Query, description = "Owner name (exact, case-sensitive)"),
        ("number" = String, Query, description = "Owner number (exact); `+` is kept literally")
    ),
    responses(
        (status = 200, description = "Bot found", body = GetBotResponseDto),
        (status = 400, description = "Missing required query parameters", body = ErrorResponse),
        (status = 404, description = "Bot not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "bots"
)]
pub async fn get_bot(
    State(service): State<Arc<BotService>>,
    query: LiteralQuery,
) -> Result<Json<GetBotResponseDto>> {
    let name = query.get("name").unwrap_or_default();
    let number = query.get("number").unwrap_or_default();

    let bot = service.lookup(name, number).await?;

    Ok(Json(GetBotResponseDto {
        message: "Bot found".to_string(),
        bot,
    }))
}

/// List every registered bot
#[utoipa::path(
    get,
    path = "/api/list-bots",
    responses(
        (status = 200, description = "All bots", body = ListBotsResponseDto),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "bots"
)]
pub async fn list_bots(
    State(service): State<Arc<BotService>>,
) -> Result<Json<ListBotsResponseDto>> {
    let bots = service.list_all().await?;
    Ok(Json(ListBotsResponseDto { bots }))
}

/// Delete a bot by id
#[utoipa::path(
    delete,
    path = "/api/delete-bot/{id}",
    params(
        ("id" = String, Path, description = "Bot id")
    ),
    responses(
        (status = 200, description = "Bot deleted", body = MessageResponse),
        (status = 404, description = "Bot not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    ),
    tag = "bots"
)]
pub async fn delete_bot(
    State(service): State<Arc<BotService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    service.delete_by_id(&id).await?;
    Ok(Json(MessageResponse::new("Bot deleted successfully")))
}
