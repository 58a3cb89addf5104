use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Poker Points Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::me,
        crate::routes::auth::update_profile,
        crate::routes::players::list_players,
        crate::routes::players::get_player,
        crate::routes::players::create_player,
        crate::routes::players::update_player,
        crate::routes::players::delete_player,
        crate::routes::templates::list_templates,
        crate::routes::templates::get_template,
        crate::routes::templates::create_template,
        crate::routes::templates::update_template,
        crate::routes::templates::delete_template,
        crate::routes::games::list_games,
        crate::routes::games::get_game,
        crate::routes::games::create_game,
        crate::routes::games::add_player,
        crate::routes::games::set_score,
        crate::routes::games::end_game,
        crate::routes::leaderboard::leaderboard,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::LoginRequest,
            crate::dto::auth::RegisterRequest,
            crate::dto::auth::AuthResponse,
            crate::dto::auth::UpdateProfileRequest,
            crate::dto::player::PlayerDto,
            crate::dto::player::CreatePlayerRequest,
            crate::dto::player::UpdatePlayerRequest,
            crate::dto::template::TemplateDto,
            crate::dto::template::TemplateRequest,
            crate::dto::game::GameDto,
            crate::dto::game::GamePlayerDto,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::AddGamePlayerRequest,
            crate::dto::game::SetScoreRequest,
            crate::dto::leaderboard::LeaderboardEntryDto,
            crate::dao::models::Role,
            crate::dao::models::GameStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login and profile self-service"),
        (name = "players", description = "Player account management"),
        (name = "templates", description = "Scoring template management"),
        (name = "games", description = "Game sessions, rosters and scores"),
        (name = "leaderboard", description = "Public ranked totals"),
    )
)]
pub struct ApiDoc;
