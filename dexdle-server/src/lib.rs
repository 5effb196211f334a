use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use crate::auth::AuthService;
use crate::daily_game::DailyGameService;
use crate::local_history::{HISTORY_COOKIE, LocalHistory};
use dexdle_persistence::DatabaseStore;
use dexdle_types::{ErrorResponse, GameError, GuessRequest, User};

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    limit: Option<usize>,
}

pub mod auth;
pub mod config;
pub mod daily_game;
pub mod local_history;
pub mod pokedex;

pub fn create_routes(
    game_service: Arc<DailyGameService>,
    store: Arc<DatabaseStore>,
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let game_service_filter = warp::any().map({
        let game_service = game_service.clone();
        move || game_service.clone()
    });

    let store_filter = warp::any().map({
        let store = store.clone();
        move || store.clone()
    });

    let auth_filter = warp::any().map({
        let auth_service = auth_service.clone();
        move || auth_service.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Today's board, from the store for signed-in players or the history cookie
    let today = warp::path!("api" / "today")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::cookie::optional::<String>(HISTORY_COOKIE))
        .and(game_service_filter.clone())
        .and(store_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_today_request);

    let guess = warp::path!("api" / "today" / "guess")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::cookie::optional::<String>(HISTORY_COOKIE))
        .and(warp::body::content_length_limit(1024))
        .and(warp::body::json::<GuessRequest>())
        .and(game_service_filter.clone())
        .and(store_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_guess_request);

    let stats = warp::path!("api" / "stats")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::cookie::optional::<String>(HISTORY_COOKIE))
        .and(game_service_filter.clone())
        .and(store_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_stats_request);

    let profile = warp::path!("api" / "profile")
        .and(warp::get())
        .and(warp::header::optional::<String>("authorization"))
        .and(store_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_profile_request);

    let search = warp::path!("api" / "pokemon" / "search")
        .and(warp::get())
        .and(warp::query::<SearchQuery>())
        .and(game_service_filter.clone())
        .and_then(handle_search_request);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(today)
        .or(guess)
        .or(stats)
        .or(profile)
        .or(search)
        .with(cors)
        .with(warp::log("pokedexdle"))
}

fn status_for(error: &GameError) -> StatusCode {
    match error {
        GameError::PuzzleUnavailable { .. } => StatusCode::NOT_FOUND,
        GameError::AuthenticationRequired | GameError::InvalidToken => StatusCode::UNAUTHORIZED,
        GameError::MetadataUnavailable | GameError::PersistenceFailure { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        GameError::InvalidGuess { .. } => StatusCode::BAD_REQUEST,
        GameError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn json_response<T: Serialize>(body: &T) -> Response {
    warp::reply::with_status(warp::reply::json(body), StatusCode::OK).into_response()
}

fn error_response(error: GameError) -> Response {
    let status = status_for(&error);
    warp::reply::with_status(warp::reply::json(&ErrorResponse::from(error)), status)
        .into_response()
}

/// Resolve the caller. A valid token also refreshes their profile row; a
/// profile write failure is logged and otherwise ignored.
async fn identify(
    auth_header: Option<String>,
    auth_service: &AuthService,
    store: &DatabaseStore,
) -> Result<Option<User>, GameError> {
    let user = auth_service
        .identify(auth_header.as_deref())
        .map_err(|e| {
            tracing::warn!("Rejecting request with bad credentials: {}", e);
            GameError::InvalidToken
        })?;

    if let Some(user) = &user {
        if let Err(e) = store.upsert_profile(user).await {
            tracing::warn!("Failed to refresh profile for {}: {}", user.id, e);
        }
    }

    Ok(user)
}

async fn handle_today_request(
    auth_header: Option<String>,
    history_cookie: Option<String>,
    game_service: Arc<DailyGameService>,
    store: Arc<DatabaseStore>,
    auth_service: Arc<AuthService>,
) -> Result<Response, warp::Rejection> {
    let user = match identify(auth_header, &auth_service, &store).await {
        Ok(user) => user,
        Err(e) => return Ok(error_response(e)),
    };
    let history = LocalHistory::from_cookie(history_cookie.as_deref());

    match game_service.today_view(user.as_ref(), &history).await {
        Ok(view) => Ok(json_response(&view)),
        Err(e) => Ok(error_response(e)),
    }
}

async fn handle_guess_request(
    auth_header: Option<String>,
    history_cookie: Option<String>,
    request: GuessRequest,
    game_service: Arc<DailyGameService>,
    store: Arc<DatabaseStore>,
    auth_service: Arc<AuthService>,
) -> Result<Response, warp::Rejection> {
    let user = match identify(auth_header, &auth_service, &store).await {
        Ok(user) => user,
        Err(e) => return Ok(error_response(e)),
    };
    let mut history = LocalHistory::from_cookie(history_cookie.as_deref());

    match game_service
        .submit_guess(user.as_ref(), &mut history, &request.guess)
        .await
    {
        Ok(response) if user.is_none() => Ok(warp::reply::with_header(
            json_response(&response),
            "set-cookie",
            history.set_cookie_header(),
        )
        .into_response()),
        Ok(response) => Ok(json_response(&response)),
        Err(e) => Ok(error_response(e)),
    }
}

async fn handle_stats_request(
    auth_header: Option<String>,
    history_cookie: Option<String>,
    game_service: Arc<DailyGameService>,
    store: Arc<DatabaseStore>,
    auth_service: Arc<AuthService>,
) -> Result<Response, warp::Rejection> {
    let user = match identify(auth_header, &auth_service, &store).await {
        Ok(user) => user,
        Err(e) => return Ok(error_response(e)),
    };
    let history = LocalHistory::from_cookie(history_cookie.as_deref());

    match game_service.stats(user.as_ref(), &history).await {
        Ok(stats) => Ok(json_response(&stats)),
        Err(e) => Ok(error_response(e)),
    }
}

async fn handle_profile_request(
    auth_header: Option<String>,
    store: Arc<DatabaseStore>,
    auth_service: Arc<AuthService>,
) -> Result<Response, warp::Rejection> {
    let user = match identify(auth_header, &auth_service, &store).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(error_response(GameError::AuthenticationRequired)),
        Err(e) => return Ok(error_response(e)),
    };

    match store.find_profile(user.id).await {
        Ok(Some(profile)) => Ok(json_response(&profile)),
        // The upsert in `identify` failed; fall back to what the token says
        Ok(None) => Ok(json_response(&dexdle_types::Profile {
            id: user.id,
            display_name: user.display_name,
            created_at: String::new(),
            updated_at: String::new(),
        })),
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user.id, e);
            Ok(error_response(GameError::Internal {
                message: "failed to fetch profile".to_string(),
            }))
        }
    }
}

async fn handle_search_request(
    query: SearchQuery,
    game_service: Arc<DailyGameService>,
) -> Result<Response, warp::Rejection> {
    let q = query.q.unwrap_or_default();
    match game_service.search(&q, query.limit).await {
        Ok(matches) => Ok(json_response(&matches)),
        Err(e) => Ok(error_response(e)),
    }
}
