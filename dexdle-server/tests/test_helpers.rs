#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use dexdle_core::parse_day;
use dexdle_persistence::{DatabaseStore, connection::connect_to_memory_database};
use dexdle_server::auth::AuthService;
use dexdle_server::config::PersistencePolicy;
use dexdle_server::create_routes;
use dexdle_server::daily_game::DailyGameService;
use dexdle_server::pokedex::StaticPokedex;
use dexdle_types::User;
use migration::{Migrator, MigratorTrait};
use uuid::Uuid;

pub const TODAY: &str = "2024-03-01";
pub const ANSWER: &str = "pikachu";

pub fn today() -> NaiveDate {
    parse_day(TODAY).unwrap()
}

/// Creates a test user with given name
pub fn create_test_user(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        display_name: name.to_string(),
        email: format!("{}@test.com", name.to_lowercase()),
    }
}

/// Dev-mode bearer token for a user
pub fn bearer(user: &User) -> String {
    format!("Bearer {}:{}:{}", user.id, user.email, user.display_name)
}

pub async fn create_test_store() -> Arc<DatabaseStore> {
    let db = connect_to_memory_database().await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(DatabaseStore::new(db))
}

/// Schedule `answers` on consecutive days starting at `first_day`
pub async fn seed_puzzles(store: &DatabaseStore, first_day: &str, answers: &[&str]) {
    store
        .puzzles()
        .seed_puzzles(parse_day(first_day).unwrap(), answers)
        .await
        .unwrap();
}

/// Test setup that provides all necessary components, with today's puzzle
/// already scheduled
pub struct TestServerSetup {
    pub store: Arc<DatabaseStore>,
    pub game_service: Arc<DailyGameService>,
    pub auth_service: Arc<AuthService>,
}

impl TestServerSetup {
    pub async fn new() -> Self {
        Self::with_policy(PersistencePolicy::BestEffort).await
    }

    pub async fn with_policy(policy: PersistencePolicy) -> Self {
        let store = create_test_store().await;
        seed_puzzles(&store, TODAY, &[ANSWER]).await;
        Self::from_store(store, policy)
    }

    pub fn from_store(store: Arc<DatabaseStore>, policy: PersistencePolicy) -> Self {
        let game_service = DailyGameService::new(
            store.clone(),
            Arc::new(StaticPokedex::kanto_starters()),
            policy,
        )
        .with_fixed_date(today());

        Self {
            store,
            game_service: Arc::new(game_service),
            auth_service: Arc::new(AuthService::new_dev_mode()),
        }
    }

    pub fn routes(
        &self,
    ) -> impl warp::Filter<Extract = impl warp::Reply + use<>, Error = warp::Rejection> + Clone + use<> {
        create_routes(
            self.game_service.clone(),
            self.store.clone(),
            self.auth_service.clone(),
        )
    }
}

/// Pull the `name=value` pair out of a response's Set-Cookie header
pub fn cookie_from(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Option<String> {
    response
        .headers()
        .get("set-cookie")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}
