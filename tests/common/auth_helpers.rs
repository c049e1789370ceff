//! Authentication test helpers
//!
//! Provides utilities for creating test users and generating tokens.

use tapspot::backend::auth::sessions::create_token;
use tapspot::backend::auth::users::create_user;
use tapspot::backend::server::AppState;
use tapspot::shared::messaging::UserId;

pub const TEST_PASSWORD: &str = "password123";

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Create a test user directly in the database and sign a token for it
pub async fn create_test_user(state: &AppState, username: &str, nickname: &str) -> TestUser {
    let password_hash =
        bcrypt::hash(TEST_PASSWORD, state.config.auth.bcrypt_cost).expect("Failed to hash password");

    let user = create_user(&state.db, username, nickname, &password_hash)
        .await
        .expect("Failed to create test user");

    let token = generate_test_token(state, user.id, &user.username);

    TestUser {
        id: user.id,
        username: user.username,
        password: TEST_PASSWORD.to_string(),
        token,
    }
}

/// Generate a test JWT token signed with the app's secret
pub fn generate_test_token(state: &AppState, user_id: UserId, username: &str) -> String {
    create_token(
        user_id,
        username,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_days,
    )
    .expect("Failed to generate test token")
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
