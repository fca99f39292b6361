mod user;

use axum::{Router, routing::get};
use sqlx::SqlitePool;

pub fn router() -> Router<SqlitePool> {
    Router::new()
        .route("/user", get(user::list_users).post(user::create_user))
        .route(
            "/user/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
}

/// The complete user service over `db_pool`.
pub fn service(db_pool: SqlitePool) -> Router {
    crate::finish(router().with_state(db_pool))
}
