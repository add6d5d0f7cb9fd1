//! The routing table.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, bookings, health, properties, purchases, reviews, users};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let image_dir = state.images.root().to_path_buf();

    let auth = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/details", put(auth::update_details))
        .route("/password", put(auth::update_password));

    let users = Router::new()
        .route("/", get(users::list))
        .route("/profile", get(users::profile))
        .route(
            "/profile/avatar",
            post(users::attach_avatar)
                .delete(users::detach_avatar)
                .layer(DefaultBodyLimit::max(state.max_image_bytes)),
        )
        .route(
            "/:id",
            get(users::get).put(users::update).delete(users::delete),
        );

    let properties = Router::new()
        .route("/", get(properties::list).post(properties::create))
        .route("/mine", get(properties::mine))
        .route(
            "/:id",
            get(properties::get)
                .put(properties::update)
                .delete(properties::delete),
        )
        .route(
            "/:id/images",
            post(properties::attach_image)
                .layer(DefaultBodyLimit::max(state.max_image_bytes)),
        )
        .route("/:id/images/:handle", delete(properties::detach_image))
        .route(
            "/:id/reviews",
            get(properties::reviews).post(properties::add_review),
        )
        .route("/:id/bookings", get(properties::bookings));

    let bookings = Router::new()
        .route("/", get(bookings::list_all).post(bookings::create))
        .route("/mine", get(bookings::mine))
        .route("/:id", get(bookings::get).delete(bookings::delete))
        .route("/:id/status", put(bookings::update_status))
        .route("/:id/cancel", put(bookings::cancel));

    let reviews = Router::new()
        .route("/mine", get(reviews::mine))
        .route("/user/:user_id", get(reviews::by_user))
        .route(
            "/:id",
            get(reviews::get).put(reviews::update).delete(reviews::delete),
        );

    let purchases = Router::new()
        .route("/", post(purchases::create))
        .route("/mine", get(purchases::mine))
        .route("/:id", delete(purchases::cancel));

    let api = Router::new()
        .nest("/auth", auth)
        .nest("/users", users)
        .nest("/properties", properties)
        .nest("/bookings", bookings)
        .nest("/reviews", reviews)
        .nest("/purchases", purchases);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .nest_service("/images", ServeDir::new(image_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
