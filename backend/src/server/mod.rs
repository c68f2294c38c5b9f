//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::{AppStates, build_states};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use pet_backend::Trace;
#[cfg(debug_assertions)]
use pet_backend::doc::ApiDoc;
use pet_backend::inbound::http::catalog::{list_activities, list_foods, list_pet_types};
use pet_backend::inbound::http::health::{HealthState, live, ready};
use pet_backend::inbound::http::history::{
    pet_activity_log, pet_feeding_log, user_activities_log, user_food_log,
};
use pet_backend::inbound::http::pets::{
    add_pet, decrease_hunger, delete_pet, feed_pet, list_pets, pet_status, play_with_pet,
};
use pet_backend::inbound::ws;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    states: AppStates,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppStates { http, ws: ws_state } = states;

    // `decrease-hunger` is registered before `{pet_id}` routes so the
    // literal segment wins.
    let api = web::scope("/api/v1")
        .service(decrease_hunger)
        .service(feed_pet)
        .service(play_with_pet)
        .service(pet_status)
        .service(add_pet)
        .service(delete_pet)
        .service(list_pets)
        .service(pet_feeding_log)
        .service(pet_activity_log)
        .service(user_food_log)
        .service(user_activities_log)
        .service(list_foods)
        .service(list_activities)
        .service(list_pet_types);

    let app = App::new()
        .app_data(health_state)
        .app_data(http)
        .app_data(ws_state)
        .wrap(Trace)
        .service(api)
        .service(ws::ws_entry)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when state wiring, binding the socket or
/// starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let states = build_states(&config)?;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), states.clone()))
        .bind(config.bind_addr())?
        .run();

    health_state.mark_ready();
    Ok(server)
}
