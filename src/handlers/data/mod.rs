// handlers/data/mod.rs - Resource handler module
//
// Every resource gets the same five routes:
//   GET    /api/<table>       list (filtered by parent id)
//   POST   /api/<table>       create
//   GET    /api/<table>/:id   read one
//   PATCH  /api/<table>/:id   partial update
//   DELETE /api/<table>/:id   remove
// Notifications also accept PATCH /api/notifications/:id/read.

pub mod create;
pub mod list;
pub mod record;

use axum::{
    extract::State,
    routing::{get, patch},
    Router,
};
use uuid::Uuid;

use crate::handlers::extract::{ApiPath, ApiQuery, PatchBody};
use crate::AppState;

use create::{
    CreateAttachment, CreateBoard, CreateBody, CreateComment, CreateList, CreateNotification, CreateTask,
    CreateWorkspace,
};
use list::ListParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(resource_routes::<CreateWorkspace>())
        .merge(resource_routes::<CreateBoard>())
        .merge(resource_routes::<CreateList>())
        .merge(resource_routes::<CreateTask>())
        .merge(resource_routes::<CreateComment>())
        .merge(resource_routes::<CreateAttachment>())
        .merge(resource_routes::<CreateNotification>())
        .route("/api/notifications/:id/read", patch(record::notification_read_patch))
}

fn resource_routes<B: CreateBody>() -> Router<AppState> {
    let resource = B::RESOURCE;
    let collection = format!("/api/{}", resource.table());
    let member = format!("{}/:id", collection);

    Router::new()
        .route(
            &collection,
            get(move |state: State<AppState>, query: ApiQuery<ListParams>| list::list_get(state, query, resource))
                .post(create::create_post::<B>),
        )
        .route(
            &member,
            get(move |state: State<AppState>, id: ApiPath<Uuid>| record::record_get(state, id, resource))
                .patch(move |state: State<AppState>, id: ApiPath<Uuid>, body: PatchBody| {
                    record::record_patch(state, id, body, resource)
                })
                .delete(move |state: State<AppState>, id: ApiPath<Uuid>| record::record_delete(state, id, resource)),
        )
}
