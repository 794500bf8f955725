use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;

use crate::app::AppState;
use crate::session::SubscriberSession;

/// `/faces`: every connection receives each face detection result published
/// while it is open.
pub async fn faces_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |mut socket| async move {
        let mut session = SubscriberSession::new(state.registry.clone());
        session.run(&mut socket).await;
    })
}
