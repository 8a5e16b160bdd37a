use crate::modules::context::status::JmapGateStatus;
use crate::modules::jmap::client::JmapClient;
use poem::http::HeaderMap;
use poem::{handler, web::Json, web::Query, IntoResponse};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    /// Also run a `Core/echo` round trip against the JMAP server.
    #[serde(default)]
    pub probe: bool,
}

#[handler]
pub async fn get_status(params: Query<StatusParams>, headers: &HeaderMap) -> impl IntoResponse {
    let status = JmapGateStatus::get();
    if !params.probe {
        return Json(status);
    }
    match JmapClient::global() {
        Ok(client) => Json(status.probe(client, headers).await),
        Err(e) => Json(JmapGateStatus {
            jmap_reachable: Some(false),
            jmap_error: Some(e.to_string()),
            ..status
        }),
    }
}
