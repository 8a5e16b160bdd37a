use crate::modules::jmap::client::JmapClient;
use crate::modules::jmap::session::JmapSession;
use crate::modules::jmap::transport::JmapTransport;
use crate::modules::settings::cli::SETTINGS;
use crate::utc_now;
use chrono::Local;
use poem::http::HeaderMap;
use poem_openapi::Object;
use serde::Deserialize;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Duration;
use timeago::Formatter;

pub static STARTED_AT: LazyLock<i64> = LazyLock::new(|| utc_now!());

pub fn uptime_ms() -> i64 {
    utc_now!() - *STARTED_AT
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Object)]
pub struct JmapGateStatus {
    /// The service uptime in milliseconds since it started.
    pub uptime_ms: i64,
    /// Human-readable uptime (e.g., "2 hours ago").
    pub timeago: String,
    /// The timezone in which the service is operating.
    pub timezone: String,
    /// The version of jmapgate currently running.
    pub version: String,
    /// JMAP API endpoint batches are sent to.
    pub jmap_api_url: String,
    /// Outcome of a `Core/echo` round trip, present only when a probe was requested.
    pub jmap_reachable: Option<bool>,
    pub jmap_error: Option<String>,
}

impl JmapGateStatus {
    pub fn get() -> Self {
        let uptime_ms = uptime_ms();
        Self {
            uptime_ms,
            timeago: Formatter::new().convert(Duration::from_millis(uptime_ms.max(0) as u64)),
            timezone: Local::now().offset().to_string(),
            version: env!("CARGO_PKG_VERSION").into(),
            jmap_api_url: SETTINGS.jmapgate_jmap_api_url.clone(),
            jmap_reachable: None,
            jmap_error: None,
        }
    }

    /// Adds the result of an echo probe made with the caller's credentials.
    pub async fn probe<T: JmapTransport>(mut self, client: &JmapClient<T>, headers: &HeaderMap) -> Self {
        let result = match JmapSession::resolve(headers) {
            Ok(session) => client.echo(&session).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => self.jmap_reachable = Some(true),
            Err(e) => {
                self.jmap_reachable = Some(false);
                self.jmap_error = Some(e.to_string());
            }
        }
        self
    }
}
