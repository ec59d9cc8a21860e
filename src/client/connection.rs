//! Connection-failure classification and the redirect to the
//! connection-error page.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::form_urlencoded;

pub const CONNECTION_ERROR_PATH: &str = "/connection-error";
pub const FALLBACK_RETURN_PATH: &str = "/courses";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionErrorReason {
    /// The API host could not be reached at all.
    Offline,
    /// 5xx, or a transport failure after the connection was made.
    Server,
    #[default]
    Unknown,
}

impl ConnectionErrorReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionErrorReason::Offline => "offline",
            ConnectionErrorReason::Server => "server",
            ConnectionErrorReason::Unknown => "unknown",
        }
    }

    /// Unrecognised values read as `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "offline" => ConnectionErrorReason::Offline,
            "server" => ConnectionErrorReason::Server,
            _ => ConnectionErrorReason::Unknown,
        }
    }

    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_connect() {
            ConnectionErrorReason::Offline
        } else {
            ConnectionErrorReason::Server
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ConnectionErrorReason::Offline => "Немає з'єднання з мережею",
            ConnectionErrorReason::Server => "Сервер тимчасово недоступний",
            ConnectionErrorReason::Unknown => "Не вдалося під'єднатися",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ConnectionErrorReason::Offline => {
                "Перевірте підключення до інтернету та спробуйте ще раз."
            }
            ConnectionErrorReason::Server => {
                "Ми вже працюємо над проблемою. Спробуйте оновити сторінку за кілька хвилин."
            }
            ConnectionErrorReason::Unknown => "Сталася непередбачена помилка з'єднання.",
        }
    }
}

impl fmt::Display for ConnectionErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local absolute path to return to; anything else (other hosts,
/// protocol-relative URLs, the error page itself) becomes the course list.
pub fn sanitize_return_path(from: Option<&str>) -> String {
    match from.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.starts_with(CONNECTION_ERROR_PATH) =>
        {
            path.to_string()
        }
        _ => FALLBACK_RETURN_PATH.to_string(),
    }
}

pub fn connection_error_location(reason: ConnectionErrorReason, from: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("reason", reason.as_str())
        .append_pair("from", &sanitize_return_path(Some(from)))
        .finish();
    format!("{}?{}", CONNECTION_ERROR_PATH, query)
}

/// Guards the connection-error redirect: once one is issued, further
/// failures do not redirect again until `reset` is called.
#[derive(Debug, Default)]
pub struct ConnectionMonitor {
    redirecting: AtomicBool,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location to redirect to, or `None` if a redirect is already out.
    pub fn begin_redirect(&self, reason: ConnectionErrorReason, from: &str) -> Option<String> {
        if self
            .redirecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("connection-error redirect already in progress");
            return None;
        }
        warn!("connection failure ({}), redirecting from {}", reason, from);
        Some(connection_error_location(reason, from))
    }

    pub fn is_redirecting(&self) -> bool {
        self.redirecting.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.redirecting.store(false, Ordering::SeqCst);
    }
}
