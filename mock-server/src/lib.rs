use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

/// Key accepted by `app()`.
pub const API_KEY: &str = "test-api-key";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub contact_id: i64,
    pub face: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCargo {
    pub id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
}

/// Shared server state: the accepted key and every stored proposal.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    api_key: String,
    next_id: AtomicI64,
    proposals: RwLock<HashMap<i64, Value>>,
}

impl AppState {
    pub fn new(api_key: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                api_key: api_key.to_string(),
                next_id: AtomicI64::new(1),
                proposals: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// The JSON body a proposal was created with.
    pub async fn proposal(&self, id: i64) -> Option<Value> {
        self.inner.proposals.read().await.get(&id).cloned()
    }

    pub async fn proposal_count(&self) -> usize {
        self.inner.proposals.read().await.len()
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new(API_KEY))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/v2/proposals/my/add/cargo", post(create_cargo))
        .route("/v2/references/currencies", reference_route(Table::Currencies))
        .route("/v2/references/payment/units", reference_route(Table::PaymentUnits))
        .route("/v2/references/payment/moments", reference_route(Table::PaymentMoments))
        .route("/v2/references/body/types", reference_route(Table::BodyTypes))
        .route("/v2/references/cargo/package", reference_route(Table::PackageTypes))
        .route("/v2/references/payment/types", reference_route(Table::PaymentTypes))
        .route("/v2/references/load/types", reference_route(Table::LoadTypes))
        .route("/v2/references/areas", reference_route(Table::Areas))
        .route("/v2/users/user/contacts", get(contacts))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Rejection in the API's error shape.
#[derive(Debug)]
struct ApiFailure {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        warn!(status = self.status.as_u16(), error = self.error, message = %self.message, "rejecting request");
        let body = ErrorBody {
            status: self.status.as_u16(),
            error: self.error.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Language {
    Ru,
    Uk,
}

#[derive(Debug, Default, Deserialize)]
struct LanguageQuery {
    language: Option<String>,
}

/// Check the `Authorization` key and the `language` query parameter.
fn authorize(state: &AppState, headers: &HeaderMap, query: &LanguageQuery) -> Result<Language, ApiFailure> {
    let key = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    if key != Some(state.inner.api_key.as_str()) {
        return Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "unauthorized", "invalid api key"));
    }
    match query.language.as_deref() {
        Some("uk") => Ok(Language::Uk),
        Some("ru") => Ok(Language::Ru),
        Some(other) => Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            "bad_request",
            format!("unsupported language: {other}"),
        )),
        None => Err(ApiFailure::new(StatusCode::BAD_REQUEST, "bad_request", "language is required")),
    }
}

#[derive(Clone, Copy, Debug)]
enum Table {
    Currencies,
    PaymentUnits,
    PaymentMoments,
    BodyTypes,
    PackageTypes,
    PaymentTypes,
    LoadTypes,
    Areas,
}

impl Table {
    /// `(id, uk, ru)` rows.
    fn rows(self) -> &'static [(i64, &'static str, &'static str)] {
        match self {
            Table::Currencies => &[(1, "EUR", "EUR"), (2, "USD", "USD"), (4, "грн.", "грн.")],
            Table::PaymentUnits => &[(1, "за рейс", "за рейс"), (2, "за км", "за км"), (3, "за тонну", "за тонну")],
            Table::PaymentMoments => &[
                (1, "при завантаженні", "при загрузке"),
                (2, "при розвантаженні", "при выгрузке"),
                (3, "відстрочка", "отсрочка"),
            ],
            Table::BodyTypes => &[
                (34, "Тент", "Тент"),
                (35, "Ізотерм", "Изотерм"),
                (36, "Рефрижератор", "Рефрижератор"),
            ],
            Table::PackageTypes => &[(1, "Палети", "Паллеты"), (2, "Ящики", "Ящики"), (3, "Мішки", "Мешки")],
            Table::PaymentTypes => &[(2, "Готівка", "Наличные"), (4, "Безготівка", "Безнал")],
            Table::LoadTypes => &[(1, "верхнє", "верхняя"), (2, "бічне", "боковая"), (3, "заднє", "задняя")],
            Table::Areas => &[
                (23, "Київська", "Киевская"),
                (24, "Львівська", "Львовская"),
                (25, "Одеська", "Одесская"),
            ],
        }
    }

    fn localized(self, language: Language) -> Vec<Reference> {
        self.rows()
            .iter()
            .map(|&(id, uk, ru)| Reference {
                id,
                name: match language {
                    Language::Uk => uk,
                    Language::Ru => ru,
                }
                .to_string(),
            })
            .collect()
    }
}

fn reference_route(table: Table) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>, headers: HeaderMap, Query(query): Query<LanguageQuery>| async move {
            let language = authorize(&state, &headers, &query)?;
            Ok::<_, ApiFailure>(Json(table.localized(language)))
        },
    )
}

async fn contacts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<Vec<Contact>>, ApiFailure> {
    authorize(&state, &headers, &query)?;
    Ok(Json(vec![
        Contact {
            contact_id: 101,
            face: "Іван Петренко".to_string(),
        },
        Contact {
            contact_id: 102,
            face: "Олена Коваль".to_string(),
        },
    ]))
}

async fn create_cargo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LanguageQuery>,
    body: String,
) -> Result<(StatusCode, Json<CreatedCargo>), ApiFailure> {
    authorize(&state, &headers, &query)?;

    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    if content_type != Some("application/json") {
        return Err(ApiFailure::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            "content type must be application/json",
        ));
    }

    let proposal: Value = serde_json::from_str(&body)
        .map_err(|e| ApiFailure::new(StatusCode::BAD_REQUEST, "bad_request", format!("malformed body: {e}")))?;
    for field in ["waypointListSource", "waypointListTarget"] {
        let present = proposal[field].as_array().is_some_and(|points| !points.is_empty());
        if !present {
            return Err(ApiFailure::new(
                StatusCode::BAD_REQUEST,
                "bad_request",
                format!("{field} is required"),
            ));
        }
    }

    let id = state.inner.next_id.fetch_add(1, Ordering::SeqCst);
    state.inner.proposals.write().await.insert(id, proposal);
    info!(id, "cargo proposal created");
    Ok((StatusCode::CREATED, Json(CreatedCargo { id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, key.parse().unwrap());
        headers
    }

    fn query(language: Option<&str>) -> LanguageQuery {
        LanguageQuery {
            language: language.map(str::to_string),
        }
    }

    #[test]
    fn authorize_accepts_key_and_language() {
        let state = AppState::new("k");
        assert_eq!(authorize(&state, &headers("k"), &query(Some("ru"))).unwrap(), Language::Ru);
        assert_eq!(authorize(&state, &headers("k"), &query(Some("uk"))).unwrap(), Language::Uk);
    }

    #[test]
    fn authorize_rejects_wrong_key() {
        let state = AppState::new("k");
        let err = authorize(&state, &headers("other"), &query(Some("uk"))).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        let err = authorize(&state, &HeaderMap::new(), &query(Some("uk"))).unwrap_err();
        assert_eq!(err.error, "unauthorized");
    }

    #[test]
    fn authorize_requires_known_language() {
        let state = AppState::new("k");
        let err = authorize(&state, &headers("k"), &query(None)).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let err = authorize(&state, &headers("k"), &query(Some("en"))).unwrap_err();
        assert!(err.message.contains("en"));
    }

    #[test]
    fn tables_are_localized() {
        let uk = Table::Areas.localized(Language::Uk);
        let ru = Table::Areas.localized(Language::Ru);
        assert_eq!(uk[0], Reference { id: 23, name: "Київська".to_string() });
        assert_eq!(ru[0], Reference { id: 23, name: "Киевская".to_string() });
        assert_eq!(uk.len(), ru.len());
    }

    #[test]
    fn contact_serializes_face() {
        let json = serde_json::to_value(Contact {
            contact_id: 1,
            face: "Test".to_string(),
        })
        .unwrap();
        assert_eq!(json["contactId"], 1);
        assert_eq!(json["face"], "Test");
    }
}
