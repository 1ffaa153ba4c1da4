//! Typed client for the Lardi-Trans v2 API.
//!
//! # Design
//! `LardiClient` holds only its `Config` and a transport and carries no
//! mutable state between calls. Each operation is a thin wrapper over one
//! pipeline: build an `HttpRequest` (`build_get` / `build_create_cargo`),
//! send it through the transport under the caller's `Context`, and turn the
//! `HttpResponse` into a typed value or an error (`parse_response`). The
//! build and parse halves do no I/O and are public so they can be tested
//! and driven independently.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::context::Context;
use crate::error::{ApiError, Error, ErrorKind};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{find_by_name, CargoRequest, CargoResponse, Contact, Reference};

/// The API operations this client knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CreateCargo,
    Currencies,
    PaymentUnits,
    PaymentMoments,
    BodyTypes,
    PackageTypes,
    PaymentTypes,
    LoadTypes,
    Areas,
    Contacts,
}

impl Endpoint {
    pub const ALL: [Endpoint; 10] = [
        Endpoint::CreateCargo,
        Endpoint::Currencies,
        Endpoint::PaymentUnits,
        Endpoint::PaymentMoments,
        Endpoint::BodyTypes,
        Endpoint::PackageTypes,
        Endpoint::PaymentTypes,
        Endpoint::LoadTypes,
        Endpoint::Areas,
        Endpoint::Contacts,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::CreateCargo => "/v2/proposals/my/add/cargo",
            Endpoint::Currencies => "/v2/references/currencies",
            Endpoint::PaymentUnits => "/v2/references/payment/units",
            Endpoint::PaymentMoments => "/v2/references/payment/moments",
            Endpoint::BodyTypes => "/v2/references/body/types",
            Endpoint::PackageTypes => "/v2/references/cargo/package",
            Endpoint::PaymentTypes => "/v2/references/payment/types",
            Endpoint::LoadTypes => "/v2/references/load/types",
            Endpoint::Areas => "/v2/references/areas",
            Endpoint::Contacts => "/v2/users/user/contacts",
        }
    }

    pub const fn method(self) -> HttpMethod {
        match self {
            Endpoint::CreateCargo => HttpMethod::Post,
            _ => HttpMethod::Get,
        }
    }

    /// Phrase used as the prefix of this operation's errors.
    pub const fn operation(self) -> &'static str {
        match self {
            Endpoint::CreateCargo => "create cargo request",
            Endpoint::Currencies => "get currencies",
            Endpoint::PaymentUnits => "get units",
            Endpoint::PaymentMoments => "get payment moments",
            Endpoint::BodyTypes => "get body types",
            Endpoint::PackageTypes => "get package types",
            Endpoint::PaymentTypes => "get payment types",
            Endpoint::LoadTypes => "get load types",
            Endpoint::Areas => "get areas",
            Endpoint::Contacts => "get contacts",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

/// Client for the Lardi-Trans API.
///
/// Cheap to share: wrap it in an `Arc` or clone it (when the transport is
/// `Clone`) and call it from as many tasks as needed.
#[derive(Debug, Clone)]
pub struct LardiClient<T = ReqwestTransport> {
    config: Config,
    transport: T,
}

impl LardiClient<ReqwestTransport> {
    /// Build a client on the default `reqwest` transport. Empty or zero
    /// config values are replaced with the defaults.
    pub fn new(config: Config) -> Self {
        let config = config.with_defaults();
        let transport = ReqwestTransport::new(config.timeout);
        Self { config, transport }
    }
}

impl<T: Transport> LardiClient<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            config: config.with_defaults(),
            transport,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_get(&self, endpoint: Endpoint) -> HttpRequest {
        self.request(endpoint, None)
    }

    /// Validate and encode a cargo proposal. Fails before any I/O when a
    /// waypoint list is empty.
    pub fn build_create_cargo(&self, cargo: &CargoRequest) -> Result<HttpRequest, Error> {
        let endpoint = Endpoint::CreateCargo;
        cargo.validate().map_err(|e| Error::new(endpoint, e))?;
        self.build_post(endpoint, cargo)
    }

    fn build_post<B: Serialize + ?Sized>(&self, endpoint: Endpoint, body: &B) -> Result<HttpRequest, Error> {
        let body = serde_json::to_string(body).map_err(|e| Error::new(endpoint, ErrorKind::Serialization(e)))?;
        Ok(self.request(endpoint, Some(body)))
    }

    fn request(&self, endpoint: Endpoint, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method: endpoint.method(),
            url: format!("{}{}", self.config.base_url, endpoint.path()),
            query: vec![("language".to_string(), self.config.language.as_str().to_string())],
            headers: vec![
                ("Authorization".to_string(), self.config.api_key.clone()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }

    /// Turn a response into the endpoint's result type, or into an
    /// `ApiError` when the status is outside 2xx. A `null` body decodes as
    /// `R::default()`.
    pub fn parse_response<R>(&self, endpoint: Endpoint, response: HttpResponse) -> Result<R, Error>
    where
        R: DeserializeOwned + Default,
    {
        check_status(&response).map_err(|kind| Error::new(endpoint, kind))?;
        serde_json::from_str::<Option<R>>(&response.body)
            .map(Option::unwrap_or_default)
            .map_err(|e| Error::new(endpoint, ErrorKind::Decode(e)))
    }

    async fn execute<R: DeserializeOwned + Default>(
        &self,
        ctx: &Context,
        endpoint: Endpoint,
        request: HttpRequest,
    ) -> Result<R, Error> {
        debug!(
            method = %request.method,
            url = %request.url,
            language = %self.config.language,
            "sending lardi request"
        );
        let response = ctx
            .run(self.transport.send(request))
            .await
            .map_err(|err| {
                if err.is_cancellation() {
                    warn!(operation = endpoint.operation(), error = %err, "request stopped by context");
                }
                Error::new(endpoint, err)
            })?;
        debug!(status = response.status, operation = endpoint.operation(), "lardi response");
        self.parse_response(endpoint, response)
    }

    async fn fetch<R: DeserializeOwned + Default>(&self, ctx: &Context, endpoint: Endpoint) -> Result<R, Error> {
        let request = self.build_get(endpoint);
        self.execute(ctx, endpoint, request).await
    }

    pub async fn create_cargo(&self, ctx: &Context, cargo: &CargoRequest) -> Result<CargoResponse, Error> {
        let request = self.build_create_cargo(cargo)?;
        self.execute(ctx, Endpoint::CreateCargo, request).await
    }

    pub async fn get_contacts(&self, ctx: &Context) -> Result<Vec<Contact>, Error> {
        self.fetch(ctx, Endpoint::Contacts).await
    }

    pub async fn get_areas(&self, ctx: &Context) -> Result<Vec<Reference>, Error> {
        self.fetch(ctx, Endpoint::Areas).await
    }

    /// First area named exactly `name`, or `None`.
    pub async fn find_area(&self, ctx: &Context, name: &str) -> Result<Option<Reference>, Error> {
        Ok(find_by_name(self.get_areas(ctx).await?, name))
    }

    pub async fn get_load_types(&self, ctx: &Context) -> Result<Vec<Reference>, Error> {
        self.fetch(ctx, Endpoint::LoadTypes).await
    }

    pub async fn get_payment_types(&self, ctx: &Context) -> Result<Vec<Reference>, Error> {
        self.fetch(ctx, Endpoint::PaymentTypes).await
    }

    pub async fn get_package_types(&self, ctx: &Context) -> Result<Vec<Reference>, Error> {
        self.fetch(ctx, Endpoint::PackageTypes).await
    }

    pub async fn get_body_types(&self, ctx: &Context) -> Result<Vec<Reference>, Error> {
        self.fetch(ctx, Endpoint::BodyTypes).await
    }

    pub async fn find_body_type(&self, ctx: &Context, name: &str) -> Result<Option<Reference>, Error> {
        Ok(find_by_name(self.get_body_types(ctx).await?, name))
    }

    pub async fn get_payment_moments(&self, ctx: &Context) -> Result<Vec<Reference>, Error> {
        self.fetch(ctx, Endpoint::PaymentMoments).await
    }

    pub async fn get_currencies(&self, ctx: &Context) -> Result<Vec<Reference>, Error> {
        self.fetch(ctx, Endpoint::Currencies).await
    }

    pub async fn find_currency(&self, ctx: &Context, name: &str) -> Result<Option<Reference>, Error> {
        Ok(find_by_name(self.get_currencies(ctx).await?, name))
    }

    pub async fn get_units(&self, ctx: &Context) -> Result<Vec<Reference>, Error> {
        self.fetch(ctx, Endpoint::PaymentUnits).await
    }
}

/// Map a non-2xx response to the decoded `ApiError`.
fn check_status(response: &HttpResponse) -> Result<(), ErrorKind> {
    if response.is_success() {
        return Ok(());
    }
    match serde_json::from_str::<Option<ApiError>>(&response.body) {
        Ok(api) => {
            let api = api.unwrap_or_default();
            warn!(
                status = response.status,
                error = %api.error_code,
                message = %api.message,
                "lardi api rejected request"
            );
            Err(ErrorKind::Api(api))
        }
        Err(source) => Err(ErrorKind::DecodeErrorBody {
            status: response.status,
            source,
        }),
    }
}
