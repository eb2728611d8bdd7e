//! HTTP transport for the JSON-RPC style service.

use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use vanna_common::{Result, VannaConfig, VannaError, create_default_client};
use vanna_protocol::{Method, RpcRequest, RpcResponse};

use crate::session::Session;

/// Header carrying the API key.
pub const KEY_HEADER: &str = "Vanna-Key";

/// Header carrying the selected model.
pub const MODEL_HEADER: &str = "Vanna-Org";

/// Serialize a single parameter object into the `params` array.
pub fn params<T: Serialize>(param: &T) -> Result<Vec<Value>> {
    Ok(vec![serde_json::to_value(param)?])
}

/// Posts RPC envelopes to the authenticated and unauthenticated endpoints.
#[derive(Debug, Clone)]
pub struct RpcTransport {
    http: Client,
    rpc_url: String,
    unauthenticated_url: String,
}

impl RpcTransport {
    /// Transport for a service base URL using the default HTTP client.
    pub fn new(endpoint: &str) -> Result<Self> {
        check_endpoint(endpoint)?;
        Ok(Self::with_client(create_default_client()?, endpoint))
    }

    /// Transport for a service base URL using a caller-built HTTP client.
    pub fn with_client(http: Client, endpoint: &str) -> Self {
        Self {
            http,
            rpc_url: vanna_common::rpc_url(endpoint),
            unauthenticated_url: vanna_common::unauthenticated_rpc_url(endpoint),
        }
    }

    pub fn from_config(config: &VannaConfig) -> Result<Self> {
        Self::new(&config.endpoint)
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn unauthenticated_url(&self) -> &str {
        &self.unauthenticated_url
    }

    /// Call an authenticated method on behalf of `session`.
    ///
    /// Fails before sending anything when the session has no API key, or has
    /// no model and the method is scoped to one.
    pub async fn call<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: Method,
        params: Vec<Value>,
    ) -> Result<RpcResponse<T>> {
        if method.is_unauthenticated() {
            return Err(VannaError::validation(format!(
                "{method} is served by the unauthenticated endpoint"
            )));
        }
        let key = session.require_api_key()?;
        let model = if method.is_model_agnostic() {
            session.model()
        } else {
            Some(session.require_model()?)
        };

        let mut request = self
            .http
            .post(&self.rpc_url)
            .header(KEY_HEADER, key.expose_secret());
        if let Some(model) = model {
            request = request.header(MODEL_HEADER, model.as_str());
        }

        debug!(method = %method, model = ?model.map(|m| m.as_str()), "Sending RPC");
        self.send(request, method, params).await
    }

    /// Call a method served without credentials (the login flow).
    pub async fn call_unauthenticated<T: DeserializeOwned>(
        &self,
        method: Method,
        params: Vec<Value>,
    ) -> Result<RpcResponse<T>> {
        if !method.is_unauthenticated() {
            return Err(VannaError::validation(format!("{method} requires an API key")));
        }
        debug!(method = %method, "Sending unauthenticated RPC");
        let request = self.http.post(&self.unauthenticated_url);
        self.send(request, method, params).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        method: Method,
        params: Vec<Value>,
    ) -> Result<RpcResponse<T>> {
        let body = RpcRequest::new(method, params);
        let response = request.json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(method = %method, %status, "RPC returned HTTP error");
            return Err(VannaError::Server(format!("{method} failed ({status}): {text}")));
        }

        let bytes = response.bytes().await?;
        let parsed: RpcResponse<T> = serde_json::from_slice(&bytes)?;
        if let Some(err) = &parsed.error {
            debug!(method = %method, code = ?err.code, message = %err.message, "RPC returned error");
        }
        Ok(parsed)
    }
}

/// Endpoints must be absolute http(s) URLs.
fn check_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| {
        VannaError::improperly_configured(format!("Invalid endpoint {endpoint:?}: {e}"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(VannaError::improperly_configured(format!(
            "Invalid endpoint {endpoint:?}: unsupported scheme {scheme}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vanna_common::ModelName;
    use vanna_protocol::{OrgList, Question, Status};
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session(model: Option<&str>) -> Session {
        let mut session = Session::with_api_key("test-key");
        if let Some(model) = model {
            session.set_model(ModelName::parse(model).unwrap());
        }
        session
    }

    #[tokio::test]
    async fn test_authenticated_call_sends_headers_and_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .and(header(KEY_HEADER, "test-key"))
            .and(header(MODEL_HEADER, "test-org"))
            .and(body_json(json!({
                "method": "remove_sql",
                "params": [{"question": "q"}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": {"success": true, "message": ""}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = RpcTransport::new(&server.uri()).unwrap();
        let response: RpcResponse<Status> = transport
            .call(
                &session(Some("test-org")),
                Method::RemoveSql,
                params(&Question::new("q")).unwrap(),
            )
            .await
            .unwrap();

        assert!(response.result.unwrap().success);
    }

    #[tokio::test]
    async fn test_model_agnostic_call_omits_model_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .and(header_exists(KEY_HEADER))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"result": {"organizations": ["demo-tpc-h"]}})),
            )
            .mount(&server)
            .await;

        let transport = RpcTransport::new(&server.uri()).unwrap();
        let response: RpcResponse<OrgList> = transport
            .call(&session(None), Method::ListOrgs, vec![])
            .await
            .unwrap();

        assert_eq!(response.result.unwrap().organizations, vec!["demo-tpc-h"]);
        let received = server.received_requests().await.unwrap();
        assert!(received[0].headers.get(MODEL_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_scoped_call_without_model_fails_before_sending() {
        let server = MockServer::start().await;
        let transport = RpcTransport::new(&server.uri()).unwrap();

        let err = transport
            .call::<Status>(&session(None), Method::StoreDdl, vec![])
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_call_without_key_is_configuration_error() {
        let server = MockServer::start().await;
        let transport = RpcTransport::new(&server.uri()).unwrap();

        let err = transport
            .call::<OrgList>(&Session::new(), Method::ListOrgs, vec![])
            .await
            .unwrap_err();

        assert!(err.is_improperly_configured());
    }

    #[tokio::test]
    async fn test_methods_stay_on_their_endpoint() {
        let server = MockServer::start().await;
        let transport = RpcTransport::new(&server.uri()).unwrap();

        let err = transport
            .call::<Status>(&session(None), Method::SendOtp, vec![])
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "send_otp is served by the unauthenticated endpoint"
        );

        let err = transport
            .call_unauthenticated::<OrgList>(Method::ListOrgs, vec![])
            .await
            .unwrap_err();
        assert!(err.is_validation());

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthenticated_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/unauthenticated_rpc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"result": {"success": true}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = RpcTransport::new(&server.uri()).unwrap();
        let response: RpcResponse<Status> = transport
            .call_unauthenticated(Method::SendOtp, params(&json!({"email": "a@b.c"})).unwrap())
            .await
            .unwrap();
        assert!(response.result.unwrap().success);
    }

    #[tokio::test]
    async fn test_http_error_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let transport = RpcTransport::new(&server.uri()).unwrap();
        let err = transport
            .call::<OrgList>(&session(None), Method::ListOrgs, vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, VannaError::Server(_)));
        assert!(err.to_string().contains("list_orgs"));
    }

    #[test]
    fn test_malformed_endpoint_is_rejected() {
        let err = RpcTransport::new("localhost:9000").unwrap_err();
        assert!(err.is_improperly_configured());

        let err = RpcTransport::new("not a url").unwrap_err();
        assert!(err.to_string().starts_with("Invalid endpoint"));
    }

    #[test]
    fn test_urls_derive_from_endpoint() {
        let transport = RpcTransport::new("http://localhost:9000/").unwrap();
        assert_eq!(transport.rpc_url(), "http://localhost:9000/rpc");
        assert_eq!(
            transport.unauthenticated_url(),
            "http://localhost:9000/unauthenticated_rpc"
        );
    }
}
