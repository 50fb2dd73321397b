//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::domain::{
    Alias, AliasId, AliasSuffix, ApiKey, Contact, CreateAlias, EmailAddress, Hostname, Mailbox,
    ValidationError,
};
use crate::transport;

const DEFAULT_BASE_URL: &str = "https://app.simplelogin.io/api";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub(crate) method: HttpMethod,
    pub(crate) url: String,
    pub(crate) api_key: String,
    pub(crate) timeout: Duration,
    pub(crate) body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
                HttpMethod::Delete => self.client.delete(&request.url),
            };
            builder = builder
                .header(ApiKey::HEADER, request.api_key.as_str())
                .timeout(request.timeout);
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SimpleLoginClient`].
///
/// Expected "record absent" outcomes do not use this type: a missing mailbox
/// is `Ok(None)` from [`SimpleLoginClient::find_mailbox_by_email`] and an
/// empty alias query is `Ok(vec![])`. The variants here distinguish an
/// unreachable or failing service from a hostname the service refuses to
/// issue suffixes for.
pub enum SimpleLoginError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server. `message` is
    /// the server's JSON `error` field when present, else the raw body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, message: Option<String> },

    /// The alias-options endpoint offered no suffix matching the hostname.
    #[error("no alias suffix available for hostname: {hostname}")]
    SuffixNotFound { hostname: String },

    /// The account has no mailbox with the requested email address.
    #[error("no mailbox found for email: {email}")]
    MailboxNotFound { email: String },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`SimpleLoginClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct SimpleLoginClientBuilder {
    api_key: ApiKey,
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
}

impl SimpleLoginClientBuilder {
    /// Create a builder with the default base URL and timeout.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Override the API base URL (e.g. for a self-hosted instance).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SimpleLoginClient`], validating the base URL eagerly.
    pub fn build(self) -> Result<SimpleLoginClient, SimpleLoginError> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(SimpleLoginError::Validation(ValidationError::InvalidBaseUrl {
                input: self.base_url,
            }));
        }
        let base_url = self.base_url.trim_end_matches('/').to_owned();

        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| SimpleLoginError::Transport(Box::new(err)))?;

        Ok(SimpleLoginClient {
            api_key: self.api_key,
            base_url,
            timeout: self.timeout,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Typed client for the SimpleLogin alias-management API.
///
/// Every request carries the API key in the `Authentication` header and a
/// bounded timeout. Operations are one HTTP call each, except
/// [`SimpleLoginClient::create_alias`], which resolves a signed suffix first.
pub struct SimpleLoginClient {
    api_key: ApiKey,
    base_url: String,
    timeout: Duration,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for SimpleLoginClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleLoginClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SimpleLoginClient {
    /// Create a client for the hosted SimpleLogin instance.
    ///
    /// For more customization, use [`SimpleLoginClient::builder`].
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(api_key: ApiKey) -> SimpleLoginClientBuilder {
        SimpleLoginClientBuilder::new(api_key)
    }

    /// Fetch enabled aliases, optionally narrowed by a server-side query.
    ///
    /// An exact alias address makes the query a lookup probe; no matches is
    /// `Ok(vec![])`, not an error.
    pub async fn list_aliases(&self, query: Option<&str>) -> Result<Vec<Alias>, SimpleLoginError> {
        let url = format!("{}/v2/aliases?enabled&page_id=0", self.base_url);
        let body = transport::encode_list_aliases_body(query);
        let response = self.execute(HttpMethod::Post, url, Some(body)).await?;

        let aliases = transport::decode_list_aliases_response(&response.body)
            .map_err(|err| SimpleLoginError::Parse(Box::new(err)))?;
        debug!(count = aliases.len(), "fetched aliases");
        Ok(aliases)
    }

    /// Fetch the suffixes the server offers for custom aliases on `hostname`.
    pub async fn alias_suffixes(
        &self,
        hostname: &Hostname,
    ) -> Result<Vec<AliasSuffix>, SimpleLoginError> {
        let url = format!(
            "{}/v5/alias/options?hostname={}",
            self.base_url,
            hostname.as_str()
        );
        let response = self.execute(HttpMethod::Get, url, None).await?;

        let suffixes = transport::decode_alias_options_response(&response.body)
            .map_err(|err| SimpleLoginError::Parse(Box::new(err)))?;
        debug!(
            count = suffixes.len(),
            hostname = hostname.as_str(),
            "fetched alias suffixes"
        );
        Ok(suffixes)
    }

    /// Create a custom alias on `hostname`.
    ///
    /// Resolves the signed suffix matching `@{hostname}` exactly, then issues
    /// the creation call. Errors with [`SimpleLoginError::SuffixNotFound`]
    /// when the server offers no such suffix.
    pub async fn create_alias(
        &self,
        hostname: &Hostname,
        request: CreateAlias,
    ) -> Result<Alias, SimpleLoginError> {
        let suffixes = self.alias_suffixes(hostname).await?;
        let Some(suffix) = transport::find_suffix_for_hostname(&suffixes, hostname) else {
            warn!(
                hostname = hostname.as_str(),
                "no alias suffix offered for hostname"
            );
            return Err(SimpleLoginError::SuffixNotFound {
                hostname: hostname.as_str().to_owned(),
            });
        };

        let url = format!("{}/v3/alias/custom/new", self.base_url);
        let body = transport::encode_create_alias_body(&request, &suffix.signed_suffix);
        let response = self.execute(HttpMethod::Post, url, Some(body)).await?;

        let alias = transport::decode_alias_response(&response.body)
            .map_err(|err| SimpleLoginError::Parse(Box::new(err)))?;
        debug!(email = %alias.email, "created alias");
        Ok(alias)
    }

    /// Delete an alias. Best-effort callers can reduce this to `.is_ok()`.
    pub async fn delete_alias(&self, id: AliasId) -> Result<(), SimpleLoginError> {
        let url = format!("{}/aliases/{}", self.base_url, id.value());
        self.execute(HttpMethod::Delete, url, None).await?;
        debug!(id = id.value(), "deleted alias");
        Ok(())
    }

    /// Fetch every mailbox on the account.
    pub async fn list_mailboxes(&self) -> Result<Vec<Mailbox>, SimpleLoginError> {
        let url = format!("{}/mailboxes", self.base_url);
        let response = self.execute(HttpMethod::Get, url, None).await?;

        let mailboxes = transport::decode_mailboxes_response(&response.body)
            .map_err(|err| SimpleLoginError::Parse(Box::new(err)))?;
        debug!(count = mailboxes.len(), "fetched mailboxes");
        Ok(mailboxes)
    }

    /// Find the mailbox with an exact email match, if any.
    pub async fn find_mailbox_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Mailbox>, SimpleLoginError> {
        let mailboxes = self.list_mailboxes().await?;
        let found = mailboxes
            .into_iter()
            .find(|mailbox| mailbox.email == email.as_str());
        if found.is_none() {
            debug!(email = email.as_str(), "no mailbox found for email");
        }
        Ok(found)
    }

    /// Resolve the reverse-alias contact for `(alias, recipient)`.
    ///
    /// Find-or-create semantics live on the server; the returned `existed`
    /// flag says which one happened.
    pub async fn get_or_create_contact(
        &self,
        alias_id: AliasId,
        email: &EmailAddress,
    ) -> Result<Contact, SimpleLoginError> {
        let url = format!("{}/aliases/{}/contacts", self.base_url, alias_id.value());
        let body = transport::encode_contact_body(email);
        let response = self.execute(HttpMethod::Post, url, Some(body)).await?;

        let contact = transport::decode_contact_response(&response.body)
            .map_err(|err| SimpleLoginError::Parse(Box::new(err)))?;
        debug!(
            reverse_alias = %contact.reverse_alias_address,
            existed = contact.existed,
            "resolved contact"
        );
        Ok(contact)
    }

    async fn execute(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, SimpleLoginError> {
        let request = HttpRequest {
            method,
            url,
            api_key: self.api_key.as_str().to_owned(),
            timeout: self.timeout,
            body,
        };
        let response = self
            .http
            .execute(request)
            .await
            .map_err(SimpleLoginError::Transport)?;

        if !(200..=299).contains(&response.status) {
            let message = transport::decode_error_message(&response.body).or_else(|| {
                let trimmed = response.body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            });
            error!(
                status = response.status,
                message = message.as_deref().unwrap_or(""),
                "SimpleLogin API request failed"
            );
            return Err(SimpleLoginError::HttpStatus {
                status: response.status,
                message,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    #[derive(Clone)]
    pub(crate) struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    struct FakeTransportState {
        responses: VecDeque<(u16, String)>,
        requests: Vec<HttpRequest>,
    }

    impl FakeTransport {
        pub(crate) fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    responses: VecDeque::new(),
                    requests: Vec::new(),
                })),
            }
        }

        /// Queue a canned response; responses are consumed in FIFO order.
        pub(crate) fn push_response(&self, status: u16, body: impl Into<String>) {
            self.state
                .lock()
                .unwrap()
                .responses
                .push_back((status, body.into()));
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.state.lock().unwrap().requests.clone()
        }
    }

    impl HttpTransport for FakeTransport {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                let next = state.responses.pop_front();
                let (status, body) = match next {
                    Some(response) => response,
                    None => panic!("unexpected request: {}", request.url),
                };
                state.requests.push(request);
                Ok(HttpResponse { status, body })
            })
        }
    }

    pub(crate) fn client_with_transport(
        api_key: &str,
        transport: &FakeTransport,
    ) -> SimpleLoginClient {
        SimpleLoginClient {
            api_key: ApiKey::new(api_key).unwrap(),
            base_url: "https://sl.invalid/api".to_owned(),
            timeout: Duration::from_secs(5),
            http: Arc::new(transport.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FakeTransport, client_with_transport};
    use super::*;
    use crate::domain::MailboxId;

    const ALIAS_LIST_JSON: &str = r#"
    {
      "aliases": [
        {
          "id": 5,
          "email": "237123456789@example.com",
          "enabled": true,
          "note": "Created by RelaySMS email bridge at 2024-01-01 00:00:00."
        }
      ]
    }
    "#;

    #[tokio::test]
    async fn list_aliases_sends_auth_header_query_and_timeout() {
        let transport = FakeTransport::new();
        transport.push_response(200, ALIAS_LIST_JSON);
        let client = client_with_transport("test_key", &transport);

        let aliases = client
            .list_aliases(Some("237123456789@example.com"))
            .await
            .unwrap();
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases[0].id, AliasId::new(5));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(
            requests[0].url,
            "https://sl.invalid/api/v2/aliases?enabled&page_id=0"
        );
        assert_eq!(requests[0].api_key, "test_key");
        assert_eq!(requests[0].timeout, Duration::from_secs(5));
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({ "query": "237123456789@example.com" }))
        );
    }

    #[tokio::test]
    async fn list_aliases_without_query_sends_empty_body() {
        let transport = FakeTransport::new();
        transport.push_response(200, r#"{"aliases": []}"#);
        let client = client_with_transport("test_key", &transport);

        let aliases = client.list_aliases(None).await.unwrap();
        assert!(aliases.is_empty());

        let requests = transport.requests();
        assert_eq!(requests[0].body, Some(serde_json::json!({})));
    }

    #[tokio::test]
    async fn non_success_status_extracts_json_error_message() {
        let transport = FakeTransport::new();
        transport.push_response(401, r#"{"error": "Wrong api key"}"#);
        let client = client_with_transport("bad_key", &transport);

        let err = client.list_aliases(None).await.unwrap_err();
        match err {
            SimpleLoginError::HttpStatus { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Wrong api key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_falls_back_to_raw_body() {
        let transport = FakeTransport::new();
        transport.push_response(500, "Internal Server Error");
        let client = client_with_transport("test_key", &transport);

        let err = client.list_aliases(None).await.unwrap_err();
        assert!(matches!(
            err,
            SimpleLoginError::HttpStatus {
                status: 500,
                message: Some(ref body)
            } if body == "Internal Server Error"
        ));
    }

    #[tokio::test]
    async fn non_success_status_with_empty_body_maps_to_none() {
        let transport = FakeTransport::new();
        transport.push_response(503, "   ");
        let client = client_with_transport("test_key", &transport);

        let err = client.list_aliases(None).await.unwrap_err();
        assert!(matches!(
            err,
            SimpleLoginError::HttpStatus {
                status: 503,
                message: None
            }
        ));
    }

    #[tokio::test]
    async fn invalid_json_maps_to_parse_error() {
        let transport = FakeTransport::new();
        transport.push_response(200, "{ not json }");
        let client = client_with_transport("test_key", &transport);

        let err = client.list_aliases(None).await.unwrap_err();
        assert!(matches!(err, SimpleLoginError::Parse(_)));
    }

    #[tokio::test]
    async fn create_alias_resolves_suffix_then_creates() {
        let transport = FakeTransport::new();
        transport.push_response(
            200,
            r#"{"suffixes": [{"suffix": "@example.com", "signed_suffix": "@example.com.Xq2Zt"}]}"#,
        );
        transport.push_response(
            201,
            r#"{"id": 9, "email": "237123456789@example.com", "enabled": true}"#,
        );
        let client = client_with_transport("test_key", &transport);

        let hostname = Hostname::new("example.com").unwrap();
        let request = CreateAlias::new("237123456789", MailboxId::new(14)).unwrap();
        let alias = client.create_alias(&hostname, request).await.unwrap();
        assert_eq!(alias.id, AliasId::new(9));
        assert_eq!(alias.email, "237123456789@example.com");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(
            requests[0].url,
            "https://sl.invalid/api/v5/alias/options?hostname=example.com"
        );
        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].url, "https://sl.invalid/api/v3/alias/custom/new");

        let body = requests[1].body.as_ref().unwrap();
        assert_eq!(body["alias_prefix"], "237123456789");
        assert_eq!(body["signed_suffix"], "@example.com.Xq2Zt");
        assert_eq!(body["mailbox_ids"], serde_json::json!([14]));
    }

    #[tokio::test]
    async fn create_alias_fails_without_matching_suffix() {
        let transport = FakeTransport::new();
        transport.push_response(
            200,
            r#"{"suffixes": [{"suffix": "@other.com", "signed_suffix": "@other.com.R9at"}]}"#,
        );
        let client = client_with_transport("test_key", &transport);

        let hostname = Hostname::new("example.com").unwrap();
        let request = CreateAlias::new("237123456789", MailboxId::new(14)).unwrap();
        let err = client.create_alias(&hostname, request).await.unwrap_err();
        assert!(matches!(
            err,
            SimpleLoginError::SuffixNotFound { ref hostname } if hostname == "example.com"
        ));

        // Only the options lookup went out; no creation was attempted.
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn find_mailbox_by_email_scans_for_exact_match() {
        let mailboxes = r#"
        {
          "mailboxes": [
            { "id": 1, "email": "admin@example.com" },
            { "id": 2, "email": "backup@example.com" }
          ]
        }
        "#;

        let transport = FakeTransport::new();
        transport.push_response(200, mailboxes);
        transport.push_response(200, mailboxes);
        let client = client_with_transport("test_key", &transport);

        let found = client
            .find_mailbox_by_email(&EmailAddress::new("backup@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(found.map(|mailbox| mailbox.id), Some(MailboxId::new(2)));

        let missing = client
            .find_mailbox_by_email(&EmailAddress::new("nobody@example.com").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn get_or_create_contact_posts_bracketed_address() {
        let transport = FakeTransport::new();
        transport.push_response(
            200,
            r#"
            {
              "id": 7,
              "contact": "friend@gmail.com",
              "reverse_alias": "friend at gmail.com <ra+abcdef@sl.example.com>",
              "reverse_alias_address": "ra+abcdef@sl.example.com",
              "existed": false
            }
            "#,
        );
        let client = client_with_transport("test_key", &transport);

        let contact = client
            .get_or_create_contact(
                AliasId::new(5),
                &EmailAddress::new("friend@gmail.com").unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(contact.reverse_alias_address, "ra+abcdef@sl.example.com");
        assert!(!contact.existed);

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://sl.invalid/api/aliases/5/contacts");
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({ "contact": "<friend@gmail.com>" }))
        );
    }

    #[tokio::test]
    async fn delete_alias_issues_delete_request() {
        let transport = FakeTransport::new();
        transport.push_response(200, r#"{"deleted": true}"#);
        let client = client_with_transport("test_key", &transport);

        client.delete_alias(AliasId::new(5)).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].url, "https://sl.invalid/api/aliases/5");
        assert!(requests[0].body.is_none());
    }

    #[test]
    fn builder_trims_trailing_slash_and_validates_url() {
        let client = SimpleLoginClient::builder(ApiKey::new("key").unwrap())
            .base_url("https://sl.invalid/api/")
            .build()
            .unwrap();
        assert_eq!(client.base_url, "https://sl.invalid/api");

        let err = SimpleLoginClient::builder(ApiKey::new("key").unwrap())
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SimpleLoginError::Validation(ValidationError::InvalidBaseUrl { .. })
        ));
    }
}
