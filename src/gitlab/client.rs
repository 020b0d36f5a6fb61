//! GitLab API client
//!
//! A single dispatch primitive ([`GitLabClient::exchange`]) sends one
//! authenticated request and hands the response to a decoding strategy.
//! Single reads, paginated list reads and writes are layered on top of it.
//!
//! Failures never escape the public methods: they are classified, logged
//! with the method, URL and request parameters, and reduced to `None` (or
//! `false`). Statuses on a call's ignore list are absorbed without logging.

use crate::auth::{AuthHeader, BoxedAuthProvider};
use crate::config::GitLabConfig;
use crate::error::{GitLabError, GitLabResult};
use crate::gitlab::pagination;
use crate::util::{QueryBuilder, SecretString};
use reqwest::{Client, Method, Proxy, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Which token authenticates a request
#[derive(Clone, Copy)]
pub enum Credential<'a> {
    /// The service token configured at construction
    Service,
    /// A caller-supplied personal access token
    Caller(&'a SecretString),
}

/// An API path template plus the values substituted into it
///
/// ```ignore
/// let call = ApiCall::new("/groups/{groupId}/variables/{key}")
///     .var("groupId", 42)
///     .var("key", "DEPLOY_TOKEN");
/// assert_eq!(call.path(), "/groups/42/variables/DEPLOY_TOKEN");
/// ```
#[derive(Debug, Clone)]
pub struct ApiCall {
    template: &'static str,
    vars: Vec<(&'static str, String)>,
    query: Vec<(&'static str, String)>,
}

impl ApiCall {
    pub fn new(template: &'static str) -> Self {
        Self {
            template,
            vars: Vec::new(),
            query: Vec::new(),
        }
    }

    /// Bind a `{name}` placeholder
    pub fn var(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.vars.push((name, value.to_string()));
        self
    }

    /// Add a query parameter
    pub fn query(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Template with every placeholder replaced by its URL-encoded value
    pub fn path(&self) -> String {
        self.vars
            .iter()
            .fold(self.template.to_string(), |path, (name, value)| {
                path.replace(&format!("{{{}}}", name), &urlencoding::encode(value))
            })
    }

    /// Path plus query string, with any extra parameters appended last
    fn endpoint(&self, extra: &[(&'static str, String)]) -> String {
        let query = self
            .query
            .iter()
            .chain(extra)
            .fold(QueryBuilder::new(), |q, (name, value)| q.param(name, value));
        format!("{}{}", self.path(), query.build())
    }
}

/// Request parameters as they appear in failure logs
impl fmt::Display for ApiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.vars.iter().chain(&self.query).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")
    }
}

/// GitLab API client
pub struct GitLabClient {
    http: Client,
    base_url: String,
    auth: BoxedAuthProvider,
    per_page: u32,
}

impl GitLabClient {
    /// Create a new GitLab client from configuration
    pub fn new(config: &GitLabConfig, auth: BoxedAuthProvider) -> GitLabResult<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .user_agent(format!("gitlab-helper/{}", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(Proxy::all(proxy).map_err(GitLabError::Request)?);
        }

        let http = builder.build().map_err(GitLabError::Request)?;

        debug!(auth_type = auth.auth_type(), "GitLab client configured");

        Ok(Self {
            http,
            base_url: config.api_url(),
            auth,
            per_page: config.per_page,
        })
    }

    /// Build a URL for an API endpoint
    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Add authentication to a request
    async fn authenticate(
        &self,
        request: RequestBuilder,
        credential: Credential<'_>,
    ) -> GitLabResult<RequestBuilder> {
        let header = match credential {
            Credential::Service => {
                self.auth
                    .get_auth_header()
                    .await
                    .map_err(|e| GitLabError::Api {
                        status: 401,
                        message: e.to_string(),
                    })?
            }
            Credential::Caller(token) => AuthHeader::private_token(token.clone()),
        };

        let value = header.header_value().map_err(|_| GitLabError::Api {
            status: 401,
            message: "token is not a valid header value".to_string(),
        })?;

        Ok(request.header(header.header_name(), value))
    }

    /// Send one request and decode the successful response with `decode`
    async fn exchange<T, D, F>(
        &self,
        method: Method,
        url: &str,
        credential: Credential<'_>,
        form: Option<&[(&str, String)]>,
        decode: D,
    ) -> GitLabResult<T>
    where
        D: FnOnce(Response) -> F,
        F: Future<Output = GitLabResult<T>>,
    {
        let mut request = self.http.request(method, url);
        if let Some(form) = form {
            request = request.form(form);
        }
        let request = self.authenticate(request, credential).await?;

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitLabError::from_response(status.as_u16(), &body));
        }

        decode(response).await
    }

    /// Read a single entity
    #[instrument(skip_all, fields(endpoint = call.template()))]
    pub async fn read<T: DeserializeOwned>(
        &self,
        call: &ApiCall,
        credential: Credential<'_>,
        ignore: &[StatusCode],
    ) -> Option<T> {
        let url = self.url(&call.endpoint(&[]));

        self.exchange(Method::GET, &url, credential, None, decode_json::<T>)
            .await
            .inspect_err(|e| log_failure(&Method::GET, &url, call, e, ignore))
            .ok()
    }

    /// Read a list, following `Link: rel="next"` until the last page
    ///
    /// Items keep their upstream order across pages. If any page fails the
    /// whole result is `None`; a truncated list is never returned.
    #[instrument(skip_all, fields(endpoint = call.template()))]
    pub async fn read_list<T: DeserializeOwned>(
        &self,
        call: &ApiCall,
        credential: Credential<'_>,
        ignore: &[StatusCode],
    ) -> Option<Vec<T>> {
        let first = self.url(&call.endpoint(&[("per_page", self.per_page.to_string())]));

        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(first);

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                let e = GitLabError::InvalidResponse(format!("pagination loops back to {}", url));
                log_failure(&Method::GET, &url, call, &e, ignore);
                return None;
            }

            // Next-page URIs are used verbatim; only the auth header is re-sent
            match self
                .exchange(Method::GET, &url, credential, None, decode_page::<T>)
                .await
            {
                Ok((mut page, link)) => {
                    debug!(page = visited.len(), items = page.len(), "Fetched page");
                    items.append(&mut page);
                    next = link;
                }
                Err(e) => {
                    log_failure(&Method::GET, &url, call, &e, ignore);
                    return None;
                }
            }
        }

        Some(items)
    }

    /// Send a form-encoded write and decode the resulting entity
    #[instrument(skip_all, fields(method = %method, endpoint = call.template()))]
    pub async fn write<T: DeserializeOwned>(
        &self,
        method: Method,
        call: &ApiCall,
        form: &[(&str, String)],
        ignore: &[StatusCode],
    ) -> Option<T> {
        let url = self.url(&call.endpoint(&[]));

        self.exchange(
            method.clone(),
            &url,
            Credential::Service,
            Some(form),
            decode_json::<T>,
        )
        .await
        .inspect_err(|e| log_failure(&method, &url, call, e, ignore))
        .ok()
    }

    /// Send a write whose response carries no body (e.g. DELETE)
    #[instrument(skip_all, fields(method = %method, endpoint = call.template()))]
    pub async fn write_no_content(
        &self,
        method: Method,
        call: &ApiCall,
        ignore: &[StatusCode],
    ) -> bool {
        let url = self.url(&call.endpoint(&[]));

        self.exchange(method.clone(), &url, Credential::Service, None, discard)
            .await
            .inspect_err(|e| log_failure(&method, &url, call, e, ignore))
            .is_ok()
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> GitLabResult<T> {
    response
        .json()
        .await
        .map_err(|e| GitLabError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

async fn decode_page<T: DeserializeOwned>(
    response: Response,
) -> GitLabResult<(Vec<T>, Option<String>)> {
    let next = pagination::next_link(response.headers());
    let items = decode_json(response).await?;
    Ok((items, next))
}

async fn discard(_response: Response) -> GitLabResult<()> {
    Ok(())
}

/// Record a failed call unless its status is expected
fn log_failure(
    method: &Method,
    url: &str,
    call: &ApiCall,
    error: &GitLabError,
    ignore: &[StatusCode],
) {
    if let Some(status) = error.status()
        && ignore.iter().any(|s| s.as_u16() == status)
    {
        debug!(%method, url, params = %call, status, "API call failed with ignored status");
        return;
    }

    match error {
        GitLabError::Api { status, message } => {
            error!(%method, url, params = %call, status, body = %message, "API call failed with HTTP error");
        }
        GitLabError::Request(e) => {
            error!(%method, url, params = %call, error = %e, "API call failed with transport error");
        }
        GitLabError::InvalidResponse(reason) => {
            error!(%method, url, params = %call, reason = %reason, "API call returned an invalid response");
        }
    }
}
