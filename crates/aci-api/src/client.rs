// APIC REST client
//
// Wraps `reqwest::Client` with APIC-specific URL construction and
// `imdata` envelope unwrapping. Session state lives entirely in the
// cookie jar (the `APIC-cookie` set by a successful login); the client
// itself holds no mutable state.

use secrecy::ExposeSecret;
use tracing::debug;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::mo::Mo;
use crate::transport::TransportConfig;

/// Raw HTTP client for the APIC's native REST API (XML flavor).
///
/// Handles the `<imdata totalCount="..">` envelope and DN / class based
/// URL construction. All methods return unwrapped child objects -- the
/// envelope is stripped before the caller sees it.
pub struct ApicClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl ApicClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). The `base_url` should
    /// be the controller root (e.g. `https://apic.example.com`).
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path, e.g. `aaaLogin.xml` or
    /// `mo/uni/tn-t1.xml`.
    fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    /// URL for a DN query: `{base}/api/mo/{dn}.xml`.
    fn mo_url(&self, dn: &str) -> Result<Url, Error> {
        self.api_url(&format!("mo/{dn}.xml"))
    }

    /// URL for a class query: `{base}/api/node/class/{class}.xml`.
    fn class_url(&self, class: &str) -> Result<Url, Error> {
        self.api_url(&format!("node/class/{class}.xml"))
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Authenticate against the controller.
    ///
    /// On success the session cookie lands in the jar and subsequent
    /// requests are authenticated transparently.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.api_url("aaaLogin.xml")?;
        debug!("POST {} (login)", url);

        let body = Mo::new("aaaUser")
            .with_attr("name", &self.credentials.username)
            .with_attr("pwd", self.credentials.password.expose_secret())
            .to_xml()?;

        let resp = self.http.post(url).body(body).send().await?;
        let text = resp.text().await?;
        let root = Mo::parse_document(&text)?;

        if let Some(error) = root.children_of_class("error").next() {
            return Err(Error::Authentication {
                message: error.attr("text").unwrap_or("login rejected").to_string(),
            });
        }
        if root.children_of_class("aaaLogin").next().is_none() {
            return Err(Error::UnexpectedResponse(
                "login response contains no aaaLogin element".into(),
            ));
        }
        Ok(())
    }

    /// End the session. Errors are reported but the cookie is gone either way.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("aaaLogout.xml")?;
        debug!("POST {} (logout)", url);

        let body = Mo::new("aaaUser")
            .with_attr("name", &self.credentials.username)
            .to_xml()?;
        self.http.post(url).body(body).send().await?;
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Look up a single managed object by DN. Returns `None` when the
    /// controller knows no object at that DN (empty `imdata`).
    pub async fn lookup_dn(&self, dn: &str) -> Result<Option<Mo>, Error> {
        let url = self.mo_url(dn)?;
        let mut results = self.get(url).await?;
        Ok(if results.is_empty() {
            None
        } else {
            Some(results.remove(0))
        })
    }

    /// Look up a DN together with a filtered child subtree, e.g. a bridge
    /// domain with its `fvSubnet` / `fvRsCtx` children in one round trip.
    pub async fn lookup_dn_subtree(
        &self,
        dn: &str,
        child_classes: &[&str],
    ) -> Result<Option<Mo>, Error> {
        let mut url = self.mo_url(dn)?;
        url.query_pairs_mut()
            .append_pair("query-target", "self")
            .append_pair("rsp-subtree", "children")
            .append_pair("rsp-subtree-class", &child_classes.join(","));
        let mut results = self.get(url).await?;
        Ok(if results.is_empty() {
            None
        } else {
            Some(results.remove(0))
        })
    }

    /// List direct children of a DN, restricted to one class.
    pub async fn children_of(&self, dn: &str, class: &str) -> Result<Vec<Mo>, Error> {
        let mut url = self.mo_url(dn)?;
        url.query_pairs_mut()
            .append_pair("query-target", "children")
            .append_pair("target-subtree-class", class);
        self.get(url).await
    }

    /// Query all instances of a class, optionally filtered on one
    /// attribute equality (`query-target-filter=eq(class.attr,"value")`).
    pub async fn lookup_class(
        &self,
        class: &str,
        filter: Option<(&str, &str)>,
    ) -> Result<Vec<Mo>, Error> {
        let mut url = self.class_url(class)?;
        if let Some((attr, value)) = filter {
            url.query_pairs_mut().append_pair(
                "query-target-filter",
                &format!("eq({class}.{attr},\"{value}\")"),
            );
        }
        self.get(url).await
    }

    // ── Commit ───────────────────────────────────────────────────────

    /// Commit one managed-object mutation.
    ///
    /// The object must carry its own `dn` attribute; the APIC resolves the
    /// target from it when posted against the policy universe root.
    pub async fn commit(&self, mo: &Mo) -> Result<(), Error> {
        let url = self.api_url("mo/uni.xml")?;
        let body = mo.to_xml()?;
        debug!("POST {} body={}", url, body);

        let resp = self.http.post(url).body(body).send().await?;
        self.parse_envelope(resp).await.map(|_| ())
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get(&self, url: Url) -> Result<Vec<Mo>, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        self.parse_envelope(resp).await
    }

    /// Parse the `imdata` envelope, returning its children on success or
    /// an `Error::Api` when it carries an `<error>` element.
    async fn parse_envelope(&self, resp: reqwest::Response) -> Result<Vec<Mo>, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        let root = Mo::parse_document(&body)?;

        if root.class() != "imdata" {
            return Err(Error::UnexpectedResponse(format!(
                "expected imdata envelope, got <{}>",
                root.class()
            )));
        }

        if let Some(error) = root.children_of_class("error").next() {
            let code = error.attr("code").unwrap_or("unknown").to_string();
            if status == reqwest::StatusCode::FORBIDDEN
                || status == reqwest::StatusCode::UNAUTHORIZED
            {
                return Err(Error::SessionExpired);
            }
            return Err(Error::Api {
                code,
                message: error.attr("text").unwrap_or("no error text").to_string(),
            });
        }

        Ok(root.children().to_vec())
    }
}
