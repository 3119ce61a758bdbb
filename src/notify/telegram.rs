// File: ./src/notify/telegram.rs
//! Telegram Bot API delivery (`sendMessage`, HTML parse mode).
use crate::notify::Notifier;
use crate::notify::middleware::{UserAgentLayer, UserAgentService, default_user_agent};
use anyhow::{Context, Result};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower::ServiceExt;
use tower_layer::Layer;

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

type HttpsClient = UserAgentService<
    Client<
        hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
        String,
    >,
>;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct TelegramNotifier {
    client: HttpsClient,
    api_base: String,
    token: String,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_api_base(TELEGRAM_API_BASE, token)
    }

    /// Notifier talking to a custom Bot API endpoint (self-hosted server, tests).
    pub fn with_api_base(api_base: &str, token: &str) -> Result<Self> {
        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        root_store.add_parsable_certificates(result.certs);
        if root_store.is_empty() {
            log::warn!("No system certificates found; HTTPS delivery will fail.");
        }
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let http_client = Client::builder(TokioExecutor::new()).build(https_connector);
        let client = UserAgentLayer::new(default_user_agent()).layer(http_client);

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
            timeout: SEND_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn try_send(&self, chat_id: &str, message: &str) -> Result<()> {
        let uri = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = serde_json::to_string(&SendMessage {
            chat_id,
            text: message,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        })?;

        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .context("Failed to build Telegram request")?;

        let exchange = async {
            let response = self.client.clone().oneshot(request).await?;
            let status = response.status();
            let bytes = response.into_body().collect().await?.to_bytes();
            Ok::<_, anyhow::Error>((status, bytes))
        };

        let (status, bytes) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| anyhow::anyhow!("timed out after {:?}", self.timeout))??;

        let parsed: Option<ApiResponse> = serde_json::from_slice(&bytes).ok();
        let description = parsed
            .as_ref()
            .and_then(|r| r.description.clone())
            .unwrap_or_default();

        if status != StatusCode::OK {
            anyhow::bail!("HTTP {} {}", status.as_u16(), description);
        }
        match parsed {
            Some(r) if r.ok => Ok(()),
            Some(_) => anyhow::bail!("API refused message: {}", description),
            None => anyhow::bail!("Unexpected response body"),
        }
    }
}

impl Notifier for TelegramNotifier {
    async fn send(&self, chat_id: &str, message: &str) -> bool {
        match self.try_send(chat_id, message).await {
            Ok(()) => {
                log::info!("Telegram message sent.");
                true
            }
            Err(e) => {
                log::warn!("Telegram error: {:#}", e);
                false
            }
        }
    }
}
