// File: ./src/notify/middleware.rs
//! Tower middleware that stamps every outgoing request with our User-Agent.
use http::Request;
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

/// `slotwatch/<version>`
pub fn default_user_agent() -> String {
    format!("slotwatch/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone, Debug)]
pub struct UserAgentLayer {
    pub user_agent: String,
}

impl UserAgentLayer {
    pub fn new(user_agent: String) -> Self {
        Self { user_agent }
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserAgentService<S> {
    inner: S,
    user_agent: String,
}

impl<S, ReqBody> Service<Request<ReqBody>> for UserAgentService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        // Keep a caller-provided agent.
        if !req.headers().contains_key(http::header::USER_AGENT)
            && let Ok(val) = http::HeaderValue::from_str(&self.user_agent)
        {
            req.headers_mut().insert(http::header::USER_AGENT, val);
        }
        self.inner.call(req)
    }
}
