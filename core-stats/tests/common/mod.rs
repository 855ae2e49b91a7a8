//! Shared fakes for core-stats integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::graphql::{QueryDefinition, QueryExecutor};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::library::{
    LibraryApi, PlaylistApi, PlaylistResponse, RootlistApi, RootlistOptions, RootlistResponse,
};
use bytes::Bytes;
use mockall::mock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

pub const HASH: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
pub const OTHER_HASH: &str = "fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

/// Minified route script containing a registration literal for `hash`
pub fn route_script(hash: &str) -> String {
    format!(
        r#"(self.webpackChunk=self.webpackChunk||[]).push([[42],{{7:(e,t,n)=>{{const r=new n.l("profileAttributes","query","{other}",null),o=new n.l("userTopContent","query","{hash}",null);}}}}]);"#,
        other = OTHER_HASH,
        hash = hash
    )
}

#[derive(Debug, Clone)]
pub enum ScriptReply {
    Body(u16, String),
    TransportError(String),
}

/// HTTP fake serving the route script and counting requests
pub struct ScriptServer {
    reply: Mutex<ScriptReply>,
    delay: Option<Duration>,
    requests: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl ScriptServer {
    pub fn new(reply: ScriptReply) -> Self {
        Self {
            reply: Mutex::new(reply),
            delay: None,
            requests: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn serving(script: impl Into<String>) -> Self {
        Self::new(ScriptReply::Body(200, script.into()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_reply(&self, reply: ScriptReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptServer {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(request.url.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.reply.lock().unwrap().clone();
        match reply {
            ScriptReply::Body(status, body) => Ok(HttpResponse {
                status,
                headers: HashMap::new(),
                body: Bytes::from(body),
            }),
            ScriptReply::TransportError(message) => Err(BridgeError::OperationFailed(message)),
        }
    }
}

mock! {
    pub Executor {}

    #[async_trait]
    impl QueryExecutor for Executor {
        async fn execute(&self, definition: &QueryDefinition, variables: Value) -> BridgeResult<Value>;
    }
}

mock! {
    pub Playlists {}

    #[async_trait]
    impl PlaylistApi for Playlists {
        async fn get_playlist(&self, uri: &str) -> BridgeResult<PlaylistResponse>;
    }
}

mock! {
    pub Rootlist {}

    #[async_trait]
    impl RootlistApi for Rootlist {
        async fn get_contents(&self, options: RootlistOptions) -> BridgeResult<RootlistResponse>;
    }
}

mock! {
    pub Library {}

    #[async_trait]
    impl LibraryApi for Library {
        async fn contains(&self, uris: &[String]) -> BridgeResult<Vec<bool>>;
    }
}

/// Tracing layer counting error-level events
#[derive(Clone, Default)]
pub struct ErrorCounter {
    count: Arc<AtomicUsize>,
}

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
