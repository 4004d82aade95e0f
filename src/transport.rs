use super::*;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// The asynchronous boundary to the context that can see the component
/// runtime.
///
/// Implementations never fail: a runtime that cannot be found, a peer that
/// went away or a caller that ran out of patience all resolve to
/// [`ComponentInfoResult::empty`] or a result carrying only `error`.
#[async_trait]
pub trait ComponentInfoTransport: Send + Sync {
    async fn request_component_info(&self, selector: &str) -> ComponentInfoResult;
}

/// Resolves `selector` on the page and walks the component tree of the
/// element it names. Shared by every execution context.
pub(crate) fn component_info_for_selector(
    page: &Page,
    selector: &str,
    config: &InspectorConfig,
) -> ComponentInfoResult {
    let node = match page.resolve_selector(selector) {
        Ok(node) => node,
        Err(err) => {
            tracing::debug!(selector, %err, "component info request for stale selector");
            return ComponentInfoResult::error(err.to_string());
        }
    };
    let adapter = match config.fiber_adapter(page.runtime()) {
        Ok(adapter) => adapter,
        Err(err) => return ComponentInfoResult::error(err.to_string()),
    };
    walk_component_tree(&adapter, page.dom(), node, &config.user_components)
}

/// Page-world transport: the walk runs directly against the shared page.
#[derive(Debug, Clone)]
pub struct InProcessTransport {
    page: SharedPage,
    config: Arc<InspectorConfig>,
}

impl InProcessTransport {
    pub fn new(page: SharedPage, config: Arc<InspectorConfig>) -> Self {
        Self { page, config }
    }
}

#[async_trait]
impl ComponentInfoTransport for InProcessTransport {
    async fn request_component_info(&self, selector: &str) -> ComponentInfoResult {
        match lock_page(&self.page) {
            Ok(page) => component_info_for_selector(&page, selector, &self.config),
            Err(err) => ComponentInfoResult::error(err.to_string()),
        }
    }
}

/// One request travelling to the privileged context. The reply is the
/// JSON-encoded [`ComponentInfoResult`].
#[derive(Debug)]
pub struct ComponentInfoRequest {
    pub selector: String,
    pub reply: oneshot::Sender<String>,
}

/// Client half of the message-passing boundary.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::Sender<ComponentInfoRequest>,
    patience: Option<Duration>,
}

impl ChannelTransport {
    pub fn new(sender: mpsc::Sender<ComponentInfoRequest>, config: &InspectorConfig) -> Self {
        Self {
            sender,
            patience: config.request_timeout_ms.map(Duration::from_millis),
        }
    }

    async fn exchange(&self, selector: &str) -> ComponentInfoResult {
        let (reply, response) = oneshot::channel();
        let request = ComponentInfoRequest {
            selector: selector.to_string(),
            reply,
        };
        if self.sender.send(request).await.is_err() {
            tracing::warn!(selector, "component info service is gone");
            return ComponentInfoResult::empty();
        }
        let payload = match response.await {
            Ok(payload) => payload,
            Err(_) => {
                tracing::warn!(selector, "component info request dropped without a reply");
                return ComponentInfoResult::empty();
            }
        };
        serde_json::from_str(&payload).unwrap_or_else(|err| {
            tracing::warn!(selector, %err, "malformed component info payload");
            ComponentInfoResult::empty()
        })
    }
}

#[async_trait]
impl ComponentInfoTransport for ChannelTransport {
    async fn request_component_info(&self, selector: &str) -> ComponentInfoResult {
        match self.patience {
            Some(patience) => tokio::time::timeout(patience, self.exchange(selector))
                .await
                .unwrap_or_else(|_| {
                    tracing::debug!(selector, ?patience, "component info request timed out");
                    ComponentInfoResult::empty()
                }),
            None => self.exchange(selector).await,
        }
    }
}

/// Privileged-context half: answers [`ComponentInfoRequest`]s against the
/// shared page.
#[derive(Debug)]
pub struct ComponentInfoService {
    page: SharedPage,
    config: Arc<InspectorConfig>,
    receiver: mpsc::Receiver<ComponentInfoRequest>,
}

impl ComponentInfoService {
    /// Creates a connected transport/service pair.
    pub fn channel(
        page: SharedPage,
        config: Arc<InspectorConfig>,
        capacity: usize,
    ) -> (ChannelTransport, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let transport = ChannelTransport::new(sender, &config);
        let service = Self {
            page,
            config,
            receiver,
        };
        (transport, service)
    }

    /// Answers requests until every transport handle is dropped.
    pub async fn run(mut self) {
        while let Some(request) = self.receiver.recv().await {
            self.handle(request);
        }
        tracing::debug!("component info service stopped");
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Takes the next request without answering it.
    pub async fn next_request(&mut self) -> Option<ComponentInfoRequest> {
        self.receiver.recv().await
    }

    pub fn handle(&self, request: ComponentInfoRequest) {
        let result = match lock_page(&self.page) {
            Ok(page) => component_info_for_selector(&page, &request.selector, &self.config),
            Err(err) => ComponentInfoResult::error(err.to_string()),
        };
        match serde_json::to_string(&result) {
            Ok(payload) => {
                if request.reply.send(payload).is_err() {
                    tracing::debug!(selector = %request.selector, "requester went away");
                }
            }
            Err(err) => {
                tracing::warn!(selector = %request.selector, %err, "cannot encode component info");
            }
        }
    }
}
