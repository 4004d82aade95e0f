use super::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Builds the DOM-derived part of a descriptor from one consistent snapshot.
/// Component fields are left absent.
pub(crate) fn snapshot_descriptor(
    dom: &Dom,
    node: NodeId,
    config: &InspectorConfig,
) -> Result<ElementDescriptor> {
    let Some(tag) = dom.tag_name(node) else {
        return Err(Error::NotAnElement(format!("node {}", node.0)));
    };

    let classes = dom.classes(node);
    let chain = parent_chain(dom, node, config);
    Ok(ElementDescriptor {
        selector: synthesize_selector(dom, node, config),
        dom_path: dom_path(dom, node, config),
        tag: tag.to_ascii_lowercase(),
        text: text_snapshot(dom, node),
        inner_html: sampler::inner_html_snapshot(dom, node),
        test_id: config.test_id_of(dom, node).map(|(_, value)| value),
        all_classes: (!classes.is_empty()).then_some(classes),
        all_attributes: sample_attributes(dom, node, config),
        computed_styles: sample_computed_styles(dom, node),
        parent_chain: (!chain.is_empty()).then_some(chain),
        sibling_index: dom.element_index(node).unwrap_or(0),
        child_count: dom.child_elements(node).len(),
        has_component_runtime: false,
        component_name: None,
        component_hierarchy: None,
        full_component_tree: None,
        component_stack: None,
        source_file: None,
        source_line: None,
        source_column: None,
        props: None,
    })
}

/// Assembles the full descriptor for `node`.
///
/// The DOM walks run under one page lock; the lock is released before the
/// component request is awaited. Whatever the transport returns, including
/// the empty result, the descriptor comes back fully formed. The only
/// errors are a node that is not an element and an unusable page.
pub async fn assemble_descriptor<T>(
    page: &SharedPage,
    node: NodeId,
    transport: &T,
    config: &InspectorConfig,
) -> Result<ElementDescriptor>
where
    T: ComponentInfoTransport + ?Sized,
{
    let mut descriptor = {
        let mut page = lock_page(page)?;
        page.read_unhighlighted(|dom| snapshot_descriptor(dom, node, config))??
    };
    let info = transport.request_component_info(&descriptor.selector).await;
    descriptor.merge_component_info(info);
    Ok(descriptor)
}

/// Selection session: one page, one transport, one current descriptor.
///
/// Every accepted [`select`](Self::select) takes a fresh request token. When a
/// response arrives after a newer selection started, it is discarded rather
/// than published.
#[derive(Debug)]
pub struct Inspector<T> {
    page: SharedPage,
    transport: T,
    config: Arc<InspectorConfig>,
    active_token: AtomicU64,
    current: Mutex<Option<ElementDescriptor>>,
}

impl<T: ComponentInfoTransport> Inspector<T> {
    pub fn new(page: SharedPage, transport: T, config: Arc<InspectorConfig>) -> Result<Self> {
        config.validate()?;
        lock_page(&page)?.set_highlight_ms(config.highlight_ms);
        Ok(Self {
            page,
            transport,
            config,
            active_token: AtomicU64::new(0),
            current: Mutex::new(None),
        })
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Inspects `node`, highlights it, and publishes the descriptor as the
    /// current selection. `Ok(None)` means a newer selection superseded this
    /// one while its component request was in flight.
    pub async fn select(&self, node: NodeId) -> Result<Option<ElementDescriptor>> {
        let (token, mut descriptor) = {
            let mut page = lock_page(&self.page)?;
            let descriptor =
                page.read_unhighlighted(|dom| snapshot_descriptor(dom, node, &self.config))??;
            let token = self.active_token.fetch_add(1, Ordering::SeqCst) + 1;
            page.highlight(node)?;
            page.trace_line(format!(
                "[inspect] select token={token} node={} selector={}",
                node.0, descriptor.selector
            ));
            (token, descriptor)
        };

        let info = self
            .transport
            .request_component_info(&descriptor.selector)
            .await;

        if self.active_token.load(Ordering::SeqCst) != token {
            if let Ok(mut page) = lock_page(&self.page) {
                page.trace_line(format!("[component] discard stale token={token}"));
            }
            return Ok(None);
        }

        descriptor.merge_component_info(info);
        if let Ok(mut page) = lock_page(&self.page) {
            page.trace_line(format!(
                "[component] apply token={token} runtime={} component={}",
                descriptor.has_component_runtime,
                descriptor.component_name.as_deref().unwrap_or("-")
            ));
        }
        let mut current = self
            .current
            .lock()
            .map_err(|err| Error::PageUnavailable(format!("selection lock poisoned: {err}")))?;
        *current = Some(descriptor.clone());
        Ok(Some(descriptor))
    }

    /// Inspects the node an outside tool marked as inspected, if any.
    pub async fn select_inspected(&self) -> Result<Option<ElementDescriptor>> {
        let inspected = lock_page(&self.page)?.inspected_node();
        match inspected {
            Some(node) => self.select(node).await,
            None => Ok(None),
        }
    }

    /// The most recently published selection.
    pub fn current(&self) -> Option<ElementDescriptor> {
        self.current
            .lock()
            .ok()
            .and_then(|current| current.clone())
    }
}
