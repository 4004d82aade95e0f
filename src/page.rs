use super::*;

pub type SharedPage = Arc<Mutex<Page>>;

const HIGHLIGHT_MARKER_ATTR: &str = "data-inspector-highlight";
const HIGHLIGHT_OUTLINE: &str = "2px solid rgb(59, 130, 246)";
const HIGHLIGHT_OUTLINE_OFFSET: &str = "2px";
const DEFAULT_LINK_SUFFIX: &str = "k3x9q0a1";

/// Locks a shared page, turning a poisoned lock into
/// [`Error::PageUnavailable`].
pub fn lock_page(page: &SharedPage) -> Result<MutexGuard<'_, Page>> {
    page.lock()
        .map_err(|err| Error::PageUnavailable(format!("page lock poisoned: {err}")))
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveHighlight {
    original_style: Option<String>,
    timer_id: i64,
}

/// A loaded document together with the component runtime that rendered it.
///
/// The page is the inspector's only view of the world: the DOM tree, the
/// instance links its nodes carry, a virtual clock for the selection
/// highlight, and the node an outside tool has marked as inspected.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    runtime: ComponentRuntime,
    pub(crate) scheduler: timers::SchedulerState,
    trace_state: TraceState,
    inspected: Option<NodeId>,
    highlights: HashMap<NodeId, ActiveHighlight>,
    highlight_ms: i64,
    link_suffix: String,
}

impl Default for Page {
    fn default() -> Self {
        Self::from_dom(Dom::new())
    }
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self::from_dom(html::parse_html(html)?))
    }

    pub fn from_dom(dom: Dom) -> Self {
        Self {
            dom,
            runtime: ComponentRuntime::new(),
            scheduler: timers::SchedulerState::default(),
            trace_state: TraceState::default(),
            inspected: None,
            highlights: HashMap::new(),
            highlight_ms: InspectorConfig::default().highlight_ms,
            link_suffix: DEFAULT_LINK_SUFFIX.to_string(),
        }
    }

    pub fn into_shared(self) -> SharedPage {
        Arc::new(Mutex::new(self))
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn runtime(&self) -> &ComponentRuntime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut ComponentRuntime {
        &mut self.runtime
    }

    pub fn set_highlight_ms(&mut self, highlight_ms: i64) {
        self.highlight_ms = highlight_ms.max(0);
    }

    /// Links `node` to `instance` the way the runtime does, through an own
    /// key `__reactFiber$<suffix>`.
    pub fn link_instance(&mut self, node: NodeId, instance: InstanceId) {
        let key = format!("__reactFiber${}", self.link_suffix);
        self.dom.set_expando(node, &key, instance);
    }

    /// Stores `instance` under an arbitrary own key of `node`.
    pub fn set_instance_key(&mut self, node: NodeId, key: &str, instance: InstanceId) {
        self.dom.set_expando(node, key, instance);
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    /// The first element matching `selector`, or
    /// [`Error::SelectorNotFound`].
    pub fn resolve_selector(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    /// Whether a previously synthesized selector no longer leads back to
    /// `node` (it matches nothing, something else, or no longer parses).
    pub fn is_stale(&self, selector: &str, node: NodeId) -> bool {
        !matches!(self.dom.query_selector(selector), Ok(Some(found)) if found == node)
    }

    pub fn set_inspected_node(&mut self, node: Option<NodeId>) {
        self.inspected = node;
    }

    pub fn inspected_node(&self) -> Option<NodeId> {
        self.inspected
    }

    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.highlights.contains_key(&node)
    }

    /// Outlines `node` and schedules the revert on the virtual clock.
    ///
    /// Highlighting an already highlighted node keeps its original inline
    /// style and restarts the countdown.
    pub fn highlight(&mut self, node: NodeId) -> Result<i64> {
        if !self.dom.is_element(node) {
            return Err(Error::NotAnElement("highlight target".into()));
        }

        let original_style = match self.highlights.remove(&node) {
            Some(active) => {
                self.clear_timeout(active.timer_id);
                active.original_style
            }
            None => self.dom.attr(node, "style"),
        };

        self.dom.style_set(node, "outline", HIGHLIGHT_OUTLINE)?;
        self.dom
            .style_set(node, "outline-offset", HIGHLIGHT_OUTLINE_OFFSET)?;
        self.dom.set_attr(node, HIGHLIGHT_MARKER_ATTR, "")?;

        let timer_id =
            self.schedule_timeout(self.highlight_ms, timers::TimerAction::RevertHighlight(node));
        self.highlights.insert(
            node,
            ActiveHighlight {
                original_style,
                timer_id,
            },
        );
        self.trace_line(format!(
            "[inspect] highlight node={} revert_in_ms={}",
            node.0, self.highlight_ms
        ));
        Ok(timer_id)
    }

    /// Runs `read` against the DOM as it looks without any active highlight,
    /// then puts the outlines back. Timers are left untouched.
    pub(crate) fn read_unhighlighted<R>(&mut self, read: impl FnOnce(&Dom) -> R) -> Result<R> {
        let lifted = self
            .highlights
            .iter()
            .map(|(node, active)| (*node, active.original_style.clone()))
            .collect::<Vec<_>>();

        let mut outlined = Vec::with_capacity(lifted.len());
        for (node, original_style) in lifted {
            outlined.push((node, self.dom.attr(node, "style")));
            self.restore_style(node, original_style.as_deref())?;
            self.dom.remove_attr(node, HIGHLIGHT_MARKER_ATTR)?;
        }

        let result = read(&self.dom);

        for (node, style) in outlined {
            self.restore_style(node, style.as_deref())?;
            self.dom.set_attr(node, HIGHLIGHT_MARKER_ATTR, "")?;
        }
        Ok(result)
    }

    fn restore_style(&mut self, node: NodeId, style: Option<&str>) -> Result<()> {
        match style {
            Some(style) => self.dom.set_attr(node, "style", style),
            None => self.dom.remove_attr(node, "style"),
        }
    }

    pub(crate) fn revert_highlight(&mut self, node: NodeId) -> Result<()> {
        let Some(active) = self.highlights.remove(&node) else {
            return Ok(());
        };
        self.restore_style(node, active.original_style.as_deref())?;
        self.dom.remove_attr(node, HIGHLIGHT_MARKER_ATTR)?;
        self.trace_line(format!("[inspect] highlight reverted node={}", node.0));
        Ok(())
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_log_limit(&mut self, limit: usize) {
        self.trace_state.log_limit = limit.max(1);
        while self.trace_state.logs.len() > self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if self.trace_state.enabled {
            tracing::debug!(target: "element_inspector::trace", "{line}");
            if self.trace_state.logs.len() >= self.trace_state.log_limit {
                self.trace_state.logs.pop_front();
            }
            self.trace_state.logs.push_back(line);
        }
    }
}
