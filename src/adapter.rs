use super::*;

/// Opaque reference to a runtime instance found on a DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle(pub InstanceId);

/// One step of the instance `return` chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Hop {
    pub name: std::result::Result<String, ReflectError>,
    pub source: Option<DebugSource>,
    pub props: PropsRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HopWalk {
    pub hops: Vec<Hop>,
    /// Set when a link could not be followed; `hops` holds what was read
    /// before that point.
    pub interrupted: Option<ReflectError>,
}

/// Capability to reflect on one runtime's private instance tree.
///
/// The walker, classifier and sanitizer never look at runtime internals
/// directly, so supporting another runtime shape means another adapter.
pub trait RuntimeAdapter {
    /// Looks for an instance link among the node's own keys. Only the given
    /// node is inspected; ancestor retries are the caller's job.
    fn locate_instance_handle(&self, dom: &Dom, node: NodeId) -> Option<Handle>;

    /// Follows `return` links from `handle`, reading at most `max_hops`
    /// instances.
    fn walk_ancestors(&self, handle: Handle, max_hops: usize) -> HopWalk;
}

/// Adapter for the fiber-shaped runtime: instances are linked to DOM nodes
/// through an own key such as `__reactFiber$<suffix>`.
#[derive(Debug, Clone)]
pub struct FiberAdapter<'a> {
    runtime: &'a ComponentRuntime,
    key_pattern: fancy_regex::Regex,
}

pub(crate) const DEFAULT_INSTANCE_KEY_PATTERN: &str = r"^__react(?:Fiber|InternalInstance)\$";

impl<'a> FiberAdapter<'a> {
    pub fn new(runtime: &'a ComponentRuntime) -> Result<Self> {
        Self::with_key_pattern(runtime, DEFAULT_INSTANCE_KEY_PATTERN)
    }

    pub fn with_key_pattern(runtime: &'a ComponentRuntime, pattern: &str) -> Result<Self> {
        let key_pattern = fancy_regex::Regex::new(pattern)
            .map_err(|err| Error::Config(format!("invalid instance key pattern {pattern:?}: {err}")))?;
        Ok(Self {
            runtime,
            key_pattern,
        })
    }

    fn is_instance_key(&self, key: &str) -> bool {
        // A regex runtime failure (backtrack limit) counts as "not a link".
        self.key_pattern.is_match(key).unwrap_or(false)
    }

    fn read_hop(&self, id: InstanceId) -> std::result::Result<Hop, ReflectError> {
        let instance = self.runtime.instance(id)?;
        Ok(Hop {
            name: instance.instance_type.display_name(),
            source: instance.debug_source.clone(),
            props: instance.props.clone(),
        })
    }
}

impl RuntimeAdapter for FiberAdapter<'_> {
    fn locate_instance_handle(&self, dom: &Dom, node: NodeId) -> Option<Handle> {
        dom.own_keys(node)
            .into_iter()
            .find(|key| self.is_instance_key(key))
            .and_then(|key| dom.expando(node, key))
            .map(Handle)
    }

    fn walk_ancestors(&self, handle: Handle, max_hops: usize) -> HopWalk {
        let mut walk = HopWalk::default();
        let mut cursor = Some(handle.0);
        while let Some(id) = cursor {
            if walk.hops.len() >= max_hops {
                break;
            }
            match self.read_hop(id) {
                Ok(hop) => walk.hops.push(hop),
                Err(err) => {
                    walk.interrupted = Some(err);
                    break;
                }
            }
            match self.runtime.return_of(id) {
                Ok(next) => cursor = next,
                Err(err) => {
                    walk.interrupted = Some(err);
                    break;
                }
            }
        }
        walk
    }
}
