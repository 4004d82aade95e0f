use super::*;
use serde_json::{Map, Value};

/// One user component in the component stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentFrame {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DebugSource>,
}

/// Outcome of a component-tree walk, as it crosses the context boundary.
///
/// The default value is the empty result: no runtime, no components, no
/// error. Transport failures resolve to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentInfoResult {
    pub has_component_runtime: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub component_hierarchy: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub full_component_tree: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub component_stack: Vec<ComponentFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentInfoResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Whether `name` looks like an authored component rather than a host
/// element or library internal.
///
/// This is a naming convention, not a structural fact; `rules` can override
/// it in either direction.
pub fn is_user_component(name: &str, rules: &UserComponentRules) -> bool {
    if rules.deny.iter().any(|denied| denied == name) {
        return false;
    }
    if rules.allow.iter().any(|allowed| allowed == name) {
        return true;
    }
    name.chars().next().is_some_and(char::is_uppercase)
}

fn is_discarded_name(name: &str) -> bool {
    name.is_empty() || name.starts_with('_') || name == "Fragment"
}

/// Recovers the component chain that rendered `node`.
///
/// The instance link is looked up on the node and then on up to
/// [`HANDLE_SEARCH_DEPTH`] ancestors. Reflection failures never escape: a
/// hop that cannot be named is skipped, and a broken `return` link ends the
/// walk with whatever was gathered.
pub fn walk_component_tree(
    adapter: &dyn RuntimeAdapter,
    dom: &Dom,
    node: NodeId,
    rules: &UserComponentRules,
) -> ComponentInfoResult {
    let mut handle = None;
    let mut cursor = Some(node);
    for _ in 0..=HANDLE_SEARCH_DEPTH {
        let Some(current) = cursor else {
            break;
        };
        handle = adapter.locate_instance_handle(dom, current);
        if handle.is_some() {
            break;
        }
        cursor = dom.parent_element(current);
    }

    let Some(handle) = handle else {
        tracing::debug!(node = node.0, "no component runtime detected");
        return ComponentInfoResult::empty();
    };

    let walk = adapter.walk_ancestors(handle, COMPONENT_HOP_LIMIT);
    if let Some(err) = &walk.interrupted {
        tracing::debug!(node = node.0, hops = walk.hops.len(), %err, "component walk cut short");
    }

    let mut result = ComponentInfoResult {
        has_component_runtime: true,
        ..ComponentInfoResult::default()
    };
    let mut primary_found = false;

    for (index, hop) in walk.hops.iter().enumerate() {
        let name = match &hop.name {
            Ok(name) => name.as_str(),
            Err(err) => {
                tracing::trace!(hop = index, %err, "skipping unnamed hop");
                continue;
            }
        };
        if is_discarded_name(name) {
            continue;
        }
        result.full_component_tree.push(name.to_string());

        if !is_user_component(name, rules) {
            continue;
        }
        result.component_hierarchy.push(name.to_string());
        if result.component_stack.len() < COMPONENT_STACK_LIMIT {
            result.component_stack.push(ComponentFrame {
                name: name.to_string(),
                source: hop.source.clone(),
            });
        }

        if !primary_found {
            primary_found = true;
            result.component_name = Some(name.to_string());
            if let Some(source) = &hop.source {
                result.source_file = Some(source.file_name.clone());
                result.source_line = Some(source.line_number);
                result.source_column = source.column_number;
            }
            if index < PROPS_HOP_LIMIT {
                result.props = sanitize_props(&hop.props);
            }
        }
    }

    result
}
