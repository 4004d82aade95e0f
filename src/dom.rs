use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
    // Own property keys a rendering runtime attached to this node.
    pub(crate) expandos: Vec<(String, InstanceId)>,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: Vec<(String, String)>,
}

impl Element {
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(pos).1)
    }

    pub(crate) fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|value| value.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-backed document tree.
///
/// Nodes are never freed; detaching a node only clears its parent link, so a
/// `NodeId` handed out earlier stays valid (and reports as disconnected).
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
            expandos: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
            expandos: Vec::new(),
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        let element = Element {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self.attr(id, "id").filter(|value| !value.is_empty()) {
            self.id_index.entry(id_attr).or_insert(id);
        }
        id
    }

    pub fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        let element = Element {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: Vec::new(),
        };
        self.create_node(None, NodeType::Element(element))
    }

    pub fn create_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text.to_string()))
    }

    pub(crate) fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(node_id.0)
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.node(node_id)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some()
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.node(node_id)?.parent
    }

    /// Parent, but only when it is an element (`parentElement`).
    pub fn parent_element(&self, node_id: NodeId) -> Option<NodeId> {
        self.parent(node_id).filter(|parent| self.is_element(*parent))
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.node(node_id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub fn is_connected(&self, node_id: NodeId) -> bool {
        node_id == self.root || self.is_descendant_of(node_id, self.root)
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// The first `<body>` element in document order.
    pub fn body(&self) -> Option<NodeId> {
        let mut elements = Vec::new();
        self.collect_elements_dfs(self.root, &mut elements);
        elements
            .into_iter()
            .find(|node| self.tag_name(*node) == Some("body"))
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attr(name))
            .map(ToOwned::to_owned)
    }

    pub fn attrs(&self, node_id: NodeId) -> &[(String, String)] {
        self.element(node_id)
            .map(|e| e.attrs.as_slice())
            .unwrap_or(&[])
    }

    pub fn classes(&self, node_id: NodeId) -> Vec<String> {
        self.element(node_id)
            .map(|e| e.classes().into_iter().map(ToOwned::to_owned).collect())
            .unwrap_or_default()
    }

    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("setAttribute target".into()))?;
        element.set_attr(&lowered, value);
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("removeAttribute target".into()))?;
        element.remove_attr(&lowered);
        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    /// Unlinks `node_id` from its parent. The node and its subtree stay
    /// addressable but are no longer connected to the document.
    pub fn detach(&mut self, node_id: NodeId) {
        let Some(parent) = self.parent(node_id) else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != node_id);
        self.nodes[node_id.0].parent = None;
        self.rebuild_id_index();
    }

    pub(crate) fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut elements = Vec::new();
        self.collect_elements_dfs(self.root, &mut elements);
        for node in elements {
            if let Some(id) = self.attr(node, "id").filter(|id| !id.is_empty()) {
                next.entry(id).or_insert(node);
            }
        }
        self.id_index = next;
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if self.is_element(node_id) {
            out.push(node_id);
        }
        for child in self.children(node_id) {
            stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
                self.collect_elements_dfs(*child, out)
            });
        }
    }

    pub fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    /// 1-based position of `node_id` among same-tag element siblings, and the
    /// number of such siblings. `None` for detached nodes.
    pub(crate) fn same_tag_position(&self, node_id: NodeId) -> Option<(usize, usize)> {
        let parent = self.parent(node_id)?;
        let tag_name = self.tag_name(node_id)?;
        let mut index = 0usize;
        let mut target = None;
        for child in self.children(parent) {
            let Some(element) = self.element(*child) else {
                continue;
            };
            if element.tag_name != tag_name {
                continue;
            }
            index += 1;
            if *child == node_id {
                target = Some(index);
            }
        }
        target.map(|position| (position, index))
    }

    /// 0-based index among the parent's element children.
    pub(crate) fn element_index(&self, node_id: NodeId) -> Option<usize> {
        let parent = self.parent(node_id)?;
        self.children(parent)
            .iter()
            .filter(|child| self.is_element(**child))
            .position(|child| *child == node_id)
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
            self.write_text_content(node_id, &mut out)
        });
        out
    }

    fn write_text_content(&self, node_id: NodeId, out: &mut String) {
        let Some(node) = self.node(node_id) else {
            return;
        };
        match &node.node_type {
            NodeType::Text(text) => out.push_str(text),
            NodeType::Document | NodeType::Element(_) => {
                for child in &node.children {
                    stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
                        self.write_text_content(*child, out)
                    });
                }
            }
        }
    }

    pub fn inner_html(&self, node_id: NodeId) -> Result<String> {
        if !self.is_element(node_id) {
            return Err(Error::NotAnElement("innerHTML target".into()));
        }
        let mut out = String::new();
        for child in self.children(node_id) {
            self.dump_node(*child, &mut out);
        }
        Ok(out)
    }

    pub(crate) fn dump_node(&self, node_id: NodeId, out: &mut String) {
        let Some(node) = self.node(node_id) else {
            return;
        };
        match &node.node_type {
            NodeType::Document => {
                for child in &node.children {
                    self.dump_node(*child, out);
                }
            }
            NodeType::Text(text) => {
                let raw_parent = self
                    .parent(node_id)
                    .and_then(|parent| self.tag_name(parent))
                    .is_some_and(|tag| matches!(tag, "script" | "style"));
                if raw_parent {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeType::Element(element) => {
                out.push('<');
                out.push_str(&element.tag_name);
                for (k, v) in &element.attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(v));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&element.tag_name) {
                    return;
                }
                for child in &node.children {
                    stacker::maybe_grow(64 * 1024, 1024 * 1024, || self.dump_node(*child, out));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
            }
        }
    }

    pub fn style_get(&self, node_id: NodeId, name: &str) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::NotAnElement("style target".into()))?;
        let name = name.to_ascii_lowercase();
        let decls = parse_style_declarations(element.attr("style"));
        Ok(decls
            .into_iter()
            .find(|(prop, _)| prop == &name)
            .map(|(_, value)| value)
            .unwrap_or_default())
    }

    pub fn style_set(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("style target".into()))?;

        let mut decls = parse_style_declarations(element.attr("style"));
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == &name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name, value.to_string()));
        }

        if decls.is_empty() {
            // Keep an empty style attribute to match CSSStyleDeclaration behavior.
            element.set_attr("style", "");
        } else {
            element.set_attr("style", &serialize_style_declarations(&decls));
        }
        Ok(())
    }

    pub(crate) fn set_expando(&mut self, node_id: NodeId, key: &str, instance: InstanceId) {
        let Some(node) = self.nodes.get_mut(node_id.0) else {
            return;
        };
        if let Some(slot) = node.expandos.iter_mut().find(|(existing, _)| existing == key) {
            slot.1 = instance;
        } else {
            node.expandos.push((key.to_string(), instance));
        }
    }

    /// Own enumerable property keys of the node object, in insertion order.
    pub fn own_keys(&self, node_id: NodeId) -> Vec<&str> {
        self.node(node_id)
            .map(|node| node.expandos.iter().map(|(key, _)| key.as_str()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn expando(&self, node_id: NodeId, key: &str) -> Option<InstanceId> {
        self.node(node_id)?
            .expandos
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, instance)| *instance)
    }
}

pub(crate) fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for decl in style_attr.split(';') {
        let decl = decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }

    out
}

pub(crate) fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
