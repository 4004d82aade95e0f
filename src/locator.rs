use super::*;

/// Builds a selector meant to re-resolve to `node`.
///
/// Priority: `#id`, then a test-id attribute selector, then a `>`-joined
/// chain of `tag:nth-of-type(k)` steps walking up until an ancestor with an
/// id (which anchors the chain) or `<body>`. Uniqueness is not verified
/// against the document; structurally identical subtrees can collide.
pub fn synthesize_selector(dom: &Dom, node: NodeId, config: &InspectorConfig) -> String {
    if let Some(id) = dom.attr(node, "id").filter(|id| !id.is_empty()) {
        return format!("#{id}");
    }
    if let Some((attr, value)) = config.test_id_of(dom, node) {
        return format!("[{attr}={}]", selector::quote_attr_value(&value));
    }

    let body = dom.body();
    let mut steps = Vec::new();
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if Some(current) == body {
            break;
        }
        let Some(tag) = dom.tag_name(current) else {
            break;
        };
        if current != node {
            if let Some(id) = dom.attr(current, "id").filter(|id| !id.is_empty()) {
                steps.push(format!("#{id}"));
                break;
            }
        }
        // A detached node has no siblings to disambiguate against.
        let Some((position, count)) = dom.same_tag_position(current) else {
            steps.push(tag.to_string());
            break;
        };
        if count > 1 {
            steps.push(format!("{tag}:nth-of-type({position})"));
        } else {
            steps.push(tag.to_string());
        }
        cursor = dom.parent_element(current);
    }

    if steps.is_empty() {
        return dom.tag_name(node).unwrap_or("*").to_string();
    }
    steps.reverse();
    steps.join(" > ")
}
