use super::*;

/// Readable path from the nearest ancestor below `<body>` down to `node`.
///
/// Each segment is the tag plus the most specific of id, test id, or up to
/// two classes, and an `:nth-of-type` suffix when the parent has several
/// children of that tag. At most [`DOM_PATH_DEPTH`] segments are produced.
pub fn dom_path(dom: &Dom, node: NodeId, config: &InspectorConfig) -> String {
    let body = dom.body();
    let mut segments = Vec::new();
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        if segments.len() >= DOM_PATH_DEPTH || Some(current) == body {
            break;
        }
        let Some(tag) = dom.tag_name(current) else {
            break;
        };

        let mut segment = tag.to_string();
        if let Some(id) = dom.attr(current, "id").filter(|id| !id.is_empty()) {
            segment.push('#');
            segment.push_str(&id);
        } else if let Some((attr, value)) = config.test_id_of(dom, current) {
            segment.push_str(&format!("[{attr}={}]", selector::quote_attr_value(&value)));
        } else {
            for class_name in dom.classes(current).iter().take(2) {
                segment.push('.');
                segment.push_str(class_name);
            }
        }
        if let Some((position, count)) = dom.same_tag_position(current) {
            if count > 1 {
                segment.push_str(&format!(":nth-of-type({position})"));
            }
        }

        segments.push(segment);
        cursor = dom.parent_element(current);
    }

    if segments.is_empty() {
        return dom.tag_name(node).unwrap_or_default().to_string();
    }
    segments.reverse();
    segments.join(" > ")
}

/// Structured summaries of up to [`PARENT_CHAIN_DEPTH`] ancestors, nearest
/// first, stopping before `<body>`.
pub fn parent_chain(dom: &Dom, node: NodeId, config: &InspectorConfig) -> Vec<ParentSummary> {
    let body = dom.body();
    let mut chain = Vec::new();
    let mut cursor = dom.parent_element(node);
    while let Some(current) = cursor {
        if chain.len() >= PARENT_CHAIN_DEPTH || Some(current) == body {
            break;
        }
        let Some(tag) = dom.tag_name(current) else {
            break;
        };
        let classes = dom.classes(current);
        chain.push(ParentSummary {
            tag: tag.to_string(),
            id: dom.attr(current, "id").filter(|id| !id.is_empty()),
            classes: (!classes.is_empty()).then_some(classes),
            test_id: config.test_id_of(dom, current).map(|(_, value)| value),
        });
        cursor = dom.parent_element(current);
    }
    chain
}
