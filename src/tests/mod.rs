use super::*;

mod component_tree_walk;
mod page_highlight_and_trace;

/// Builds a page whose nodes are linked into a fresh `return` chain
/// (innermost first) and returns the page with the linked node.
fn page_with_chain(html: &str, selector: &str, chain: Vec<InstanceType>) -> Result<(Page, NodeId)> {
    let mut page = Page::from_html(html)?;
    let node = page.resolve_selector(selector)?;
    if let Some(innermost) = page.runtime_mut().create_chain(chain) {
        page.link_instance(node, innermost);
    }
    Ok((page, node))
}

fn names(chain: &[&str]) -> Vec<InstanceType> {
    chain
        .iter()
        .map(|name| {
            if name.chars().next().is_some_and(char::is_lowercase) {
                InstanceType::host(name)
            } else {
                InstanceType::function(name)
            }
        })
        .collect()
}
