use super::*;
use unicode_normalization::UnicodeNormalization;

const UNINFORMATIVE_STYLE_VALUES: &[&str] = &["none", "normal", "auto", "0px"];

// Attributes the rendering runtime writes for its own bookkeeping.
fn is_runtime_private_attr(name: &str) -> bool {
    name.starts_with("__react") || name == "data-reactroot" || name == "data-reactid"
}

/// Every attribute of the element except the inspector's own instrumentation
/// and runtime-private ones, values cut to [`ATTRIBUTE_VALUE_LIMIT`]
/// characters. `None` when nothing remains.
pub fn sample_attributes(
    dom: &Dom,
    node: NodeId,
    config: &InspectorConfig,
) -> Option<BTreeMap<String, String>> {
    let sampled = dom
        .attrs(node)
        .iter()
        .filter(|(name, _)| {
            !name.starts_with(&config.instrumentation_attr_prefix) && !is_runtime_private_attr(name)
        })
        .map(|(name, value)| (name.clone(), truncate_chars(value, ATTRIBUTE_VALUE_LIMIT)))
        .collect::<BTreeMap<_, _>>();
    (!sampled.is_empty()).then_some(sampled)
}

/// The allow-listed computed style properties whose values carry signal.
/// `None` when every sampled property holds an uninformative default.
pub fn sample_computed_styles(dom: &Dom, node: NodeId) -> Option<BTreeMap<String, String>> {
    let computed = dom.computed_style(node);
    let sampled = style::SAMPLED_STYLE_PROPERTIES
        .iter()
        .filter_map(|name| {
            computed
                .iter()
                .find(|(prop, _)| prop == name)
                .map(|(_, value)| (name.to_string(), value.clone()))
        })
        .filter(|(_, value)| {
            !value.is_empty() && !UNINFORMATIVE_STYLE_VALUES.contains(&value.as_str())
        })
        .collect::<BTreeMap<_, _>>();
    (!sampled.is_empty()).then_some(sampled)
}

/// Trimmed, NFC-normalized text content cut to [`TEXT_LIMIT`] characters.
pub fn text_snapshot(dom: &Dom, node: NodeId) -> String {
    let text = dom.text_content(node);
    let normalized = text.trim().nfc().collect::<String>();
    truncate_chars(&normalized, TEXT_LIMIT)
}

pub(crate) fn inner_html_snapshot(dom: &Dom, node: NodeId) -> String {
    dom.inner_html(node)
        .map(|html| truncate_chars(&html, INNER_HTML_LIMIT))
        .unwrap_or_default()
}
