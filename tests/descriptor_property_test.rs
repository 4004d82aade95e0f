use element_inspector::{
    DOM_PATH_DEPTH, Dom, InspectorConfig, NodeId, PARENT_CHAIN_DEPTH, PROP_STRING_LIMIT, Page,
    PropValue, PropsRecord, dom_path, parent_chain, sanitize_props, sanitize_value,
    synthesize_selector,
};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};

const DESCRIPTOR_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/descriptor_property_test.txt";
const DEFAULT_DESCRIPTOR_PROPTEST_CASES: u32 = 128;

const TAGS: &[&str] = &["div", "section", "span", "li", "p"];

#[derive(Clone, Debug)]
struct Level {
    tag: usize,
    siblings: usize,
    chosen: usize,
    class_name: Option<String>,
}

fn descriptor_proptest_cases() -> u32 {
    std::env::var("ELEMENT_INSPECTOR_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_DESCRIPTOR_PROPTEST_CASES)
}

fn level_strategy() -> BoxedStrategy<Level> {
    (
        0..TAGS.len(),
        1usize..=4,
        0usize..4,
        proptest::option::of("[a-z]{1,6}"),
    )
        .prop_map(|(tag, siblings, chosen, class_name)| Level {
            tag,
            siblings,
            chosen: chosen % siblings,
            class_name,
        })
        .boxed()
}

fn levels_strategy() -> BoxedStrategy<Vec<Level>> {
    vec(level_strategy(), 1..=40).boxed()
}

/// Builds `<body>` and then one row of same-tag siblings per level, always
/// descending into the chosen one. Returns the dom, the body and the
/// innermost chosen node.
fn build_tree(levels: &[Level]) -> (Dom, NodeId, NodeId) {
    let mut dom = Dom::new();
    let root = dom.root();
    let html = dom.create_element(root, "html", Vec::new());
    let body = dom.create_element(html, "body", Vec::new());

    let mut parent = body;
    for level in levels {
        let mut chosen = parent;
        for index in 0..level.siblings {
            let attrs = level
                .class_name
                .iter()
                .map(|class_name| ("class".to_string(), class_name.clone()))
                .collect();
            let node = dom.create_element(parent, TAGS[level.tag], attrs);
            if index == level.chosen {
                chosen = node;
            }
        }
        parent = chosen;
    }
    (dom, body, parent)
}

fn assert_bounds_hold(levels: &[Level]) -> TestCaseResult {
    let (dom, body, target) = build_tree(levels);
    let config = InspectorConfig::default();

    let path = dom_path(&dom, target, &config);
    let segments = path.split(" > ").collect::<Vec<_>>();
    prop_assert!(segments.len() <= DOM_PATH_DEPTH, "path too long: {path}");
    prop_assert_eq!(segments.len(), levels.len().min(DOM_PATH_DEPTH));
    prop_assert!(
        segments.iter().all(|segment| !segment.starts_with("body")),
        "path crosses body: {path}"
    );

    let chain = parent_chain(&dom, target, &config);
    prop_assert!(chain.len() <= PARENT_CHAIN_DEPTH);
    prop_assert_eq!(chain.len(), (levels.len() - 1).min(PARENT_CHAIN_DEPTH));
    prop_assert!(chain.iter().all(|summary| summary.tag != "body"));

    let last = levels.last().expect("at least one level");
    let leaf = segments.last().copied().unwrap_or_default();
    let suffix = format!(":nth-of-type({})", last.chosen + 1);
    if last.siblings > 1 {
        prop_assert!(leaf.ends_with(&suffix), "missing {suffix} on {leaf}");
    } else {
        prop_assert!(!leaf.contains(":nth-of-type"), "unexpected position on {leaf}");
    }

    let selector = synthesize_selector(&dom, target, &config);
    prop_assert!(selector.split(" > ").all(|step| !step.starts_with("body")));
    prop_assert!(dom.query_selector(&selector).is_ok());
    prop_assert!(dom.is_descendant_of(target, body));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: descriptor_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(DESCRIPTOR_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn path_and_chain_stay_within_bounds(levels in levels_strategy()) {
        assert_bounds_hold(&levels)?;
    }

    #[test]
    fn identified_elements_are_selected_by_id(id in "[a-z][a-z0-9_-]{0,12}", depth in 0usize..6) {
        let mut html = String::from("<body>");
        html.push_str(&"<div>".repeat(depth));
        html.push_str(&format!("<span id=\"{id}\">x</span>"));
        html.push_str(&"</div>".repeat(depth));
        html.push_str("</body>");
        let page = Page::from_html(&html)
            .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;
        let span = page
            .resolve_selector("span")
            .map_err(|err| TestCaseError::fail(format!("{err:?}")))?;

        let selector = synthesize_selector(page.dom(), span, &InspectorConfig::default());
        prop_assert_eq!(&selector, &format!("#{id}"));
        prop_assert!(!page.is_stale(&selector, span));
    }

    #[test]
    fn string_props_are_cut_deterministically(text in "\\PC{0,160}") {
        let expected = if text.chars().count() > PROP_STRING_LIMIT {
            format!("{}...", text.chars().take(PROP_STRING_LIMIT).collect::<String>())
        } else {
            text.clone()
        };
        let value = PropValue::String(text.clone());
        prop_assert_eq!(sanitize_value(&value), Some(serde_json::Value::String(expected)));

        let record = PropsRecord::Record(vec![
            ("label".to_string(), value),
            ("onClick".to_string(), PropValue::Function(None)),
        ]);
        let first = sanitize_props(&record);
        prop_assert_eq!(&first, &sanitize_props(&record));
        let on_click = first.as_ref().and_then(|props| props.get("onClick").cloned());
        prop_assert_eq!(on_click, Some(serde_json::json!("[Function]")));
    }
}
