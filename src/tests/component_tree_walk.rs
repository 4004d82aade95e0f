use super::*;

const TOOLBAR_HTML: &str = r#"<body><div id="toolbar"><div class="btn"><svg></svg></div></div></body>"#;

/// Links `node` to a fresh chain and returns the instance ids innermost
/// first.
fn link_chain(page: &mut Page, node: NodeId, types: Vec<InstanceType>) -> Vec<InstanceId> {
    let mut ids = Vec::new();
    let mut parent = None;
    for instance_type in types.into_iter().rev() {
        let id = page.runtime_mut().create(instance_type, parent);
        ids.push(id);
        parent = Some(id);
    }
    ids.reverse();
    if let Some(innermost) = ids.first() {
        page.link_instance(node, *innermost);
    }
    ids
}

fn walk(page: &Page, node: NodeId, rules: &UserComponentRules) -> Result<ComponentInfoResult> {
    let adapter = FiberAdapter::new(page.runtime())?;
    Ok(walk_component_tree(&adapter, page.dom(), node, rules))
}

fn source(file: &str, line: u32, column: Option<u32>) -> DebugSource {
    DebugSource {
        file_name: file.into(),
        line_number: line,
        column_number: column,
    }
}

#[test]
fn toolbar_chain_with_icon_denied() -> Result<()> {
    let (page, node) = page_with_chain(
        TOOLBAR_HTML,
        ".btn",
        names(&["div", "Icon", "Button", "Toolbar"]),
    )?;

    let info = walk(&page, node, &UserComponentRules::deny(&["Icon"]))?;
    assert!(info.has_component_runtime);
    assert_eq!(info.component_name.as_deref(), Some("Button"));
    assert_eq!(info.component_hierarchy, vec!["Button", "Toolbar"]);
    assert_eq!(info.full_component_tree, vec!["div", "Icon", "Button", "Toolbar"]);
    Ok(())
}

#[test]
fn upper_case_heuristic_alone_counts_icon_as_a_user_component() -> Result<()> {
    // The classification is a naming convention; without an override every
    // capitalized name is treated as authored.
    let (page, node) = page_with_chain(
        TOOLBAR_HTML,
        ".btn",
        names(&["div", "Icon", "Button", "Toolbar"]),
    )?;

    let info = walk(&page, node, &UserComponentRules::default())?;
    assert_eq!(info.component_name.as_deref(), Some("Icon"));
    assert_eq!(info.component_hierarchy, vec!["Icon", "Button", "Toolbar"]);
    Ok(())
}

#[test]
fn allow_and_deny_lists_override_the_heuristic() {
    let rules = UserComponentRules {
        allow: vec!["styledButton".into(), "Both".into()],
        deny: vec!["Both".into()],
    };

    assert!(is_user_component("styledButton", &rules));
    assert!(!is_user_component("Both", &rules));
    assert!(is_user_component("Card", &rules));
    assert!(!is_user_component("div", &rules));
    assert!(!is_user_component("", &rules));
    assert!(is_user_component("Élan", &rules));
}

#[test]
fn underscore_fragment_and_unnamed_hops_are_discarded() -> Result<()> {
    let (page, node) = page_with_chain(
        TOOLBAR_HTML,
        "svg",
        vec![
            InstanceType::host("svg"),
            InstanceType::Text,
            InstanceType::function("_InternalWrapper"),
            InstanceType::Fragment,
            InstanceType::Provider { display_name: None },
            InstanceType::Provider {
                display_name: Some("ThemeContext.Provider".into()),
            },
            InstanceType::function("App"),
            InstanceType::Root,
        ],
    )?;

    let info = walk(&page, node, &UserComponentRules::default())?;
    assert_eq!(
        info.full_component_tree,
        vec!["svg", "ThemeContext.Provider", "App"]
    );
    assert_eq!(info.component_name.as_deref(), Some("ThemeContext.Provider"));
    assert!(
        info.full_component_tree
            .iter()
            .all(|name| !name.starts_with('_') && name != "Fragment")
    );
    Ok(())
}

#[test]
fn wrapper_types_derive_their_display_names() -> Result<()> {
    let (page, node) = page_with_chain(
        TOOLBAR_HTML,
        "svg",
        vec![
            InstanceType::host("svg"),
            InstanceType::ForwardRef {
                render_name: "IconRender".into(),
                display_name: None,
            },
            InstanceType::Memo {
                inner: Box::new(InstanceType::function("MemoInner")),
                display_name: None,
            },
            InstanceType::Memo {
                inner: Box::new(InstanceType::function("Ignored")),
                display_name: Some("Pure(Card)".into()),
            },
            InstanceType::Class {
                name: "Panel".into(),
                display_name: Some("LegacyPanel".into()),
            },
        ],
    )?;

    let info = walk(&page, node, &UserComponentRules::default())?;
    assert_eq!(
        info.full_component_tree,
        vec!["svg", "IconRender", "MemoInner", "Pure(Card)", "LegacyPanel"]
    );
    Ok(())
}

#[test]
fn hop_walk_never_exceeds_the_hop_limit() -> Result<()> {
    let mut chain = vec![InstanceType::host("svg")];
    chain.extend((0..40).map(|index| InstanceType::function(&format!("Layer{index}"))));
    let (page, node) = page_with_chain(TOOLBAR_HTML, "svg", chain)?;

    let adapter = FiberAdapter::new(page.runtime())?;
    let handle = adapter
        .locate_instance_handle(page.dom(), node)
        .expect("svg is linked");
    let hop_walk = adapter.walk_ancestors(handle, COMPONENT_HOP_LIMIT);
    assert_eq!(hop_walk.hops.len(), COMPONENT_HOP_LIMIT);
    assert_eq!(hop_walk.interrupted, None);

    let info = walk_component_tree(&adapter, page.dom(), node, &UserComponentRules::default());
    assert_eq!(info.full_component_tree.len(), COMPONENT_HOP_LIMIT);
    assert_eq!(info.component_hierarchy.len(), COMPONENT_HOP_LIMIT - 1);
    assert_eq!(info.component_stack.len(), COMPONENT_STACK_LIMIT);
    assert_eq!(
        info.full_component_tree.last().map(String::as_str),
        Some("Layer28")
    );
    Ok(())
}

#[test]
fn throwing_name_is_skipped_and_the_walk_continues() -> Result<()> {
    let (page, node) = page_with_chain(
        TOOLBAR_HTML,
        "svg",
        vec![
            InstanceType::host("svg"),
            InstanceType::Throwing("type getter exploded".into()),
            InstanceType::function("Card"),
        ],
    )?;

    let info = walk(&page, node, &UserComponentRules::default())?;
    assert_eq!(info.full_component_tree, vec!["svg", "Card"]);
    assert_eq!(info.component_name.as_deref(), Some("Card"));
    assert_eq!(info.error, None);
    Ok(())
}

#[test]
fn throwing_return_link_keeps_what_was_gathered() -> Result<()> {
    let mut page = Page::from_html(TOOLBAR_HTML)?;
    let node = page.resolve_selector("svg")?;
    let ids = link_chain(
        &mut page,
        node,
        names(&["svg", "Card", "Section", "Page"]),
    );
    page.runtime_mut()
        .set_return_link(ids[1], ReturnLink::Throwing("return getter exploded".into()));

    let info = walk(&page, node, &UserComponentRules::default())?;
    assert!(info.has_component_runtime);
    assert_eq!(info.full_component_tree, vec!["svg", "Card"]);
    assert_eq!(info.component_hierarchy, vec!["Card"]);
    Ok(())
}

#[test]
fn unreadable_props_leave_props_absent() -> Result<()> {
    let mut page = Page::from_html(TOOLBAR_HTML)?;
    let node = page.resolve_selector("svg")?;
    let ids = link_chain(&mut page, node, names(&["svg", "Card"]));
    page.runtime_mut()
        .set_props(ids[1], PropsRecord::Throwing("props getter exploded".into()));

    let info = walk(&page, node, &UserComponentRules::default())?;
    assert_eq!(info.component_name.as_deref(), Some("Card"));
    assert_eq!(info.props, None);
    Ok(())
}

#[test]
fn primary_component_carries_debug_source_and_props() -> Result<()> {
    let mut page = Page::from_html(TOOLBAR_HTML)?;
    let node = page.resolve_selector("svg")?;
    let ids = link_chain(&mut page, node, names(&["svg", "Icon", "Button", "Toolbar"]));
    page.runtime_mut()
        .set_debug_source(ids[2], source("src/Button.tsx", 12, Some(4)));
    page.runtime_mut()
        .set_debug_source(ids[3], source("src/Toolbar.tsx", 30, None));
    page.runtime_mut().set_props(
        ids[2],
        PropsRecord::Record(vec![
            ("variant".into(), PropValue::String("primary".into())),
            ("onClick".into(), PropValue::Function(Some("handleClick".into()))),
            ("children".into(), PropValue::String("Save".into())),
        ]),
    );

    let info = walk(&page, node, &UserComponentRules::deny(&["Icon"]))?;
    assert_eq!(info.source_file.as_deref(), Some("src/Button.tsx"));
    assert_eq!(info.source_line, Some(12));
    assert_eq!(info.source_column, Some(4));
    assert_eq!(
        info.component_stack,
        vec![
            ComponentFrame {
                name: "Button".into(),
                source: Some(source("src/Button.tsx", 12, Some(4))),
            },
            ComponentFrame {
                name: "Toolbar".into(),
                source: Some(source("src/Toolbar.tsx", 30, None)),
            },
        ]
    );

    let props = info.props.expect("button props are sampled");
    assert_eq!(props.get("variant"), Some(&serde_json::json!("primary")));
    assert_eq!(props.get("onClick"), Some(&serde_json::json!("[Function]")));
    assert!(!props.contains_key("children"));
    Ok(())
}

#[test]
fn props_are_only_read_from_nearby_hops() -> Result<()> {
    let record = PropsRecord::Record(vec![("label".into(), PropValue::String("x".into()))]);

    let mut near = Page::from_html(TOOLBAR_HTML)?;
    let node = near.resolve_selector("svg")?;
    let ids = link_chain(&mut near, node, names(&["svg", "g", "path", "span", "Near"]));
    near.runtime_mut().set_props(ids[4], record.clone());
    let info = walk(&near, node, &UserComponentRules::default())?;
    assert_eq!(info.component_name.as_deref(), Some("Near"));
    assert!(info.props.is_some());

    let mut far = Page::from_html(TOOLBAR_HTML)?;
    let node = far.resolve_selector("svg")?;
    let ids = link_chain(
        &mut far,
        node,
        names(&["svg", "g", "path", "span", "div", "Far"]),
    );
    far.runtime_mut().set_props(ids[PROPS_HOP_LIMIT], record);
    let info = walk(&far, node, &UserComponentRules::default())?;
    assert_eq!(info.component_name.as_deref(), Some("Far"));
    assert_eq!(info.props, None);
    Ok(())
}

#[test]
fn handle_is_found_on_a_nearby_ancestor() -> Result<()> {
    let mut page = Page::from_html(TOOLBAR_HTML)?;
    let toolbar = page.resolve_selector("#toolbar")?;
    let svg = page.resolve_selector("svg")?;
    link_chain(&mut page, toolbar, names(&["div", "Toolbar"]));

    let info = walk(&page, svg, &UserComponentRules::default())?;
    assert!(info.has_component_runtime);
    assert_eq!(info.component_name.as_deref(), Some("Toolbar"));
    Ok(())
}

#[test]
fn handle_search_gives_up_beyond_the_ancestor_bound() -> Result<()> {
    let mut html = String::from("<body><section id=\"linked\">");
    for _ in 0..HANDLE_SEARCH_DEPTH {
        html.push_str("<div>");
    }
    html.push_str("<em>leaf</em>");
    for _ in 0..HANDLE_SEARCH_DEPTH {
        html.push_str("</div>");
    }
    html.push_str("</section></body>");

    let mut page = Page::from_html(&html)?;
    let section = page.resolve_selector("#linked")?;
    let em = page.resolve_selector("em")?;
    let innermost_div = page.dom().parent_element(em).expect("em has a parent");
    link_chain(&mut page, section, names(&["section", "Shell"]));

    let info = walk(&page, em, &UserComponentRules::default())?;
    assert_eq!(info, ComponentInfoResult::empty());
    let info = walk(&page, innermost_div, &UserComponentRules::default())?;
    assert_eq!(info.component_name.as_deref(), Some("Shell"));
    Ok(())
}

#[test]
fn legacy_instance_key_is_recognized() -> Result<()> {
    let mut page = Page::from_html(TOOLBAR_HTML)?;
    let node = page.resolve_selector("svg")?;
    let innermost = page
        .runtime_mut()
        .create_chain(names(&["svg", "LegacyIcon"]))
        .expect("chain is not empty");
    page.set_instance_key(node, "__reactInternalInstance$zz9", innermost);

    let info = walk(&page, node, &UserComponentRules::default())?;
    assert_eq!(info.component_name.as_deref(), Some("LegacyIcon"));
    Ok(())
}

#[test]
fn unrelated_expandos_do_not_count_as_a_runtime() -> Result<()> {
    let mut page = Page::from_html(TOOLBAR_HTML)?;
    let node = page.resolve_selector("svg")?;
    let innermost = page
        .runtime_mut()
        .create_chain(names(&["svg", "Card"]))
        .expect("chain is not empty");
    page.set_instance_key(node, "__reactProps$abc", innermost);
    page.set_instance_key(node, "_reactFiber$abc", innermost);

    let info = walk(&page, node, &UserComponentRules::default())?;
    assert!(!info.has_component_runtime);
    Ok(())
}

#[test]
fn custom_key_pattern_selects_another_runtime_shape() -> Result<()> {
    let mut page = Page::from_html(TOOLBAR_HTML)?;
    let node = page.resolve_selector("svg")?;
    let innermost = page
        .runtime_mut()
        .create_chain(names(&["svg", "Widget"]))
        .expect("chain is not empty");
    page.set_instance_key(node, "__vnode", innermost);

    let adapter = FiberAdapter::with_key_pattern(page.runtime(), r"^__vnode$")?;
    let info = walk_component_tree(&adapter, page.dom(), node, &UserComponentRules::default());
    assert_eq!(info.component_name.as_deref(), Some("Widget"));

    assert!(matches!(
        FiberAdapter::with_key_pattern(page.runtime(), "(unclosed"),
        Err(Error::Config(_))
    ));
    Ok(())
}

/// Adapter that reports a fixed walk for every node, standing in for a
/// runtime shape the crate knows nothing about.
struct ScriptedAdapter {
    hops: Vec<Hop>,
}

impl RuntimeAdapter for ScriptedAdapter {
    fn locate_instance_handle(&self, _dom: &Dom, _node: NodeId) -> Option<Handle> {
        Some(Handle(InstanceId(0)))
    }

    fn walk_ancestors(&self, _handle: Handle, max_hops: usize) -> HopWalk {
        HopWalk {
            hops: self.hops.iter().take(max_hops).cloned().collect(),
            interrupted: None,
        }
    }
}

#[test]
fn walker_only_depends_on_the_adapter_capability() -> Result<()> {
    let page = Page::from_html(TOOLBAR_HTML)?;
    let node = page.resolve_selector("svg")?;
    let hop = |name: &str| Hop {
        name: Ok(name.to_string()),
        source: None,
        props: PropsRecord::default(),
    };
    let adapter = ScriptedAdapter {
        hops: vec![
            hop("svg"),
            Hop {
                name: Err(ReflectError("no name".into())),
                source: None,
                props: PropsRecord::default(),
            },
            hop("Chart"),
        ],
    };

    let info = walk_component_tree(&adapter, page.dom(), node, &UserComponentRules::default());
    assert_eq!(info.full_component_tree, vec!["svg", "Chart"]);
    assert_eq!(info.component_name.as_deref(), Some("Chart"));
    Ok(())
}
