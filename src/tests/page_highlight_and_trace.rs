use super::*;

#[test]
fn highlight_outlines_and_reverts_after_the_delay() -> Result<()> {
    let mut page = Page::from_html(r#"<body><div id="card" style="color: red">x</div></body>"#)?;
    let card = page.resolve_selector("#card")?;

    page.highlight(card)?;
    assert!(page.is_highlighted(card));
    assert_eq!(
        page.dom().attr(card, "style").as_deref(),
        Some("color: red; outline: 2px solid rgb(59, 130, 246); outline-offset: 2px;")
    );
    assert_eq!(page.dom().attr(card, "data-inspector-highlight").as_deref(), Some(""));
    assert_eq!(page.pending_timers().len(), 1);

    page.advance_time(1999)?;
    assert!(page.is_highlighted(card));

    page.advance_time(1)?;
    assert!(!page.is_highlighted(card));
    assert_eq!(page.dom().attr(card, "style").as_deref(), Some("color: red"));
    assert_eq!(page.dom().attr(card, "data-inspector-highlight"), None);
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn revert_removes_a_style_attribute_that_was_not_there() -> Result<()> {
    let mut page = Page::from_html("<body><p>x</p></body>")?;
    let p = page.resolve_selector("p")?;

    page.highlight(p)?;
    assert_eq!(page.dom().style_get(p, "outline-offset")?, "2px");
    page.flush()?;
    assert_eq!(page.dom().attr(p, "style"), None);
    assert_eq!(page.now_ms(), 2000);
    Ok(())
}

#[test]
fn re_highlighting_keeps_the_original_style_and_restarts_the_countdown() -> Result<()> {
    let mut page =
        Page::from_html(r#"<body><span style="font-weight: 700">x</span></body>"#)?;
    let span = page.resolve_selector("span")?;

    page.highlight(span)?;
    page.advance_time(1500)?;
    let timer_id = page.highlight(span)?;

    let pending = page.pending_timers();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, timer_id);
    assert_eq!(pending[0].due_at, 3500);

    page.advance_time(600)?;
    assert!(page.is_highlighted(span));
    page.advance_time_to(3500)?;
    assert!(!page.is_highlighted(span));
    assert_eq!(
        page.dom().attr(span, "style").as_deref(),
        Some("font-weight: 700")
    );
    Ok(())
}

#[test]
fn zero_highlight_duration_reverts_on_the_next_tick() -> Result<()> {
    let mut page = Page::from_html("<body><b>x</b></body>")?;
    let b = page.resolve_selector("b")?;
    page.set_highlight_ms(0);

    page.highlight(b)?;
    assert!(page.is_highlighted(b));
    page.advance_time(0)?;
    assert!(!page.is_highlighted(b));
    Ok(())
}

#[test]
fn highlighting_a_text_node_is_rejected() -> Result<()> {
    let mut page = Page::from_html("<body><p>x</p></body>")?;
    let p = page.resolve_selector("p")?;
    let text = page.dom().children(p)[0];

    assert!(matches!(page.highlight(text), Err(Error::NotAnElement(_))));
    assert!(page.pending_timers().is_empty());
    Ok(())
}

#[test]
fn clock_rejects_moving_backwards() -> Result<()> {
    let mut page = Page::default();
    page.advance_time(10)?;

    assert!(matches!(page.advance_time(-1), Err(Error::Config(_))));
    assert!(matches!(page.advance_time_to(5), Err(Error::Config(_))));
    assert_eq!(page.now_ms(), 10);
    Ok(())
}

#[test]
fn timers_run_in_due_order() -> Result<()> {
    let mut page = Page::from_html("<body><i>a</i><u>b</u></body>")?;
    let i = page.resolve_selector("i")?;
    let u = page.resolve_selector("u")?;

    page.set_highlight_ms(500);
    page.highlight(i)?;
    page.set_highlight_ms(100);
    page.highlight(u)?;

    let due = page
        .pending_timers()
        .into_iter()
        .map(|timer| timer.due_at)
        .collect::<Vec<_>>();
    assert_eq!(due, vec![100, 500]);

    page.advance_time(100)?;
    assert!(page.is_highlighted(i));
    assert!(!page.is_highlighted(u));
    Ok(())
}

#[test]
fn trace_buffer_records_highlight_lifecycle() -> Result<()> {
    let mut page = Page::from_html("<body><p>x</p></body>")?;
    let p = page.resolve_selector("p")?;

    page.highlight(p)?;
    assert!(page.take_trace_logs().is_empty());

    page.enable_trace(true);
    page.highlight(p)?;
    page.flush()?;
    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.starts_with("[timer] schedule")));
    assert!(logs.iter().any(|line| line.starts_with("[inspect] highlight node=")));
    assert!(logs.iter().any(|line| line.starts_with("[inspect] highlight reverted")));
    assert!(logs.iter().any(|line| line.starts_with("[timer] flush")));
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_buffer_keeps_only_the_newest_lines() -> Result<()> {
    let mut page = Page::from_html("<body><p>x</p></body>")?;
    let p = page.resolve_selector("p")?;
    page.enable_trace(true);
    page.set_trace_log_limit(2);

    page.highlight(p)?;
    page.advance_time(2000)?;
    let logs = page.take_trace_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].starts_with("[inspect] highlight reverted"));
    assert!(logs[1].starts_with("[timer] advance"));
    Ok(())
}

#[test]
fn inspected_node_round_trips() -> Result<()> {
    let mut page = Page::from_html("<body><p>x</p></body>")?;
    let p = page.resolve_selector("p")?;

    assert_eq!(page.inspected_node(), None);
    page.set_inspected_node(Some(p));
    assert_eq!(page.inspected_node(), Some(p));
    page.set_inspected_node(None);
    assert_eq!(page.inspected_node(), None);
    Ok(())
}

#[test]
fn poisoned_page_lock_reports_page_unavailable() -> Result<()> {
    let shared = Page::from_html("<body><p>x</p></body>")?.into_shared();
    let clone = Arc::clone(&shared);
    let _ = std::thread::spawn(move || {
        let _guard = clone.lock().expect("lock");
        panic!("poison the page lock");
    })
    .join();

    assert!(matches!(lock_page(&shared), Err(Error::PageUnavailable(_))));
    Ok(())
}

#[test]
fn reads_see_the_page_without_active_outlines() -> Result<()> {
    let mut page = Page::from_html(
        r#"<body><section><div id="card" style="color: red">x</div><p>y</p></section></body>"#,
    )?;
    let section = page.resolve_selector("section")?;
    let card = page.resolve_selector("#card")?;
    let p = page.resolve_selector("p")?;
    page.highlight(card)?;
    page.highlight(p)?;
    let outlined_card = page.dom().attr(card, "style");

    let (card_style, p_style, inner) = page.read_unhighlighted(|dom| {
        (
            dom.attr(card, "style"),
            dom.attr(p, "style"),
            dom.inner_html(section),
        )
    })?;
    assert_eq!(card_style.as_deref(), Some("color: red"));
    assert_eq!(p_style, None);
    let inner = inner?;
    assert!(!inner.contains("outline"), "{inner}");
    assert!(!inner.contains("data-inspector-highlight"), "{inner}");

    assert_eq!(page.dom().attr(card, "style"), outlined_card);
    assert_eq!(page.dom().attr(p, "data-inspector-highlight").as_deref(), Some(""));
    assert!(page.is_highlighted(card) && page.is_highlighted(p));
    assert_eq!(page.pending_timers().len(), 2);

    page.flush()?;
    assert_eq!(page.dom().attr(card, "style").as_deref(), Some("color: red"));
    assert_eq!(page.dom().attr(p, "style"), None);
    Ok(())
}
