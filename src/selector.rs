use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthOfType(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokens {
        if token == ">" {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(SelectorCombinator::Child);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

pub(crate) fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut scanner = DepthScanner::default();

    for ch in selector.chars() {
        if !scanner.feed(ch) {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        if ch == ',' && scanner.at_top_level() {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            groups.push(trimmed.to_string());
            current.clear();
            continue;
        }
        current.push(ch);
    }

    if !scanner.balanced() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

pub(crate) fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut scanner = DepthScanner::default();

    for ch in selector.chars() {
        if !scanner.feed(ch) {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        match ch {
            '>' if scanner.at_top_level() => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                tokens.push(ch.to_string());
            }
            ch if ch.is_ascii_whitespace() && scanner.at_top_level() => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !scanner.balanced() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }

    Ok(tokens)
}

/// Tracks bracket, paren and quote nesting while scanning a selector.
#[derive(Debug, Default)]
struct DepthScanner {
    bracket_depth: usize,
    paren_depth: usize,
    quote: Option<char>,
    escaped: bool,
}

impl DepthScanner {
    fn feed(&mut self, ch: char) -> bool {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == q {
                self.quote = None;
            }
            return true;
        }
        match ch {
            '"' | '\'' if self.bracket_depth > 0 => self.quote = Some(ch),
            '[' => self.bracket_depth += 1,
            ']' => {
                let Some(depth) = self.bracket_depth.checked_sub(1) else {
                    return false;
                };
                self.bracket_depth = depth;
            }
            '(' => self.paren_depth += 1,
            ')' => {
                let Some(depth) = self.paren_depth.checked_sub(1) else {
                    return false;
                };
                self.paren_depth = depth;
            }
            _ => {}
        }
        true
    }

    fn at_top_level(&self) -> bool {
        self.bracket_depth == 0 && self.paren_depth == 0 && self.quote.is_none()
    }

    fn balanced(&self) -> bool {
        self.at_top_level()
    }
}

pub(crate) fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    if part.is_empty() {
        return Err(Error::UnsupportedSelector(part.into()));
    }

    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                i += 1;
                let Some((id, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                i = next;
            }
            b'.' => {
                i += 1;
                let Some((class_name, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let Some((pseudo, next)) = parse_selector_pseudo(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if step.tag.is_some()
                    || step.id.is_some()
                    || !step.classes.is_empty()
                    || step.universal
                {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                let Some((tag, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Ok(step)
}

pub(crate) fn parse_selector_pseudo(
    part: &str,
    start: usize,
) -> Option<(SelectorPseudoClass, usize)> {
    if part.as_bytes().get(start)? != &b':' {
        return None;
    }
    let start = start + 1;
    let tail = part.get(start..)?;

    for (name, pseudo) in [
        ("first-of-type", SelectorPseudoClass::FirstOfType),
        ("last-of-type", SelectorPseudoClass::LastOfType),
        ("only-of-type", SelectorPseudoClass::OnlyOfType),
    ] {
        if let Some(rest) = tail.strip_prefix(name) {
            if rest.is_empty() || is_selector_continuation(rest.as_bytes().first()?) {
                return Some((pseudo, start + name.len()));
            }
        }
    }

    let body = tail.strip_prefix("nth-of-type(")?;
    let close_pos = body.find(')')?;
    let raw = body[..close_pos].trim();
    let position = raw.parse::<usize>().ok().filter(|value| *value > 0)?;
    let next = start + "nth-of-type(".len() + close_pos + 1;
    if let Some(ch) = part.as_bytes().get(next) {
        if !is_selector_continuation(ch) {
            return None;
        }
    }
    Some((SelectorPseudoClass::NthOfType(position), next))
}

pub(crate) fn is_selector_continuation(next: &u8) -> bool {
    matches!(next, b'.' | b'#' | b'[' | b':')
}

pub(crate) fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut out = String::new();
    let mut end = start;
    while end < bytes.len() {
        let b = bytes[end];
        if b == b'\\' {
            // CSS escape: the next character is taken literally.
            let ch = src.get(end + 1..)?.chars().next()?;
            out.push(ch);
            end += 1 + ch.len_utf8();
            continue;
        }
        if !is_selector_ident_char(b) {
            break;
        }
        let ch = src.get(end..)?.chars().next()?;
        out.push(ch);
        end += ch.len_utf8();
    }
    if out.is_empty() {
        return None;
    }
    Some((out, end))
}

pub(crate) fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b >= 0x80
}

pub(crate) fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }

    let key_start = i;
    while i < bytes.len() && is_selector_attr_name_char(bytes[i]) {
        i += 1;
    }
    if key_start == i {
        return Err(Error::UnsupportedSelector(src.into()));
    }
    let key = src
        .get(key_start..i)
        .ok_or_else(|| Error::UnsupportedSelector(src.into()))?
        .to_ascii_lowercase();

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    match bytes.get(i) {
        Some(b']') => return Ok((SelectorAttrCondition::Exists { key }, i + 1)),
        Some(b'=') => i += 1,
        _ => return Err(Error::UnsupportedSelector(src.into())),
    }

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    let (value, mut i) = parse_selector_attr_value(src, i)?;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b']') {
        return Err(Error::UnsupportedSelector(src.into()));
    }

    Ok((SelectorAttrCondition::Eq { key, value }, i + 1))
}

pub(crate) fn is_selector_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}

pub(crate) fn parse_selector_attr_value(src: &str, start: usize) -> Result<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() {
        return Err(Error::UnsupportedSelector(src.into()));
    }

    if bytes[start] == b'"' || bytes[start] == b'\'' {
        let quote = bytes[start];
        let mut i = start + 1;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i = (i + 2).min(bytes.len());
                continue;
            }
            if bytes[i] == quote {
                let raw = src
                    .get(start + 1..i)
                    .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
                return Ok((unescape_selector_string(raw), i + 1));
            }
            i += 1;
        }
        return Err(Error::UnsupportedSelector(src.into()));
    }

    let mut i = start;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b']' {
        i += 1;
    }
    let raw = src
        .get(start..i)
        .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
    Ok((unescape_selector_string(raw), i))
}

fn unescape_selector_string(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }
        out.push(ch);
    }
    out
}

/// Quotes `value` for use inside `[attr="..."]`.
pub(crate) fn quote_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

impl Dom {
    pub(crate) fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attr("id") != Some(id.as_str()) {
                return false;
            }
        }

        let classes = element.classes();
        if step
            .classes
            .iter()
            .any(|class_name| !classes.contains(&class_name.as_str()))
        {
            return false;
        }

        for cond in &step.attrs {
            let matched = match cond {
                SelectorAttrCondition::Exists { key } => element.attr(key).is_some(),
                SelectorAttrCondition::Eq { key, value } => element.attr(key) == Some(value),
            };
            if !matched {
                return false;
            }
        }

        for pseudo in &step.pseudo_classes {
            let Some((position, count)) = self.same_tag_position(node_id) else {
                return false;
            };
            let matched = match pseudo {
                SelectorPseudoClass::FirstOfType => position == 1,
                SelectorPseudoClass::LastOfType => position == count,
                SelectorPseudoClass::OnlyOfType => count == 1,
                SelectorPseudoClass::NthOfType(wanted) => position == *wanted,
            };
            if !matched {
                return false;
            }
        }

        true
    }

    pub(crate) fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }
        let Some(combinator) = last.combinator else {
            return rest.is_empty();
        };

        match combinator {
            SelectorCombinator::Child => self
                .parent(node_id)
                .is_some_and(|parent| self.matches_selector_chain(parent, rest)),
            SelectorCombinator::Descendant => {
                let mut cursor = self.parent(node_id);
                while let Some(ancestor) = cursor {
                    if self.matches_selector_chain(ancestor, rest) {
                        return true;
                    }
                    cursor = self.parent(ancestor);
                }
                false
            }
        }
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for candidate in self.all_element_nodes() {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(candidate, steps))
                && seen.insert(candidate)
            {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }
}
