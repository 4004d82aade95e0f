use super::*;
use crate::dom::parse_style_declarations;

/// Presentation properties retained by the style sampler, in output order.
pub(crate) const SAMPLED_STYLE_PROPERTIES: &[&str] = &[
    "display",
    "position",
    "top",
    "right",
    "bottom",
    "left",
    "width",
    "height",
    "margin",
    "padding",
    "border",
    "border-radius",
    "box-sizing",
    "color",
    "background-color",
    "opacity",
    "font-family",
    "font-size",
    "font-weight",
    "line-height",
    "text-align",
    "visibility",
    "overflow",
    "z-index",
    "flex-direction",
    "justify-content",
    "align-items",
    "gap",
];

const INHERITED_PROPERTIES: &[&str] = &[
    "color",
    "font-family",
    "font-size",
    "font-weight",
    "line-height",
    "text-align",
    "visibility",
];

pub(crate) type ComputedStyle = Vec<(String, String)>;

impl Dom {
    /// Resolves the computed style of an element: user-agent defaults for its
    /// tag, inherited values from the parent element, then inline
    /// declarations. Returns an empty style for non-elements.
    pub fn computed_style(&self, node_id: NodeId) -> Vec<(String, String)> {
        if !self.is_element(node_id) {
            return Vec::new();
        }

        let mut chain = vec![node_id];
        let mut cursor = self.parent_element(node_id);
        while let Some(ancestor) = cursor {
            chain.push(ancestor);
            cursor = self.parent_element(ancestor);
        }

        let mut inherited: Option<ComputedStyle> = None;
        for ancestor in chain.iter().skip(1).rev() {
            inherited = Some(self.resolve_own_style(*ancestor, inherited.as_ref()));
        }
        self.resolve_own_style(node_id, inherited.as_ref())
    }

    fn resolve_own_style(&self, node_id: NodeId, parent: Option<&ComputedStyle>) -> ComputedStyle {
        let tag = self.tag_name(node_id).unwrap_or("");
        let mut style = user_agent_defaults(tag);

        if let Some(parent) = parent {
            for name in INHERITED_PROPERTIES {
                if let Some((_, value)) = parent.iter().find(|(prop, _)| prop == name) {
                    set_declaration(&mut style, name, value);
                }
            }
            apply_tag_overrides(tag, &mut style);
        }
        if self.element(node_id).is_some_and(|element| element.attr("hidden").is_some()) {
            set_declaration(&mut style, "display", "none");
        }

        let inline = parse_style_declarations(
            self.element(node_id)
                .and_then(|element| element.attr("style")),
        );
        for (name, value) in inline {
            let value = strip_important(&value);
            if value == "inherit" {
                if let Some((_, parent_value)) = parent
                    .and_then(|parent| parent.iter().find(|(prop, _)| *prop == name))
                {
                    set_declaration(&mut style, &name, parent_value);
                }
                continue;
            }
            set_declaration(&mut style, &name, value);
        }
        style
    }
}

fn strip_important(value: &str) -> &str {
    value
        .strip_suffix("!important")
        .map(str::trim_end)
        .unwrap_or(value)
}

fn set_declaration(style: &mut ComputedStyle, name: &str, value: &str) {
    if let Some(slot) = style.iter_mut().find(|(prop, _)| prop == name) {
        slot.1 = value.to_string();
    } else {
        style.push((name.to_string(), value.to_string()));
    }
}

fn user_agent_defaults(tag: &str) -> ComputedStyle {
    let mut style: ComputedStyle = [
        ("display", default_display(tag)),
        ("position", "static"),
        ("top", "auto"),
        ("right", "auto"),
        ("bottom", "auto"),
        ("left", "auto"),
        ("width", "auto"),
        ("height", "auto"),
        ("margin", "0px"),
        ("padding", "0px"),
        ("border", "0px none rgb(0, 0, 0)"),
        ("border-radius", "0px"),
        ("box-sizing", "content-box"),
        ("color", "rgb(0, 0, 0)"),
        ("background-color", "rgba(0, 0, 0, 0)"),
        ("opacity", "1"),
        ("font-family", "Times New Roman"),
        ("font-size", "16px"),
        ("font-weight", "400"),
        ("line-height", "normal"),
        ("text-align", "start"),
        ("visibility", "visible"),
        ("overflow", "visible"),
        ("z-index", "auto"),
        ("flex-direction", "row"),
        ("justify-content", "normal"),
        ("align-items", "normal"),
        ("gap", "normal"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect();
    apply_tag_overrides(tag, &mut style);
    style
}

// Tag rules that win over inherited values.
fn apply_tag_overrides(tag: &str, style: &mut ComputedStyle) {
    match tag {
        "body" => set_declaration(style, "margin", "8px"),
        "p" => set_declaration(style, "margin", "16px 0px"),
        "h1" => {
            set_declaration(style, "font-size", "32px");
            set_declaration(style, "font-weight", "700");
        }
        "h2" => {
            set_declaration(style, "font-size", "24px");
            set_declaration(style, "font-weight", "700");
        }
        "h3" => set_declaration(style, "font-weight", "700"),
        "b" | "strong" | "th" => set_declaration(style, "font-weight", "700"),
        "a" => set_declaration(style, "color", "rgb(0, 0, 238)"),
        "button" | "input" | "select" | "textarea" => {
            set_declaration(style, "font-size", "13.3333px");
            set_declaration(style, "font-family", "system-ui");
            set_declaration(style, "text-align", "center");
            set_declaration(style, "box-sizing", "border-box");
        }
        _ => {}
    }
}

fn default_display(tag: &str) -> &'static str {
    match tag {
        "html" | "body" | "div" | "p" | "section" | "article" | "header" | "footer" | "nav"
        | "main" | "aside" | "form" | "ul" | "ol" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        | "pre" | "blockquote" | "fieldset" | "figure" | "hr" | "dl" | "dd" | "dt" | "address" => {
            "block"
        }
        "li" => "list-item",
        "table" => "table",
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "thead" => "table-header-group",
        "tbody" => "table-row-group",
        "button" | "input" | "select" | "textarea" | "img" => "inline-block",
        "script" | "style" | "head" | "meta" | "link" | "title" | "template" => "none",
        _ => "inline",
    }
}
