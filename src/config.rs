use super::*;

/// Explicit overrides for the upper-case-first-letter heuristic that decides
/// whether a component name was authored by the page. `deny` wins over
/// `allow`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserComponentRules {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl UserComponentRules {
    pub fn deny(names: &[&str]) -> Self {
        Self {
            allow: Vec::new(),
            deny: names.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn allow(names: &[&str]) -> Self {
        Self {
            allow: names.iter().map(|name| name.to_string()).collect(),
            deny: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectorConfig {
    /// How long the selection highlight stays before it reverts.
    pub highlight_ms: i64,
    /// Caller patience for the component-info request. `None` waits for as
    /// long as the transport keeps the request alive.
    pub request_timeout_ms: Option<u64>,
    /// Attributes treated as test identifiers, in priority order.
    pub test_id_attributes: Vec<String>,
    /// Attributes with this prefix belong to the inspector itself and are
    /// never sampled.
    pub instrumentation_attr_prefix: String,
    /// Pattern for the own key linking a DOM node to its runtime instance.
    pub instance_key_pattern: String,
    pub user_components: UserComponentRules,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            highlight_ms: 2000,
            request_timeout_ms: None,
            test_id_attributes: vec!["data-testid".to_string()],
            instrumentation_attr_prefix: "data-inspector-".to_string(),
            instance_key_pattern: adapter::DEFAULT_INSTANCE_KEY_PATTERN.to_string(),
            user_components: UserComponentRules::default(),
        }
    }
}

impl InspectorConfig {
    pub fn from_json_str(src: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(src).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.highlight_ms < 0 {
            return Err(Error::Config(format!(
                "highlightMs must be non-negative (got {})",
                self.highlight_ms
            )));
        }
        if self.test_id_attributes.iter().any(|attr| attr.trim().is_empty()) {
            return Err(Error::Config("testIdAttributes contains an empty name".into()));
        }
        if self.instrumentation_attr_prefix.is_empty() {
            return Err(Error::Config("instrumentationAttrPrefix must not be empty".into()));
        }
        fancy_regex::Regex::new(&self.instance_key_pattern).map_err(|err| {
            Error::Config(format!(
                "invalid instanceKeyPattern {:?}: {err}",
                self.instance_key_pattern
            ))
        })?;
        Ok(())
    }

    pub fn with_user_components(mut self, rules: UserComponentRules) -> Self {
        self.user_components = rules;
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_highlight_ms(mut self, highlight_ms: i64) -> Self {
        self.highlight_ms = highlight_ms;
        self
    }

    /// Primary test-id attribute present on the element, with its value.
    pub(crate) fn test_id_of(&self, dom: &Dom, node: NodeId) -> Option<(String, String)> {
        self.test_id_attributes.iter().find_map(|attr| {
            dom.attr(node, attr)
                .filter(|value| !value.is_empty())
                .map(|value| (attr.clone(), value))
        })
    }

    pub(crate) fn fiber_adapter<'a>(&self, runtime: &'a ComponentRuntime) -> Result<FiberAdapter<'a>> {
        FiberAdapter::with_key_pattern(runtime, &self.instance_key_pattern)
    }
}
