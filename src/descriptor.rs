use super::*;
use serde_json::{Map, Value};

/// Summary of one ancestor in [`ElementDescriptor::parent_chain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentSummary {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
}

/// Everything the inspector knows about one selected element.
///
/// Built once by [`assemble_descriptor`] and never touched by the engine
/// afterwards. Optional fields are absent rather than empty, and are left
/// out of the JSON form entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescriptor {
    pub selector: String,
    pub dom_path: String,
    pub tag: String,
    pub text: String,
    #[serde(rename = "innerHTML")]
    pub inner_html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_classes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_attributes: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_styles: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_chain: Option<Vec<ParentSummary>>,
    pub sibling_index: usize,
    pub child_count: usize,
    pub has_component_runtime: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_hierarchy: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_component_tree: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_stack: Option<Vec<ComponentFrame>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,
}

impl ElementDescriptor {
    /// Folds a component-walk result into the descriptor. Empty collections
    /// stay absent.
    pub(crate) fn merge_component_info(&mut self, info: ComponentInfoResult) {
        fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
            (!items.is_empty()).then_some(items)
        }

        self.has_component_runtime = info.has_component_runtime;
        self.component_name = info.component_name;
        self.component_hierarchy = non_empty(info.component_hierarchy);
        self.full_component_tree = non_empty(info.full_component_tree);
        self.component_stack = non_empty(info.component_stack);
        self.source_file = info.source_file;
        self.source_line = info.source_line;
        self.source_column = info.source_column;
        self.props = info.props;
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| Error::Serialization(err.to_string()))
    }

    pub fn from_json(src: &str) -> Result<Self> {
        serde_json::from_str(src).map_err(|err| Error::Serialization(err.to_string()))
    }
}
