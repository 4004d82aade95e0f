//! Element inspection engine.
//!
//! Given one element of a page, [`assemble_descriptor`] produces an
//! [`ElementDescriptor`]: a re-resolvable selector, a readable DOM path, a
//! bounded ancestor chain, sampled attributes and computed styles, and, when
//! the page was rendered by a component runtime that links its instances to
//! DOM nodes, the owning component chain with debug source and sanitized
//! props.
//!
//! The component lookup crosses an execution-context boundary through a
//! [`ComponentInfoTransport`], which never fails: an absent runtime, a dead
//! peer or an impatient caller all turn into an empty [`ComponentInfoResult`].

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

mod adapter;
mod ancestors;
mod assembler;
mod components;
mod config;
mod descriptor;
mod dom;
mod html;
mod locator;
mod page;
mod runtime;
mod sampler;
mod sanitize;
mod selector;
mod style;
mod timers;
mod transport;

pub use adapter::{FiberAdapter, Handle, Hop, HopWalk, RuntimeAdapter};
pub use ancestors::{dom_path, parent_chain};
pub use assembler::{Inspector, assemble_descriptor};
pub use components::{
    ComponentFrame, ComponentInfoResult, is_user_component, walk_component_tree,
};
pub use config::{InspectorConfig, UserComponentRules};
pub use descriptor::{ElementDescriptor, ParentSummary};
pub use dom::{Dom, NodeId};
pub use locator::synthesize_selector;
pub use page::{Page, SharedPage, lock_page};
pub use runtime::{
    ComponentRuntime, DebugSource, InstanceId, InstanceType, PropValue, PropsRecord,
    ReflectError, ReturnLink,
};
pub use sampler::{sample_attributes, sample_computed_styles, text_snapshot};
pub use sanitize::{sanitize_props, sanitize_value};
pub use timers::PendingTimer;
pub use transport::{
    ChannelTransport, ComponentInfoRequest, ComponentInfoService, ComponentInfoTransport,
    InProcessTransport,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    NotAnElement(String),
    Config(String),
    PageUnavailable(String),
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::NotAnElement(what) => write!(f, "not an element: {what}"),
            Self::Config(msg) => write!(f, "config error: {msg}"),
            Self::PageUnavailable(msg) => write!(f, "page unavailable: {msg}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl StdError for Error {}

/// Characters kept in the `text` snapshot.
pub const TEXT_LIMIT: usize = 200;
/// Characters kept in the `innerHTML` snapshot.
pub const INNER_HTML_LIMIT: usize = 500;
/// Characters kept per sampled attribute value.
pub const ATTRIBUTE_VALUE_LIMIT: usize = 200;
/// Segments in `domPath`.
pub const DOM_PATH_DEPTH: usize = 15;
/// Entries in `parentChain`.
pub const PARENT_CHAIN_DEPTH: usize = 8;
/// Ancestors searched for an instance link when the node itself has none.
pub const HANDLE_SEARCH_DEPTH: usize = 10;
/// Hops followed along the instance `return` chain.
pub const COMPONENT_HOP_LIMIT: usize = 30;
/// Only the nearest hops have their props captured.
pub const PROPS_HOP_LIMIT: usize = 5;
/// Entries in `componentStack`.
pub const COMPONENT_STACK_LIMIT: usize = 10;
/// Characters kept from a string prop before the truncation marker.
pub const PROP_STRING_LIMIT: usize = 100;

pub(crate) fn truncate_chars(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests;
