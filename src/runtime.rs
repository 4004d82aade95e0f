use super::*;
use num_bigint::BigInt;

/// Handle of one instance in a [`ComponentRuntime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) usize);

/// A failed read of an internal field, e.g. a getter that throws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectError(pub String);

impl fmt::Display for ReflectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reflection failed: {}", self.0)
    }
}

impl StdError for ReflectError {}

/// Type descriptor of an instance.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceType {
    /// A primitive host element; the descriptor is the tag string.
    Host(String),
    /// A plain function component.
    Function {
        name: String,
        display_name: Option<String>,
    },
    /// A class component.
    Class {
        name: String,
        display_name: Option<String>,
    },
    /// A forwarded-ref wrapper around a render function.
    ForwardRef {
        render_name: String,
        display_name: Option<String>,
    },
    /// A memoized wrapper around another type.
    Memo {
        inner: Box<InstanceType>,
        display_name: Option<String>,
    },
    /// A structural grouping node.
    Fragment,
    /// A context provider object.
    Provider { display_name: Option<String> },
    /// Text leaf; has no type descriptor.
    Text,
    /// Container root; has no type descriptor.
    Root,
    /// A descriptor whose inspection throws.
    Throwing(String),
}

/// How an instance links to its parent (`return`) instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnLink {
    Parent(InstanceId),
    None,
    Throwing(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(BigInt),
    String(String),
    Function(Option<String>),
    Array(Vec<PropValue>),
    Object(Vec<(String, PropValue)>),
    /// A property whose getter throws when read.
    Throwing(String),
}

/// The memoized props of an instance, or a failure to read them at all.
#[derive(Debug, Clone, PartialEq)]
pub enum PropsRecord {
    Record(Vec<(String, PropValue)>),
    Throwing(String),
}

impl Default for PropsRecord {
    fn default() -> Self {
        Self::Record(Vec::new())
    }
}

/// Where a component instance was declared, as recorded by a development
/// build of the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSource {
    pub file_name: String,
    pub line_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,
}

#[derive(Debug, Clone)]
pub(crate) struct Instance {
    pub(crate) instance_type: InstanceType,
    pub(crate) return_link: ReturnLink,
    pub(crate) props: PropsRecord,
    pub(crate) debug_source: Option<DebugSource>,
}

/// Arena of component-runtime instances.
///
/// This is the internal tree a rendering library keeps next to the DOM; the
/// inspector only ever reads it through a [`RuntimeAdapter`].
#[derive(Debug, Clone, Default)]
pub struct ComponentRuntime {
    instances: Vec<Instance>,
}

impl ComponentRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Adds an instance whose `return` link points at `parent`.
    pub fn create(&mut self, instance_type: InstanceType, parent: Option<InstanceId>) -> InstanceId {
        let id = InstanceId(self.instances.len());
        self.instances.push(Instance {
            instance_type,
            return_link: parent.map(ReturnLink::Parent).unwrap_or(ReturnLink::None),
            props: PropsRecord::default(),
            debug_source: None,
        });
        id
    }

    /// Builds a `return` chain from the innermost instance outwards and
    /// returns the innermost one.
    pub fn create_chain(&mut self, types: impl IntoIterator<Item = InstanceType>) -> Option<InstanceId> {
        let types = types.into_iter().collect::<Vec<_>>();
        let mut parent = None;
        let mut innermost = None;
        for instance_type in types.into_iter().rev() {
            let id = self.create(instance_type, parent);
            parent = Some(id);
            innermost = Some(id);
        }
        innermost
    }

    pub fn set_props(&mut self, id: InstanceId, props: PropsRecord) {
        if let Some(instance) = self.instances.get_mut(id.0) {
            instance.props = props;
        }
    }

    pub fn set_debug_source(&mut self, id: InstanceId, source: DebugSource) {
        if let Some(instance) = self.instances.get_mut(id.0) {
            instance.debug_source = Some(source);
        }
    }

    pub fn set_return_link(&mut self, id: InstanceId, link: ReturnLink) {
        if let Some(instance) = self.instances.get_mut(id.0) {
            instance.return_link = link;
        }
    }

    pub(crate) fn instance(&self, id: InstanceId) -> std::result::Result<&Instance, ReflectError> {
        self.instances
            .get(id.0)
            .ok_or_else(|| ReflectError(format!("dangling instance handle {}", id.0)))
    }

    pub(crate) fn return_of(
        &self,
        id: InstanceId,
    ) -> std::result::Result<Option<InstanceId>, ReflectError> {
        match &self.instance(id)?.return_link {
            ReturnLink::Parent(parent) => Ok(Some(*parent)),
            ReturnLink::None => Ok(None),
            ReturnLink::Throwing(msg) => Err(ReflectError(msg.clone())),
        }
    }
}

impl InstanceType {
    /// Human-readable name derived from the type descriptor. Empty when the
    /// descriptor carries no name.
    pub fn display_name(&self) -> std::result::Result<String, ReflectError> {
        let name = match self {
            Self::Host(tag) => tag.clone(),
            Self::Function { name, display_name } | Self::Class { name, display_name } => {
                display_name.clone().unwrap_or_else(|| name.clone())
            }
            Self::ForwardRef {
                render_name,
                display_name,
            } => display_name.clone().unwrap_or_else(|| render_name.clone()),
            Self::Memo {
                inner,
                display_name,
            } => match display_name {
                Some(name) => name.clone(),
                None => inner.display_name()?,
            },
            Self::Fragment => "Fragment".to_string(),
            Self::Provider { display_name } => display_name.clone().unwrap_or_default(),
            Self::Text | Self::Root => String::new(),
            Self::Throwing(msg) => return Err(ReflectError(msg.clone())),
        };
        Ok(name)
    }

    pub fn function(name: &str) -> Self {
        Self::Function {
            name: name.to_string(),
            display_name: None,
        }
    }

    pub fn host(tag: &str) -> Self {
        Self::Host(tag.to_string())
    }
}
