//! # Blueprint Graph Model
//!
//! The in-memory representation of a Blueprint: an arena of nodes and pins
//! addressed by stable ids, grouped into graph regions (function bodies,
//! event pages, macros) under a single [`Blueprint`] compilation unit.
//!
//! The transpiler only ever reads this model. Links between pins are id
//! pairs recorded on both sides, so a loaded graph carries no ownership
//! cycles and no interior mutability.

use serde::{Deserialize, Serialize};

pub mod asset;
pub mod debug;
pub mod error;
pub mod query;
pub mod type_system;

pub use error::GraphError;
pub use type_system::{PinCategory, PinType};

/// Stable handle of a node inside one [`BlueprintGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Stable handle of a pin inside one [`BlueprintGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinDirection {
    Input,
    Output,
}

/// A named, directional attachment point on a node.
///
/// Pins carry either data (with a typed descriptor and optional literal or
/// object default) or control flow (`PinCategory::Exec`). Links are
/// undirected adjacency recorded on both endpoints; direction is resolved
/// from each endpoint's own [`PinDirection`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub node: NodeId,
    pub name: String,
    pub direction: PinDirection,
    pub ty: PinType,
    #[serde(default)]
    pub default_value: Option<String>,
    /// Persistent path or `Default__`-prefixed singleton name of an object
    /// default.
    #[serde(default)]
    pub default_object: Option<String>,
    #[serde(default)]
    pub links: Vec<PinId>,
}

impl Pin {
    pub fn is_exec(&self) -> bool {
        self.ty.is_exec()
    }

    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PinDirection::Output
    }
}

/// One operation or control point in a graph.
///
/// `class` is the concrete editor class the node was authored as
/// (e.g. `"CallFunction"`, `"Knot"`); the transpiler maps it to a closed
/// kind enumeration on its side. The remaining fields are kind-specific
/// metadata and are simply left empty where they do not apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub class: String,
    /// Target function, variable or event member name.
    #[serde(default)]
    pub member_name: Option<String>,
    /// Explicit generated-name override (function entries).
    #[serde(default)]
    pub custom_name: Option<String>,
    /// Target type for casts and subsystem lookups.
    #[serde(default)]
    pub target_type: Option<String>,
    /// Referenced sub-graph name for macro instances.
    #[serde(default)]
    pub macro_graph: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Owned pins in declaration order.
    pub pins: Vec<PinId>,
}

impl Node {
    /// Reroute ("knot") nodes are pure visual routing and must stay
    /// invisible to every traversal.
    pub fn is_reroute(&self) -> bool {
        self.class == "Knot"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphKind {
    /// A user-defined function body.
    Function,
    /// An event page ("ubergraph"), hosting event and input-action entries.
    Ubergraph,
    /// A macro definition, expanded by name at its instance sites.
    Macro,
}

/// One graph region: an arena of nodes and pins.
///
/// Ids are indices into the arenas and are only meaningful within the graph
/// that allotted them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintGraph {
    pub name: String,
    pub kind: GraphKind,
    nodes: Vec<Node>,
    pins: Vec<Pin>,
}

impl BlueprintGraph {
    pub fn new(name: &str, kind: GraphKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nodes: Vec::new(),
            pins: Vec::new(),
        }
    }

    pub fn add_node(&mut self, class: &str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            class: class.to_string(),
            member_name: None,
            custom_name: None,
            target_type: None,
            macro_graph: None,
            description: String::new(),
            pins: Vec::new(),
        });
        id
    }

    pub fn add_pin(
        &mut self,
        node: NodeId,
        name: &str,
        direction: PinDirection,
        ty: PinType,
    ) -> PinId {
        let id = PinId(self.pins.len() as u32);
        self.pins.push(Pin {
            id,
            node,
            name: name.to_string(),
            direction,
            ty,
            default_value: None,
            default_object: None,
            links: Vec::new(),
        });
        self.nodes[node.0 as usize].pins.push(id);
        id
    }

    /// Link two pins. The link is recorded on both endpoints; exactly one
    /// endpoint must be an input and the other an output.
    pub fn connect(&mut self, a: PinId, b: PinId) -> Result<(), GraphError> {
        let (da, db) = (self.pin(a).direction, self.pin(b).direction);
        if da == db {
            return Err(GraphError::LinkDirection {
                from: self.pin(a).name.clone(),
                to: self.pin(b).name.clone(),
            });
        }
        self.pins[a.0 as usize].links.push(b);
        self.pins[b.0 as usize].links.push(a);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.0 as usize]
    }

    pub fn pin_mut(&mut self, id: PinId) -> &mut Pin {
        &mut self.pins[id.0 as usize]
    }

    /// The node owning a pin.
    pub fn owner(&self, pin: PinId) -> &Node {
        self.node(self.pin(pin).node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Pins of a node in declaration order.
    pub fn pins_of(&self, node: NodeId) -> impl Iterator<Item = &Pin> {
        self.node(node).pins.iter().map(|id| self.pin(*id))
    }

    pub fn exec_inputs(&self, node: NodeId) -> impl Iterator<Item = &Pin> {
        self.pins_of(node).filter(|p| p.is_exec() && p.is_input())
    }

    pub fn exec_outputs(&self, node: NodeId) -> impl Iterator<Item = &Pin> {
        self.pins_of(node).filter(|p| p.is_exec() && p.is_output())
    }

    /// First exec output pin conventionally named `then` (or the only exec
    /// output when the node has exactly one).
    pub fn then_pin(&self, node: NodeId) -> Option<PinId> {
        let mut outs = self.exec_outputs(node);
        let first = outs.next()?;
        if first.name.eq_ignore_ascii_case("then") || outs.next().is_none() {
            return Some(first.id);
        }
        self.exec_outputs(node)
            .find(|p| p.name.eq_ignore_ascii_case("then"))
            .map(|p| p.id)
    }
}

/// A class-level variable declaration with its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    pub var_type: String,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintMetadata {
    pub version: String,
    pub created_at: String,
    pub modified_at: String,
}

impl Default for BlueprintMetadata {
    fn default() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            version: "1.0.0".to_string(),
            created_at: now.clone(),
            modified_at: now,
        }
    }
}

/// One compilation unit: a named class with a parent type, declared
/// variables and a list of graph regions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub name: String,
    pub parent_class: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub variables: Vec<VariableDecl>,
    pub graphs: Vec<BlueprintGraph>,
    #[serde(default)]
    pub metadata: BlueprintMetadata,
}

impl Blueprint {
    pub fn new(name: &str, parent_class: &str) -> Self {
        Self {
            name: name.to_string(),
            parent_class: parent_class.to_string(),
            description: String::new(),
            variables: Vec::new(),
            graphs: Vec::new(),
            metadata: BlueprintMetadata::default(),
        }
    }

    pub fn add_graph(&mut self, graph: BlueprintGraph) -> &mut BlueprintGraph {
        self.graphs.push(graph);
        self.metadata.modified_at = chrono::Utc::now().to_rfc3339();
        self.graphs.last_mut().expect("graph was just pushed")
    }

    /// Graph regions in emission order: function bodies first, event pages
    /// after. Macro definitions are not regions of their own.
    pub fn regions(&self) -> impl Iterator<Item = &BlueprintGraph> {
        self.graphs
            .iter()
            .filter(|g| g.kind == GraphKind::Function)
            .chain(self.graphs.iter().filter(|g| g.kind == GraphKind::Ubergraph))
    }
}
