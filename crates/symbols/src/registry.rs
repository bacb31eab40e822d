use crate::identity::Identity;
use crate::symbol::{Location, Symbol};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use std::ops::Index;

/// Handle to a symbol owned by a [`SymbolRegistry`]
pub type SymbolIndex = NodeIndex;

/// Edge kinds in the symbol graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Parent scope contains the child
    Contains,
    /// Symbol mentions another through a signature, member or alias type
    References,
}

/// Declaration the recorder could not turn into a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedDecl {
    pub name: String,
    pub location: Location,
}

/// Registry state to roll back to when a translation unit aborts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    symbols: usize,
    unresolved: usize,
    changes: usize,
}

/// Mutation that rollback has to undo on symbols it keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Resolved(SymbolIndex),
    Referenced(SymbolIndex, SymbolIndex),
}

/// Exclusive owner of every symbol, keyed by identity
#[derive(Debug, Default)]
pub struct SymbolRegistry {
    /// Directed graph (parent -> child, user -> used)
    graph: DiGraph<Symbol, Relation>,

    /// Identity -> NodeIndex mapping for find-before-build lookups
    by_identity: HashMap<Identity, SymbolIndex>,

    unresolved: Vec<UnresolvedDecl>,

    changes: Vec<Change>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol under `identity`, replacing any symbol stored there.
    ///
    /// A fresh symbol gets a `Contains` edge from its parent. A replacement
    /// with a different parent moves that edge.
    pub fn add(&mut self, identity: Identity, symbol: Symbol) -> SymbolIndex {
        if let Some(&idx) = self.by_identity.get(&identity) {
            let parent = symbol.parent();
            if self.graph[idx].parent() != parent {
                let mut old_edges: Vec<_> = self
                    .graph
                    .edges_directed(idx, Direction::Incoming)
                    .filter(|e| *e.weight() == Relation::Contains)
                    .map(|e| e.id())
                    .collect();
                // Removal swaps the last edge in, so go from the top.
                old_edges.sort_unstable();
                for edge in old_edges.into_iter().rev() {
                    self.graph.remove_edge(edge);
                }
                if let Some(parent) = parent {
                    self.graph.add_edge(parent, idx, Relation::Contains);
                }
            }
            self.graph[idx] = symbol;
            return idx;
        }

        let parent = symbol.parent();
        let idx = self.graph.add_node(symbol);
        if let Some(parent) = parent {
            self.graph.add_edge(parent, idx, Relation::Contains);
        }
        self.by_identity.insert(identity, idx);
        idx
    }

    /// Record that `from` mentions `to`; repeated calls add one edge
    pub fn add_reference(&mut self, from: SymbolIndex, to: SymbolIndex) {
        let exists = self
            .graph
            .edges_connecting(from, to)
            .any(|e| *e.weight() == Relation::References);
        if !exists {
            self.graph.add_edge(from, to, Relation::References);
            self.changes.push(Change::Referenced(from, to));
        }
    }

    /// Note that the signature, members or underlying type of `idx` was
    /// just stored, so rollback can clear it again
    pub fn mark_resolved(&mut self, idx: SymbolIndex) {
        self.changes.push(Change::Resolved(idx));
    }

    pub fn find_from_id(&self, identity: &Identity) -> Option<SymbolIndex> {
        self.by_identity.get(identity).copied()
    }

    pub fn get(&self, idx: SymbolIndex) -> Option<&Symbol> {
        self.graph.node_weight(idx)
    }

    pub fn get_mut(&mut self, idx: SymbolIndex) -> Option<&mut Symbol> {
        self.graph.node_weight_mut(idx)
    }

    /// Rebuild a symbol's identity by walking its parent chain
    pub fn identity_of(&self, idx: SymbolIndex) -> Option<Identity> {
        let mut parts = Vec::new();
        let mut current = Some(idx);
        while let Some(idx) = current {
            let symbol = self.get(idx)?;
            parts.push(symbol.id_part().clone());
            current = symbol.parent();
        }
        parts.reverse();
        Some(Identity::new(parts))
    }

    pub fn parent(&self, idx: SymbolIndex) -> Option<SymbolIndex> {
        self.get(idx).and_then(Symbol::parent)
    }

    /// Symbols directly contained in `idx`, in insertion order
    pub fn children(&self, idx: SymbolIndex) -> Vec<SymbolIndex> {
        self.neighbors(idx, Relation::Contains, Direction::Outgoing)
    }

    /// Symbols that `idx` mentions in its types
    pub fn references(&self, idx: SymbolIndex) -> Vec<SymbolIndex> {
        self.neighbors(idx, Relation::References, Direction::Outgoing)
    }

    /// Symbols whose types mention `idx`
    pub fn referenced_by(&self, idx: SymbolIndex) -> Vec<SymbolIndex> {
        self.neighbors(idx, Relation::References, Direction::Incoming)
    }

    fn neighbors(&self, idx: SymbolIndex, relation: Relation, dir: Direction) -> Vec<SymbolIndex> {
        let mut found: Vec<SymbolIndex> = self
            .graph
            .edges_directed(idx, dir)
            .filter(|e| *e.weight() == relation)
            .map(|e| match dir {
                Direction::Outgoing => e.target(),
                Direction::Incoming => e.source(),
            })
            .collect();
        found.sort();
        found
    }

    /// All symbols in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (SymbolIndex, &Symbol)> {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx).map(|symbol| (idx, symbol)))
    }

    /// All symbols ordered by identity (display name, spelling, key per level)
    pub fn sorted(&self) -> Vec<(Identity, SymbolIndex)> {
        let mut entries: Vec<(Identity, SymbolIndex)> = self
            .by_identity
            .iter()
            .map(|(identity, &idx)| (identity.clone(), idx))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn log_unresolved(&mut self, name: impl Into<String>, location: Location) {
        self.unresolved.push(UnresolvedDecl {
            name: name.into(),
            location,
        });
    }

    pub fn unresolved(&self) -> &[UnresolvedDecl] {
        &self.unresolved
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            symbols: self.graph.node_count(),
            unresolved: self.unresolved.len(),
            changes: self.changes.len(),
        }
    }

    /// Drop every symbol, reference and unresolved entry added after
    /// `checkpoint`, and clear slots that kept symbols resolved since.
    ///
    /// Locations, documentation and exposure merged into kept symbols stay.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        // Removing the highest index first keeps every earlier index stable.
        while self.graph.node_count() > checkpoint.symbols {
            let last = NodeIndex::new(self.graph.node_count() - 1);
            self.graph.remove_node(last);
        }
        let remaining = self.graph.node_count();
        self.by_identity.retain(|_, idx| idx.index() < remaining);
        self.unresolved.truncate(checkpoint.unresolved);

        let undone = self.changes.split_off(checkpoint.changes.min(self.changes.len()));
        for change in undone.into_iter().rev() {
            match change {
                Change::Resolved(idx) => {
                    if let Some(symbol) = self.graph.node_weight_mut(idx) {
                        symbol.clear_resolved();
                    }
                }
                Change::Referenced(from, to) => {
                    if from.index() >= remaining || to.index() >= remaining {
                        continue;
                    }
                    let edge = self
                        .graph
                        .edges_connecting(from, to)
                        .find(|e| *e.weight() == Relation::References)
                        .map(|e| e.id());
                    if let Some(edge) = edge {
                        self.graph.remove_edge(edge);
                    }
                }
            }
        }
    }
}

impl Index<SymbolIndex> for SymbolRegistry {
    type Output = Symbol;

    fn index(&self, idx: SymbolIndex) -> &Symbol {
        &self.graph[idx]
    }
}
