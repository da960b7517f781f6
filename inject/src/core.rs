//! Core, non-public data structures for the dependency graph.

use crate::container::WeakContainer;
use crate::provider::Provider;
use crate::signature::DependencyRef;
use crate::value::Value;
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// An RAII guard marking a provider node as being built.
///
/// Chains catch cycles that run through threaded calls. The guard catches the
/// rest: a factory that calls back into the container without passing its
/// chain along, and so re-enters a node that is still under construction.
pub(crate) struct InFlightGuard<'a> {
  flag: &'a Cell<bool>,
}

impl<'a> InFlightGuard<'a> {
  /// Returns `None` if the node is already in flight.
  pub(crate) fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
    if flag.replace(true) {
      None
    } else {
      Some(Self { flag })
    }
  }
}

impl Drop for InFlightGuard<'_> {
  fn drop(&mut self) {
    self.flag.set(false);
  }
}

/// The names being resolved for one top-level request, outermost first.
///
/// Each recursive step receives its own extended copy, so the chain always
/// describes exactly the path from the original request to the current node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionChain {
  context: Option<String>,
  names: Vec<String>,
}

impl ResolutionChain {
  pub(crate) fn new(context: Option<&str>) -> Self {
    Self {
      context: context.map(str::to_owned),
      names: Vec::new(),
    }
  }

  pub(crate) fn extend(&self, name: &str) -> Self {
    let mut names = Vec::with_capacity(self.names.len() + 1);
    names.extend_from_slice(&self.names);
    names.push(name.to_owned());
    Self {
      context: self.context.clone(),
      names,
    }
  }

  /// The diagnostic label this chain was started with.
  pub fn context(&self) -> Option<&str> {
    self.context.as_deref()
  }

  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.iter().any(|n| n == name)
  }

  /// The cycle closed by `name`, from its first occurrence through the repeat.
  pub(crate) fn cycle_through(&self, name: &str) -> Option<Vec<String>> {
    let start = self.names.iter().position(|n| n == name)?;
    let mut cycle = self.names[start..].to_vec();
    cycle.push(name.to_owned());
    Some(cycle)
  }

  /// The active names followed by `name`.
  pub(crate) fn names_then(&self, name: &str) -> Vec<String> {
    self.extend(name).names
  }

  /// The full path from the original request to `name`, context label included.
  pub(crate) fn path_to(&self, name: &str) -> Vec<String> {
    self
      .context
      .iter()
      .cloned()
      .chain(self.names_then(name))
      .collect()
  }
}

pub(crate) struct ProviderNode {
  pub(crate) provider: Provider,
  pub(crate) dependencies: Vec<DependencyRef>,
  cell: OnceCell<Option<Value>>,
  in_flight: Cell<bool>,
}

impl ProviderNode {
  pub(crate) fn new(provider: Provider, dependencies: Vec<DependencyRef>) -> Self {
    Self {
      provider,
      dependencies,
      cell: OnceCell::new(),
      in_flight: Cell::new(false),
    }
  }

  /// The memoized result, if the provider has already run.
  pub(crate) fn cached(&self) -> Option<&Option<Value>> {
    self.cell.get()
  }

  pub(crate) fn in_flight(&self) -> &Cell<bool> {
    &self.in_flight
  }

  /// Stores the first computed result and returns whatever is stored.
  pub(crate) fn memoize(&self, value: Option<Value>) -> Option<Value> {
    self.cell.get_or_init(|| value).clone()
  }
}

pub(crate) enum Node {
  Value(Value),
  /// The owning container. Held weakly so the graph does not keep itself alive.
  Container(WeakContainer),
  Provider(ProviderNode),
}

impl Node {
  pub(crate) fn is_resolved(&self) -> bool {
    match self {
      Node::Value(_) | Node::Container(_) => true,
      Node::Provider(node) => node.cached().is_some(),
    }
  }
}

impl fmt::Debug for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Node::Value(value) => f.debug_tuple("Value").field(value).finish(),
      Node::Container(_) => f.write_str("Container"),
      Node::Provider(node) => f
        .debug_struct("Provider")
        .field("provider", &node.provider)
        .field("dependencies", &node.dependencies)
        .field("resolved", &node.cached().is_some())
        .finish(),
    }
  }
}

/// Name to node mapping that remembers first-insertion order.
#[derive(Default)]
pub(crate) struct Graph {
  nodes: HashMap<String, Rc<Node>>,
  order: Vec<String>,
}

impl Graph {
  /// Inserts `node`, returning `true` if it replaced an existing one.
  pub(crate) fn insert(&mut self, name: String, node: Node) -> bool {
    match self.nodes.insert(name.clone(), Rc::new(node)) {
      Some(_) => true,
      None => {
        self.order.push(name);
        false
      }
    }
  }

  pub(crate) fn get(&self, name: &str) -> Option<Rc<Node>> {
    self.nodes.get(name).cloned()
  }

  pub(crate) fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  pub(crate) fn names(&self) -> Vec<String> {
    self.order.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn chain_reports_cycles_from_first_occurrence() {
    let chain = ResolutionChain::new(Some("boot")).extend("a").extend("b").extend("c");
    assert_eq!(chain.cycle_through("b").unwrap(), vec!["b", "c", "b"]);
    assert!(chain.cycle_through("d").is_none());
    assert_eq!(chain.path_to("d"), vec!["boot", "a", "b", "c", "d"]);
    assert_eq!(chain.names_then("d"), vec!["a", "b", "c", "d"]);
  }

  #[test]
  fn guard_releases_on_drop() {
    let flag = Cell::new(false);
    {
      let _guard = InFlightGuard::acquire(&flag).unwrap();
      assert!(InFlightGuard::acquire(&flag).is_none());
    }
    assert!(!flag.get());
    assert!(InFlightGuard::acquire(&flag).is_some());
  }

  #[test]
  fn graph_keeps_first_insertion_order() {
    let mut graph = Graph::default();
    assert!(!graph.insert("b".into(), Node::Value(Value::new(1))));
    assert!(!graph.insert("a".into(), Node::Value(Value::new(2))));
    assert!(graph.insert("b".into(), Node::Value(Value::new(3))));
    assert_eq!(graph.names(), vec!["b", "a"]);
  }
}
