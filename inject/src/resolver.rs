//! The resolution engine: recursive, memoized, cycle-checked graph walks.

use crate::container::Container;
use crate::core::{InFlightGuard, Node, ProviderNode, ResolutionChain};
use crate::error::{Error, Result};
use crate::invoke::{invoke, Arguments};
use crate::provider::Provider;
use crate::signature::{self, DependencyRef};
use crate::value::{Locals, Value};
use tracing::{debug, trace};

/// Splits a requested name into the graph name and whether this lookup is optional.
///
/// A trailing `?` makes the lookup optional, and `_name_` shadows `name`.
pub(crate) fn normalize(requested: &str) -> (&str, bool) {
  match requested.strip_suffix('?') {
    Some(stripped) => (strip_shadow_underscores(stripped), true),
    None => (strip_shadow_underscores(requested), false),
  }
}

// Exactly one underscore on each side; `__a__` and `_a` are left alone.
fn strip_shadow_underscores(name: &str) -> &str {
  let Some(inner) = name.strip_prefix('_').and_then(|n| n.strip_suffix('_')) else {
    return name;
  };
  if inner.is_empty() || inner.starts_with('_') || inner.ends_with('_') {
    name
  } else {
    inner
  }
}

/// Resolves one requested name, which may carry the `_name_` and `?` markers.
pub(crate) fn resolve_name(
  container: &Container,
  requested: &str,
  chain: &ResolutionChain,
  locals: Option<&Locals>,
) -> Result<Option<Value>> {
  let (name, optional) = normalize(requested);
  resolve_normalized(container, name, optional, chain, locals)
}

fn resolve_dependency(
  container: &Container,
  dependency: &DependencyRef,
  chain: &ResolutionChain,
  locals: Option<&Locals>,
) -> Result<Option<Value>> {
  let (name, optional) = normalize(dependency.name());
  resolve_normalized(
    container,
    name,
    optional || dependency.is_optional(),
    chain,
    locals,
  )
}

fn resolve_normalized(
  container: &Container,
  name: &str,
  optional: bool,
  chain: &ResolutionChain,
  locals: Option<&Locals>,
) -> Result<Option<Value>> {
  if let Some(local) = locals.and_then(|locals| locals.get(name)) {
    if container.config().local_overrides.accepts(local) {
      trace!(dependency = name, "using local override");
      return Ok(Some(local.clone()));
    }
    trace!(dependency = name, "local override ignored, falling through to the graph");
  }

  let Some(node) = container.node(name) else {
    if optional {
      trace!(dependency = name, "optional dependency is absent");
      return Ok(None);
    }
    return Err(Error::DependencyNotFound {
      chain: chain.path_to(name),
    });
  };

  match &*node {
    Node::Value(value) => Ok(Some(value.clone())),
    Node::Container(weak) => Ok(weak.value()),
    Node::Provider(provider_node) => resolve_provider(container, name, provider_node, chain),
  }
}

fn resolve_provider(
  container: &Container,
  name: &str,
  node: &ProviderNode,
  chain: &ResolutionChain,
) -> Result<Option<Value>> {
  if let Some(cached) = node.cached() {
    trace!(dependency = name, "memoized");
    return Ok(cached.clone());
  }

  if let Some(cycle) = chain.cycle_through(name) {
    return Err(Error::CircularDependency { cycle });
  }
  let Some(_guard) = InFlightGuard::acquire(node.in_flight()) else {
    return Err(Error::CircularDependency {
      cycle: chain.names_then(name),
    });
  };

  let nested = chain.extend(name);
  let values = node
    .dependencies
    .iter()
    .map(|dependency| resolve_dependency(container, dependency, &nested, None))
    .collect::<Result<Vec<_>>>()?;

  debug!(provider = name, kind = ?node.provider.kind(), "invoking provider");
  let args = Arguments::new(&node.dependencies, values, container, &nested);
  let value = invoke(&node.provider, &args)?;
  Ok(node.memoize(value))
}

/// Resolves each name with its own chain, seeded with `context`.
pub(crate) fn resolve_many<S: AsRef<str>>(
  container: &Container,
  names: &[S],
  context: Option<&str>,
) -> Result<Vec<Option<Value>>> {
  names
    .iter()
    .map(|name| resolve_name(container, name.as_ref(), &ResolutionChain::new(context), None))
    .collect()
}

/// Resolves the dependencies of an unregistered provider and runs it.
pub(crate) fn call(
  container: &Container,
  provider: &Provider,
  locals: &Locals,
  context: Option<&str>,
) -> Result<Option<Value>> {
  let dependencies = signature::parse(provider)?;
  let chain = ResolutionChain::new(context);
  let values = dependencies
    .iter()
    .map(|dependency| resolve_dependency(container, dependency, &chain, Some(locals)))
    .collect::<Result<Vec<_>>>()?;

  let args = Arguments::new(&dependencies, values, container, &chain);
  invoke(provider, &args)
}
