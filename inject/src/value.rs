//! Type-erased values stored in and produced by a container.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A shared, type-erased value.
///
/// Cloning a `Value` is cheap and keeps pointing at the same allocation, so a
/// memoized provider result handed out twice is the identical instance.
#[derive(Clone)]
pub struct Value {
  inner: Rc<dyn Any>,
  type_name: &'static str,
}

impl Value {
  pub fn new<T: Any>(value: T) -> Self {
    Self::from_rc(Rc::new(value))
  }

  /// Wraps `value`, unless it already is a `Value`, in which case it is returned as is.
  pub fn from_any<T: Any>(value: T) -> Self {
    let any: &dyn Any = &value;
    match any.downcast_ref::<Value>() {
      Some(existing) => existing.clone(),
      None => Self::new(value),
    }
  }

  /// Wraps an existing `Rc`, preserving its identity.
  pub fn from_rc<T: Any>(rc: Rc<T>) -> Self {
    Self {
      inner: rc,
      type_name: type_name::<T>(),
    }
  }

  pub fn is<T: Any>(&self) -> bool {
    self.inner.is::<T>()
  }

  pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
    Rc::clone(&self.inner).downcast::<T>().ok()
  }

  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.inner.downcast_ref::<T>()
  }

  /// The name of the concrete type this value was created from.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Returns `true` if both values point at the same allocation.
  pub fn ptr_eq(a: &Value, b: &Value) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(&a.inner), Rc::as_ptr(&b.inner))
  }

  /// Host truthiness used for local overrides.
  ///
  /// `false`, `()`, zero of any primitive number type (and NaN), and empty
  /// strings are falsy. Every other value is truthy.
  pub fn is_truthy(&self) -> bool {
    let any = &*self.inner;

    macro_rules! zero_is_falsy {
      ($($int:ty),*) => {
        $(
          if let Some(n) = any.downcast_ref::<$int>() {
            return *n != 0;
          }
        )*
      };
    }

    if let Some(b) = any.downcast_ref::<bool>() {
      return *b;
    }
    if any.is::<()>() {
      return false;
    }
    zero_is_falsy!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
    if let Some(f) = any.downcast_ref::<f64>() {
      return *f != 0.0 && !f.is_nan();
    }
    if let Some(f) = any.downcast_ref::<f32>() {
      return *f != 0.0 && !f.is_nan();
    }
    if let Some(s) = any.downcast_ref::<String>() {
      return !s.is_empty();
    }
    if let Some(s) = any.downcast_ref::<&'static str>() {
      return !s.is_empty();
    }
    true
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Value({})", self.type_name)
  }
}

/// Caller-supplied values that shadow graph nodes for a single function-based resolution.
#[derive(Clone, Debug, Default)]
pub struct Locals {
  values: HashMap<String, Value>,
}

impl Locals {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a local, builder style.
  pub fn with<T: Any>(mut self, name: impl Into<String>, value: T) -> Self {
    self.insert(name, Value::from_any(value));
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: Value) {
    self.values.insert(name.into(), value);
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Locals {
  fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
    Self {
      values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
    }
  }
}
