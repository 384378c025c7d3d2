//! Construction of unregistered types
//!
//! A type with no container registration can still be built if it lists its
//! constructors. Constructors are tried in the order the type lists them and
//! the first one whose parameters all resolve wins. This is not "most
//! specific constructor wins": a type listing `(Foo)` before `(Foo, Bar)`
//! is always built through `(Foo)` when `Foo` resolves.

use super::{Instance, Resolver};
use kiln_domain::capability::CapabilityKey;
use kiln_domain::error::{Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Build<T> = Box<dyn Fn(&Arguments) -> Result<T> + Send + Sync>;

/// Resolved constructor arguments, in parameter order
pub struct Arguments {
    values: Vec<(CapabilityKey, Instance)>,
}

impl Arguments {
    /// Argument at `index` as `Arc<P>`
    pub fn get<P: ?Sized + 'static>(&self, index: usize) -> Result<Arc<P>> {
        let (key, instance) = self.values.get(index).ok_or_else(|| {
            Error::invalid_argument(format!(
                "constructor argument {index} out of range ({} parameters)",
                self.values.len()
            ))
        })?;
        instance.downcast::<P>().ok_or_else(|| {
            Error::invalid_argument(format!(
                "constructor argument {index} is {key}, not {}",
                std::any::type_name::<P>()
            ))
        })
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One way of constructing `T`
pub struct Constructor<T> {
    parameters: Vec<CapabilityKey>,
    build: Build<T>,
}

impl<T> Constructor<T> {
    /// Create a constructor with no parameters yet
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            parameters: Vec::new(),
            build: Box::new(build),
        }
    }

    /// Append a parameter of capability `P`
    pub fn param<P: ?Sized + 'static>(mut self) -> Self {
        self.parameters.push(CapabilityKey::of::<P>());
        self
    }

    /// Parameter capabilities in order
    pub fn parameters(&self) -> &[CapabilityKey] {
        &self.parameters
    }

    /// Signature for diagnostics, e.g. `(Clock, Store)`
    pub fn signature(&self) -> String {
        let names: Vec<&str> = self.parameters.iter().map(|p| p.short_name()).collect();
        format!("({})", names.join(", "))
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("signature", &self.signature())
            .finish_non_exhaustive()
    }
}

/// A type that can be built from resolved services
pub trait Constructible: Sized + Send + Sync + 'static {
    /// Constructors in the order they should be tried
    fn constructors() -> Vec<Constructor<Self>>;
}

/// Build `T` through the first constructor whose parameters all resolve
///
/// A constructor is abandoned at its first parameter that does not resolve,
/// or when its body fails; that failure is kept as the last error. When every
/// constructor is abandoned the result is `UnsatisfiableDependency` carrying
/// the last failure as its source.
pub fn resolve_unregistered<T: Constructible>(resolver: &dyn Resolver) -> Result<Arc<T>> {
    let type_name = std::any::type_name::<T>();
    let mut last_error: Option<Error> = None;

    for constructor in T::constructors() {
        match try_constructor(type_name, &constructor, resolver) {
            Ok(value) => {
                debug!(
                    type_name,
                    signature = %constructor.signature(),
                    "Constructed unregistered type"
                );
                return Ok(Arc::new(value));
            }
            Err(e) => {
                debug!(
                    type_name,
                    signature = %constructor.signature(),
                    error = %e,
                    "Constructor abandoned"
                );
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(cause) => Err(Error::unsatisfiable_with_cause(
            type_name,
            "no constructor could be satisfied",
            cause,
        )),
        None => Err(Error::unsatisfiable(type_name, "type declares no constructors")),
    }
}

fn try_constructor<T>(
    type_name: &str,
    constructor: &Constructor<T>,
    resolver: &dyn Resolver,
) -> Result<T> {
    let mut values = Vec::with_capacity(constructor.parameters.len());
    for &parameter in &constructor.parameters {
        let instance = resolver.resolve_key(parameter).ok_or_else(|| {
            Error::unsatisfiable(
                type_name,
                format!(
                    "parameter {} of constructor {} is not resolvable",
                    parameter.short_name(),
                    constructor.signature()
                ),
            )
        })?;
        values.push((parameter, instance));
    }
    (constructor.build)(&Arguments { values })
}
