//! Type-keyed per-request values.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// A map holding at most one value per type.
///
/// Lets a pre-middleware leave something behind for a post-middleware
/// without the two knowing about each other's internals.
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning the previous value of the same type.
    pub fn insert<T: Send + 'static>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Send + 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }
}
