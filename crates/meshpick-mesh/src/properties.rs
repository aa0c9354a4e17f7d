//! Named, typed per-element property arrays.
//!
//! Every property holds one value per element (face, for the mesh's face
//! store). Values are type-erased behind [`PropertyArray`] and recovered with
//! a downcast, so a lookup with the wrong type behaves like a missing
//! property.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::{MeshError, MeshResult};

/// Type-erased storage for one property.
pub trait PropertyArray: Any + Send + Sync + Debug {
    /// Returns self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns self as mutable `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Clones the array into a new box.
    fn clone_box(&self) -> Box<dyn PropertyArray>;
}

impl<T> PropertyArray for Vec<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn PropertyArray> {
        Box::new(self.clone())
    }
}

/// A set of named property arrays sharing one element count.
#[derive(Debug, Default)]
pub struct PropertyStore {
    len: usize,
    arrays: HashMap<String, Box<dyn PropertyArray>>,
}

impl Clone for PropertyStore {
    fn clone(&self) -> Self {
        Self {
            len: self.len,
            arrays: self
                .arrays
                .iter()
                .map(|(name, array)| (name.clone(), array.clone_box()))
                .collect(),
        }
    }
}

impl PropertyStore {
    /// Creates an empty store for `len` elements.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            arrays: HashMap::new(),
        }
    }

    /// Number of elements each property holds.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the store is sized for zero elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds a property filled with `default`, or returns the existing one if a
    /// property of the same name and type already exists.
    pub fn add<T>(&mut self, name: &str, default: T) -> MeshResult<&mut [T]>
    where
        T: Clone + Send + Sync + Debug + 'static,
    {
        let len = self.len;
        let array = self
            .arrays
            .entry(name.to_string())
            .or_insert_with(|| Box::new(vec![default; len]));
        array
            .as_any_mut()
            .downcast_mut::<Vec<T>>()
            .map(Vec::as_mut_slice)
            .ok_or_else(|| MeshError::PropertyTypeMismatch(name.to_string()))
    }

    /// Returns the property values, if a property of that name and type exists.
    pub fn get<T: 'static>(&self, name: &str) -> Option<&[T]> {
        self.arrays
            .get(name)?
            .as_any()
            .downcast_ref::<Vec<T>>()
            .map(Vec::as_slice)
    }

    /// Returns the property values mutably.
    pub fn get_mut<T: 'static>(&mut self, name: &str) -> Option<&mut [T]> {
        self.arrays
            .get_mut(name)?
            .as_any_mut()
            .downcast_mut::<Vec<T>>()
            .map(Vec::as_mut_slice)
    }

    /// Returns true if a property with this name exists (of any type).
    pub fn contains(&self, name: &str) -> bool {
        self.arrays.contains_key(name)
    }

    /// Removes a property. Returns true if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.arrays.remove(name).is_some()
    }

    /// Names of all properties, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }
}
