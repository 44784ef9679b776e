//!
//! # Shared-Pointer Types
//!

// Std-lib
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock};

// Crates.io
use by_address::ByAddress;

///
/// # Ptr
///
/// Shared, reference-counted pointer to a cell definition (or anything else).
/// Layout hierarchies share their definitions freely:
/// a single waveguide or pad may be instanced by dozens of parents,
/// and a fixture cell may be held by the fixture cache and by any number of composed cells at once.
///
/// Access goes through the [RwLock]'s `read()` and `write()`, forwarded by [Deref]:
///
/// ```text
/// let cell = ptr.read()?;
/// println!("{}", cell.name);
/// ```
///
/// Passing the borrowed data onward generally requires a ref-and-deref:
///
/// ```text
/// annotate(&mut *ptr.write()?);
/// ```
///
/// [Ptr]s compare and hash *by address*, via [ByAddress].
/// Two pointers are equal only if they point at the same definition,
/// regardless of whether the contents of two distinct definitions happen to match.
/// This is what the hierarchy-rewriting passes key their identity-maps on.
///
#[derive(Debug, Default)]
pub struct Ptr<T: ?Sized>(ByAddress<Arc<RwLock<T>>>);

impl<T> Ptr<T> {
    /// Pointer Constructor
    pub fn new(i: T) -> Self {
        Self(ByAddress(Arc::new(RwLock::new(i))))
    }
    /// Number of [Ptr]s currently sharing our target
    pub fn count(&self) -> usize {
        Arc::strong_count(&self.0 .0)
    }
}
impl<T> From<T> for Ptr<T> {
    fn from(t: T) -> Self {
        Self::new(t)
    }
}
impl<T> Deref for Ptr<T> {
    type Target = ByAddress<Arc<RwLock<T>>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<T> DerefMut for Ptr<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
// Deriving these alongside [Deref] picks up the wrong bounds. Written out by hand.
impl<T> Clone for Ptr<T> {
    fn clone(&self) -> Self {
        Self(ByAddress::clone(&self.0))
    }
}
impl<T> PartialEq for Ptr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl<T> Eq for Ptr<T> {}
impl<T> Hash for Ptr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

///
/// # Pointer List
///
/// Newtype over a [Vec] of [Ptr]s, returning a usable [Ptr] upon each insertion.
/// Everything else is forwarded to the underlying [Vec] via [Deref] and [DerefMut].
///
#[derive(Debug, Clone)]
pub struct PtrList<T: ?Sized>(Vec<Ptr<T>>);

impl<T> PtrList<T> {
    /// Create a new and empty [PtrList]. Also available via [Default].
    pub fn new() -> Self {
        Self(Vec::new())
    }
    /// Create a [PtrList] from a [Vec] of [Ptr]s.
    pub fn from_ptrs(ptrs: Vec<Ptr<T>>) -> Self {
        Self(ptrs)
    }
    /// Add a `T`-convertible element.
    /// Returns a cloned [Ptr] to it.
    pub fn add(&mut self, t: impl Into<T>) -> Ptr<T> {
        let t = Ptr::new(t.into());
        self.0.push(t.clone());
        t
    }
    /// Add an existing [Ptr], if it is not already in the list.
    /// Membership is by address.
    pub fn add_ptr(&mut self, ptr: &Ptr<T>) {
        if !self.0.contains(ptr) {
            self.0.push(ptr.clone());
        }
    }
}
impl<T> Default for PtrList<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> Deref for PtrList<T> {
    type Target = Vec<Ptr<T>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<T> DerefMut for PtrList<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl<T> From<Vec<Ptr<T>>> for PtrList<T> {
    fn from(v: Vec<Ptr<T>>) -> Self {
        Self::from_ptrs(v)
    }
}
