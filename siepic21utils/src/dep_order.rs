//!
//! # Dependency-Ordering Trait and Helpers
//!

// Std-lib
use std::collections::HashSet;
use std::marker::PhantomData;

///
/// # Dependency-Ordering Trait
///
/// Cell hierarchies form a directed graph: each cell depends on the definitions it instances.
/// The same child may be reached along many paths, but a well-formed hierarchy never cycles.
///
/// Implementers supply `process`, which pushes each of `item`'s direct dependencies onto the `orderer`.
/// [DepOrderer::push] then recurses depth-first, visiting each distinct item once,
/// and emitting it only after all of its dependencies.
/// Re-entering an item whose processing is still open indicates a cycle,
/// which is reported through `fail`.
///
/// ```text
/// struct ChildrenFirst;
/// impl DepOrder for ChildrenFirst {
///     type Item = Ptr<Cell>;
///     type Error = LayoutError;
///
///     fn process(item: &Self::Item, orderer: &mut DepOrderer<Self>) -> Result<(), Self::Error> {
///         for child in item.read()?.children() {
///             orderer.push(&child)?;
///         }
///         Ok(())
///     }
///     fn fail(item: &Self::Item) -> Result<(), Self::Error> {
///         Err(LayoutError::msg("Cycle"))
///     }
/// }
/// ```
///
pub trait DepOrder: Sized {
    /// Item Type. Typically pointers or names of the graph's nodes.
    type Item: Clone + Eq + std::hash::Hash;
    /// Error Type
    type Error;

    /// Dependency-order all entries in slice `items`, and everything they depend upon.
    fn order(items: &[Self::Item]) -> Result<Vec<Self::Item>, Self::Error> {
        DepOrderer::<Self>::order(items)
    }

    /// Process a single `item`, pushing each of its direct dependencies
    fn process(item: &Self::Item, orderer: &mut DepOrderer<Self>) -> Result<(), Self::Error>;
    /// Cycle-handler, called with the item found to depend upon itself
    fn fail(item: &Self::Item) -> Result<(), Self::Error>;
}

/// # Dependency Order Helper
/// Public solely for use in the call-signature of [DepOrder::process].
pub struct DepOrderer<P: DepOrder> {
    /// Ordered, completed items
    stack: Vec<P::Item>,
    /// Completed items, for quick membership tests
    seen: HashSet<P::Item>,
    /// Open items, for cycle detection
    pending: HashSet<P::Item>,
    p: PhantomData<P>,
}
impl<P: DepOrder> DepOrderer<P> {
    /// Dependency-order all entries in slice `items`
    pub fn order(items: &[P::Item]) -> Result<Vec<P::Item>, P::Error> {
        let len = items.len();
        let mut this = Self {
            stack: Vec::with_capacity(len),
            seen: HashSet::with_capacity(len),
            pending: HashSet::new(),
            p: PhantomData,
        };
        for item in items.iter() {
            this.push(item)?;
        }
        Ok(this.stack)
    }
    /// Push `item`'s dependencies, and then itself, onto the stack
    pub fn push(&mut self, item: &P::Item) -> Result<(), P::Error> {
        if self.seen.contains(item) {
            return Ok(());
        }
        if self.pending.contains(item) {
            return P::fail(item);
        }
        self.pending.insert(item.clone());
        P::process(item, self)?;
        self.pending.remove(item);

        self.seen.insert(item.clone());
        self.stack.push(item.clone());
        Ok(())
    }
}
