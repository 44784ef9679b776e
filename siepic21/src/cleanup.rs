//!
//! # Marker Removal
//!
//! Strips pin, electrical-pin, and device-recognition markers from cell hierarchies.
//!

// Std-Lib
use std::collections::HashMap;

// Local imports
use crate::error::PdkResult;
use crate::raw::{Cell, CellDepOrder, LayerSpec, LayoutError};
use crate::utils::{DepOrder, Ptr};

/// Remove all elements and labels on `layers` from `cell` itself.
/// Instanced cells are left untouched.
pub fn remove_pins(cell: &mut Cell, layers: &[LayerSpec]) -> usize {
    cell.layout.remove_layers(layers)
}

/// Remove all elements and labels on `layers` from `top` and every cell it instances.
///
/// Returns a pointer to a new, cleaned `top`.
/// Nothing reachable from the original `top` is modified.
/// Each distinct definition is copied and cleaned once, children first,
/// and every instance in the new hierarchy points at the cleaned copy of its original target.
///
pub fn remove_pins_recursive(top: &Ptr<Cell>, layers: &[LayerSpec]) -> PdkResult<Ptr<Cell>> {
    let order = CellDepOrder::order(&[top.clone()])?;
    let mut cleaned: HashMap<Ptr<Cell>, Ptr<Cell>> = HashMap::with_capacity(order.len());
    for old in order.iter() {
        let mut cell = old.read()?.clone();
        let removed = remove_pins(&mut cell, layers);
        for inst in cell.layout.insts.iter_mut() {
            inst.cell = cleaned
                .get(&inst.cell)
                .cloned()
                .ok_or_else(|| LayoutError::msg(format!("{} instanced before cleanup", inst.inst_name)))?;
        }
        log::debug!("Removed {} markers from {}", removed, cell.name);
        cleaned.insert(old.clone(), Ptr::new(cell));
    }
    Ok(cleaned
        .remove(top)
        .ok_or_else(|| LayoutError::msg("Top cell missing from its own hierarchy"))?)
}
