//! # Variant Hierarchy
//!
//! Products form a forest through `parent_id`. Records are kept flat, keyed
//! by id; the tree is only ever walked through a `parent_of` lookup, never
//! held as object links.
//!
//! ```text
//! SHIRT                      parent_of(SHIRT)        = Some(None)
//! ├── SHIRT-RED              parent_of(SHIRT-RED)    = Some(Some(SHIRT))
//! │   └── SHIRT-RED-XL       parent_of(SHIRT-RED-XL) = Some(Some(SHIRT-RED))
//! └── SHIRT-BLUE             parent_of(UNKNOWN)      = None
//! ```

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};

/// Checks that making `parent_id` the parent of `product_id` keeps the
/// hierarchy acyclic.
///
/// `parent_of(id)` returns `None` for an unknown product, `Some(None)` for a
/// root and `Some(Some(parent))` otherwise.
///
/// ## Errors
/// - [`CoreError::SelfParent`] when both ids are equal
/// - [`CoreError::ParentNotFound`] when `parent_id` is unknown
/// - [`CoreError::HierarchyCycle`] when `product_id` is an ancestor of
///   `parent_id`, or the ancestor chain already loops
///
/// ```rust
/// use std::collections::HashMap;
/// use catalog_core::hierarchy::ensure_acyclic;
///
/// let parents: HashMap<&str, Option<String>> = HashMap::from([
///     ("shirt", None),
///     ("shirt-red", Some("shirt".to_string())),
/// ]);
/// let lookup = |id: &str| parents.get(id).cloned();
///
/// assert!(ensure_acyclic("hat", "shirt-red", lookup).is_ok());
/// assert!(ensure_acyclic("shirt", "shirt-red", lookup).is_err());
/// ```
pub fn ensure_acyclic<F>(product_id: &str, parent_id: &str, parent_of: F) -> CoreResult<()>
where
    F: Fn(&str) -> Option<Option<String>>,
{
    if product_id == parent_id {
        return Err(CoreError::SelfParent {
            product_id: product_id.to_string(),
        });
    }

    let cycle = || CoreError::HierarchyCycle {
        product_id: product_id.to_string(),
        parent_id: parent_id.to_string(),
    };

    let mut current = match parent_of(parent_id) {
        Some(next) => next,
        None => return Err(CoreError::ParentNotFound(parent_id.to_string())),
    };

    let mut seen: HashSet<String> = HashSet::from([parent_id.to_string()]);

    while let Some(ancestor) = current {
        if ancestor == product_id || !seen.insert(ancestor.clone()) {
            return Err(cycle());
        }
        // An unknown ancestor ends the walk; dangling links are the store's
        // foreign key to reject.
        current = parent_of(&ancestor).flatten();
    }

    Ok(())
}
