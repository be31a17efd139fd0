//! Item stack sizes.
//!
//! Hosts supply an [`ItemCatalog`]. [`ItemTable`] is the built-in one,
//! assembled once through [`ItemTableBuilder`] and immutable afterwards.

use std::collections::HashMap;

/// Resolves an item name to its stack size.
pub trait ItemCatalog {
    /// Stack size of `item`, at least 1. Non-stackable and unknown items
    /// report 1.
    fn stack_size(&self, item: &str) -> u32;
}

/// Errors raised while building an [`ItemTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("item '{0}' registered twice")]
    DuplicateItem(String),
    #[error("item '{name}' has invalid stack size {stack_size}")]
    InvalidStackSize { name: String, stack_size: u32 },
    #[error("item '{0}' not found")]
    UnknownItem(String),
}

/// An item definition in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDef {
    pub name: String,
    pub stack_size: u32,
    pub stackable: bool,
}

/// Builder for an immutable [`ItemTable`].
/// Two-phase lifecycle: registration -> finalization.
#[derive(Debug, Default)]
pub struct ItemTableBuilder {
    items: Vec<ItemDef>,
}

impl ItemTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stackable item.
    pub fn item(mut self, name: &str, stack_size: u32) -> Self {
        self.items.push(ItemDef {
            name: name.to_string(),
            stack_size,
            stackable: true,
        });
        self
    }

    /// Register an item that occupies a whole slot per piece.
    pub fn unstackable(mut self, name: &str) -> Self {
        self.items.push(ItemDef {
            name: name.to_string(),
            stack_size: 1,
            stackable: false,
        });
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<ItemTable, CatalogError> {
        let mut by_name = HashMap::with_capacity(self.items.len());
        for (index, def) in self.items.iter().enumerate() {
            if def.stack_size == 0 {
                return Err(CatalogError::InvalidStackSize {
                    name: def.name.clone(),
                    stack_size: def.stack_size,
                });
            }
            if by_name.insert(def.name.clone(), index).is_some() {
                return Err(CatalogError::DuplicateItem(def.name.clone()));
            }
        }
        Ok(ItemTable {
            items: self.items,
            by_name,
        })
    }
}

/// Immutable item table. Frozen after build().
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    items: Vec<ItemDef>,
    by_name: HashMap<String, usize>,
}

impl ItemTable {
    pub fn builder() -> ItemTableBuilder {
        ItemTableBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&ItemDef> {
        self.by_name.get(name).map(|&i| &self.items[i])
    }

    pub fn require(&self, name: &str) -> Result<&ItemDef, CatalogError> {
        self.get(name)
            .ok_or_else(|| CatalogError::UnknownItem(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemCatalog for ItemTable {
    fn stack_size(&self, item: &str) -> u32 {
        match self.get(item) {
            Some(def) if def.stackable => def.stack_size,
            _ => 1,
        }
    }
}
