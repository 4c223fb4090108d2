//! Resource types

pub mod inventory_item;

pub use inventory_item::{
    InventoryItem, InventoryItemDescription, InventoryItemName, InventoryItemStatus,
    INVENTORY_ITEM_DESCRIPTION_SCHEMA, INVENTORY_ITEM_NAME_SCHEMA, INVENTORY_ITEM_SCHEMA,
    SEARCH_PARAMETERS,
};
