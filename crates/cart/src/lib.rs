//! Shopping cart domain module.
//!
//! A cart is owned by exactly one order and is saved/deleted together with it.

pub mod cart;

pub use cart::{Cart, CartId, CartItem};
