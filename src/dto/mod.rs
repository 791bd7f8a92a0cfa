pub mod addresses;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod shipping;
