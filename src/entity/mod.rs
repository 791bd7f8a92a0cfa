pub mod addresses;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod products;
pub mod sessions;
pub mod shipping_methods;
pub mod users;

pub use addresses::Entity as Addresses;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use products::Entity as Products;
pub use sessions::Entity as Sessions;
pub use shipping_methods::Entity as ShippingMethods;
pub use users::Entity as Users;
