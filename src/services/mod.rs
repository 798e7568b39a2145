pub mod vendors;

pub use vendors::{NewVendor, UpdateVendor, VendorService};
