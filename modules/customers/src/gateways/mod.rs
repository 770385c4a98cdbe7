pub mod local;

pub use local::CustomersLocalClient;
