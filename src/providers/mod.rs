pub mod api1;
pub mod api2;
pub mod api3;
pub mod util;

pub use api1::Api1Provider;
pub use api2::Api2Provider;
pub use api3::Api3Provider;
