pub mod mercadolibre;
pub mod resolver;
pub mod sams;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use mercadolibre::MercadoLibreResolver;
pub use resolver::PriceResolver;
pub use sams::SamsResolver;
pub use transport::*;
