pub mod bn;
pub mod drng;
pub mod prime_product;
