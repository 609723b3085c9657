pub mod filter;
pub mod product;
