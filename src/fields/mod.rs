pub mod fp2;
pub mod fq;
