pub mod basis;
pub mod curve;
pub mod isogeny_chain;
pub mod point;
pub mod projective_point;
pub mod torsion_basis;
pub mod velu;
pub mod weil_pairing;
pub mod x_only_arithmetic;
