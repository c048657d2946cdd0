//! The structures making up an IBMF file

pub mod backup;
pub mod face;
pub mod lig_kern;
pub mod planes;
pub mod preamble;
