//! Owned, editable versions of the IBMF tables

pub mod backup;
pub mod face;
pub mod planes;
