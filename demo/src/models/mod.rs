//! Demo entity models. Types deriving `RestEntity` get a repository
//! generated at build time; everything else stays internal.

pub mod department;
pub mod employee;
pub mod payroll;
