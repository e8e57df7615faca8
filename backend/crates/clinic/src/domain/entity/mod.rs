//! Entity Module

pub mod checklist;
pub mod division;
pub mod injury;
pub mod matches;
pub mod medical_file;
pub mod player;
pub mod treatment;
