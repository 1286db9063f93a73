//! Types shared by the phonebook crates: the contact model, store actions and
//! the error taxonomy.

pub mod action;
pub mod domain;
pub mod error;
