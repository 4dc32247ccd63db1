pub mod admin;
pub mod catalog;
pub mod round1;
pub mod round2;
pub mod round3;
pub mod team;
