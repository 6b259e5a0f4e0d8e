pub mod account;
pub mod admin;
pub mod auth;
pub mod cards;
pub mod feed;
pub mod interactions;
pub mod offers;
pub mod payments;
