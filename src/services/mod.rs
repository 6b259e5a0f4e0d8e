pub mod feed;
pub mod interactions;
pub mod interleave;
pub mod payments;
pub mod templates;
