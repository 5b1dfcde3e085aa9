pub mod ads;
pub mod messages;
