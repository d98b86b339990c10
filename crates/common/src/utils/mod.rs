pub mod logging;
pub mod sorting;
pub mod filter;
pub mod slug;
