pub mod pages;
pub mod status;
pub mod story;
