pub mod admin;
pub mod comments;
pub mod error;
pub mod feed;
pub mod metadata;
pub mod page;
pub mod pagination;
pub mod render;
pub mod repos;
pub mod sitemap;
