#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate log;

pub mod config;
pub mod database;
pub mod enums;
pub mod gallery;
pub mod global;
pub mod parcel;
pub mod schema;
pub mod simple_gallery;
pub mod tag;
pub mod utils;
pub mod xpath;

pub use crate::gallery::{Gallery, GenericGallery};
pub use crate::simple_gallery::{parse_listing, SimpleGallery};
