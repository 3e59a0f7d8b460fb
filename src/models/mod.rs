//! Data models for the Bookmarket domain

pub mod book;
pub mod catalog;
pub mod conversation;
pub mod exchange;
pub mod feed;
pub mod library;
pub mod listing;
pub mod review;
pub mod user;
