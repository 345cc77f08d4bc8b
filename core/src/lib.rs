pub mod access;
pub mod assignee;
pub mod attachment;
pub mod board_list;
pub mod card;
pub mod comment;
pub mod config;
pub mod db;
pub mod label;
pub mod streak;
pub mod subtask;
pub mod user;
pub mod workspace;
