//! 認証 (access) と認可 (permission) の middleware
//!
//! 適用順: access が外側、permission guard は route 単位で内側。
pub mod access;
pub mod permission;
