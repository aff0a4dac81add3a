pub mod dispatch;
pub mod hash;
pub mod reset;
pub mod shared;
pub mod status;
pub mod upload;
pub mod validate;
