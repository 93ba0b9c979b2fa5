pub mod approval;
pub mod upload;
