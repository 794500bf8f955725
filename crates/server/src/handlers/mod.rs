pub mod faces_socket;
pub mod health;
pub mod upload;
