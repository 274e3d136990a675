pub mod chat;
pub mod demo;
pub mod doctor;
pub mod info;
pub mod mock_agent;
