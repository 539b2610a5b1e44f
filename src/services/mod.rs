pub mod command_service;
pub use command_service::{CommandError, CommandReply, CommandService};

pub mod command_service_impl;
pub use command_service_impl::SeaOrmCommandService;
