pub mod handlers;
pub mod kanban;
