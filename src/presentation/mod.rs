// Presentation layer - outward collaborator implementations
pub mod log_view;
