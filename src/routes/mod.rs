pub mod auth;

pub mod courses;

pub mod hotquestions;

pub mod privacy;

mod questions;

mod rounds;

pub use auth::configure_auth_routes;
pub use courses::configure_courses_routes;
pub use hotquestions::configure_hotquestions_routes;
pub use privacy::configure_privacy_routes;
