mod app;
mod examples;

pub use app::App;
pub use examples::Examples;
